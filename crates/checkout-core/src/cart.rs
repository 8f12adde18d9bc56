//! # Cart Store
//!
//! Client-session cart: line items keyed by product + variant identity,
//! with merge/update/remove operations and durable persistence.
//!
//! The cart is never authoritative for pricing; checkout revalidates and
//! reprices server-side before any provider call.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fixed key under which the serialized line list is persisted
pub const CART_STORAGE_KEY: &str = "storefront.cart.v1";

/// A named option pair on a product variant (e.g. "Size" / "Large")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    pub name: String,
    pub value: String,
}

/// Variant selected for a cart line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartVariant {
    /// Display title (e.g. "Large / Oak")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Stock keeping unit; part of the line identity when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// Option pairs retained on the line (only pairs with both a name
    /// and a value survive the snapshot)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<VariantOption>,
}

/// A line in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Composite identity: `product_id` or `product_id:sku`
    pub line_id: String,

    /// Product ID
    pub product_id: String,

    /// Display title (denormalized snapshot)
    pub title: String,

    /// Unit price in minor currency units
    pub unit_amount: i64,

    /// Compare-at price in minor units, for strike-through display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_amount: Option<i64>,

    /// Quantity, always >= 1 while the line exists
    pub quantity: u32,

    /// Optional image reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Selected variant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<CartVariant>,
}

impl CartLine {
    /// Line total in minor units
    pub fn total(&self) -> i64 {
        self.unit_amount * i64::from(self.quantity)
    }
}

/// Item handed to `Cart::add_item`: a product card's worth of data
#[derive(Debug, Clone, Default)]
pub struct CartItemInput {
    pub product_id: String,
    pub title: String,
    pub unit_amount: i64,
    pub compare_at_amount: Option<i64>,
    pub image_url: Option<String>,
    pub variant: Option<CartVariant>,
}

/// Compute the line identity for a product + optional variant SKU
pub fn line_id(product_id: &str, variant_sku: Option<&str>) -> String {
    match variant_sku {
        Some(sku) if !sku.is_empty() => format!("{}:{}", product_id, sku),
        _ => product_id.to_string(),
    }
}

/// The cart: a collection of lines plus drawer visibility state.
///
/// Drawer state is presentation only and is not serialized with the lines.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    drawer_open: bool,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from a previously serialized line list
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self {
            lines,
            drawer_open: false,
        }
    }

    /// Add an item, merging by line identity.
    ///
    /// If a line with the same `(product_id, variant.sku)` identity exists,
    /// only its quantity accumulates; the stored title/price snapshot is
    /// left untouched even when the incoming item differs (the server
    /// reprices at checkout, so a stale snapshot never reaches a provider).
    /// Items without a product id are ignored.
    pub fn add_item(&mut self, item: CartItemInput, quantity: u32) {
        if item.product_id.is_empty() || quantity == 0 {
            return;
        }

        let id = line_id(
            &item.product_id,
            item.variant.as_ref().and_then(|v| v.sku.as_deref()),
        );

        if let Some(existing) = self.lines.iter_mut().find(|l| l.line_id == id) {
            existing.quantity += quantity;
            return;
        }

        // Snapshot only option pairs that carry both a name and a value
        let variant = item.variant.map(|v| CartVariant {
            title: v.title,
            sku: v.sku,
            options: v
                .options
                .into_iter()
                .filter(|o| !o.name.is_empty() && !o.value.is_empty())
                .collect(),
        });

        self.lines.push(CartLine {
            line_id: id,
            product_id: item.product_id,
            title: item.title,
            unit_amount: item.unit_amount,
            compare_at_amount: item.compare_at_amount,
            quantity,
            image_url: item.image_url,
            variant,
        });
    }

    /// Remove a line; absent ids are not an error
    pub fn remove_line(&mut self, line_id: &str) {
        self.lines.retain(|l| l.line_id != line_id);
    }

    /// Set the quantity of a line.
    ///
    /// Non-positive input removes the line rather than clamping it back to 1.
    pub fn update_quantity(&mut self, line_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_line(line_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.line_id == line_id) {
            line.quantity = quantity.min(i64::from(u32::MAX)) as u32;
        }
    }

    /// Empty all lines
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of quantities across all lines
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of `unit_amount * quantity` across all lines, in minor units
    pub fn subtotal(&self) -> i64 {
        self.lines.iter().map(|l| l.total()).sum()
    }

    /// Borrow the lines
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Check if the cart has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Open the cart drawer
    pub fn open(&mut self) {
        self.drawer_open = true;
    }

    /// Close the cart drawer
    pub fn close(&mut self) {
        self.drawer_open = false;
    }

    /// Toggle the cart drawer
    pub fn toggle(&mut self) {
        self.drawer_open = !self.drawer_open;
    }

    /// Drawer visibility
    pub fn is_open(&self) -> bool {
        self.drawer_open
    }

    /// Serialize the line list for storage
    pub fn serialize_lines(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.lines)
    }
}

/// Durable slot for the serialized cart line list.
///
/// One UI context mutates the slot at a time; concurrent writers (e.g.
/// a second browser tab) are last-write-wins.
pub trait CartStorage {
    /// Read the raw serialized value, if any
    fn load(&self, key: &str) -> Option<String>;

    /// Write the raw serialized value
    fn store(&mut self, key: &str, value: &str);

    /// Remove the value
    fn remove(&mut self, key: &str);
}

/// In-memory storage for tests and native callers
#[derive(Debug, Default)]
pub struct MemoryCartStorage {
    slots: std::collections::HashMap<String, String>,
}

impl MemoryCartStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryCartStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn store(&mut self, key: &str, value: &str) {
        self.slots.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.slots.remove(key);
    }
}

/// A cart bound to a storage slot: restores prior state on construction
/// and writes back after every mutation.
pub struct PersistentCart<S: CartStorage> {
    cart: Cart,
    storage: S,
}

impl<S: CartStorage> PersistentCart<S> {
    /// Restore prior state from storage. Malformed stored state is
    /// discarded (logged) and treated as an empty cart.
    pub fn restore(storage: S) -> Self {
        let cart = match storage.load(CART_STORAGE_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => Cart::from_lines(lines),
                Err(e) => {
                    warn!("Discarding malformed stored cart: {}", e);
                    Cart::new()
                }
            },
            None => Cart::new(),
        };
        Self { cart, storage }
    }

    /// Read-only view of the cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutate the cart and persist the result
    pub fn mutate(&mut self, f: impl FnOnce(&mut Cart)) {
        f(&mut self.cart);
        self.persist();
    }

    pub fn add_item(&mut self, item: CartItemInput, quantity: u32) {
        self.mutate(|c| c.add_item(item, quantity));
    }

    pub fn remove_line(&mut self, line_id: &str) {
        self.mutate(|c| c.remove_line(line_id));
    }

    pub fn update_quantity(&mut self, line_id: &str, quantity: i64) {
        self.mutate(|c| c.update_quantity(line_id, quantity));
    }

    pub fn clear(&mut self) {
        self.mutate(Cart::clear);
    }

    fn persist(&mut self) {
        match self.cart.serialize_lines() {
            Ok(raw) => self.storage.store(CART_STORAGE_KEY, &raw),
            Err(e) => warn!("Failed to serialize cart for storage: {}", e),
        }
    }

    /// Hand back the storage (for tests)
    pub fn into_storage(self) -> S {
        self.storage
    }
}

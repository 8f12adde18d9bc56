//! # checkout-wasm
//!
//! WebAssembly bindings for the storefront cart.
//!
//! This crate provides the browser side of the checkout flow:
//! - a cart persisted to `localStorage` under a fixed key, restored at
//!   session start (malformed stored state is discarded, never a crash)
//! - line merge/update/remove/clear operations mirroring `checkout-core`
//! - the success-page reconciliation guard that clears the cart exactly
//!   once after a completed payment
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCart } from 'storefront-checkout-wasm';
//!
//! await init();
//!
//! const cart = WasmCart.load();
//! cart.add_item('prod-1', 'Walnut Side Table', 500, 1, 'sku-oak');
//! console.log('Items:', cart.item_count(), 'Subtotal:', cart.format_subtotal());
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use checkout_core::{
    Cart, CartItemInput, CartStorage, CartVariant, MemoryCartStorage, PersistentCart,
    SuccessParams, SuccessReconciler,
};
use wasm_bindgen::prelude::*;

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// `CartStorage` backed by the browser's `localStorage`.
///
/// Falls back to an in-memory slot when `localStorage` is unavailable
/// (private browsing, storage disabled) so the cart still works for the
/// session.
struct LocalCartStorage {
    local: Option<web_sys::Storage>,
    fallback: MemoryCartStorage,
}

impl LocalCartStorage {
    fn new() -> Self {
        let local = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if local.is_none() {
            web_sys::console::warn_1(&JsValue::from_str(
                "localStorage unavailable; cart will not survive this session",
            ));
        }
        Self {
            local,
            fallback: MemoryCartStorage::new(),
        }
    }
}

impl CartStorage for LocalCartStorage {
    fn load(&self, key: &str) -> Option<String> {
        match &self.local {
            Some(storage) => storage.get_item(key).ok().flatten(),
            None => self.fallback.load(key),
        }
    }

    fn store(&mut self, key: &str, value: &str) {
        match &self.local {
            Some(storage) => {
                let _ = storage.set_item(key, value);
            }
            None => self.fallback.store(key, value),
        }
    }

    fn remove(&mut self, key: &str) {
        match &self.local {
            Some(storage) => {
                let _ = storage.remove_item(key);
            }
            None => self.fallback.remove(key),
        }
    }
}

/// The browser cart: persisted lines plus the success-page clear guard
#[wasm_bindgen]
pub struct WasmCart {
    cart: PersistentCart<LocalCartStorage>,
    reconciler: SuccessReconciler,
}

#[wasm_bindgen]
impl WasmCart {
    /// Restore the cart from `localStorage` (empty if nothing stored or
    /// the stored state is malformed)
    pub fn load() -> WasmCart {
        WasmCart {
            cart: PersistentCart::restore(LocalCartStorage::new()),
            reconciler: SuccessReconciler::new(),
        }
    }

    /// Add an item; same `(product_id, sku)` identity merges by quantity
    pub fn add_item(
        &mut self,
        product_id: String,
        title: String,
        unit_amount: i64,
        quantity: u32,
        sku: Option<String>,
    ) {
        let variant = sku.map(|sku| CartVariant {
            title: None,
            sku: Some(sku),
            options: Vec::new(),
        });
        self.cart.add_item(
            CartItemInput {
                product_id,
                title,
                unit_amount,
                variant,
                ..Default::default()
            },
            quantity,
        );
    }

    pub fn remove_line(&mut self, line_id: &str) {
        self.cart.remove_line(line_id);
    }

    /// Non-positive quantity removes the line
    pub fn update_quantity(&mut self, line_id: &str, quantity: i64) {
        self.cart.update_quantity(line_id, quantity);
    }

    pub fn clear(&mut self) {
        self.cart.clear();
    }

    pub fn item_count(&self) -> u32 {
        self.cart.cart().item_count()
    }

    /// Subtotal in minor currency units
    pub fn subtotal_minor(&self) -> i64 {
        self.cart.cart().subtotal()
    }

    /// Subtotal formatted for display
    pub fn format_subtotal(&self) -> String {
        format_price(self.cart.cart().subtotal())
    }

    pub fn is_empty(&self) -> bool {
        self.cart.cart().is_empty()
    }

    /// Serialized line list as JSON, for rendering
    pub fn lines_json(&self) -> Result<String, JsValue> {
        self.cart
            .cart()
            .serialize_lines()
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize cart: {}", e)))
    }

    // Drawer visibility (presentation only, not persisted)

    pub fn open_drawer(&mut self) {
        self.cart.mutate(Cart::open);
    }

    pub fn close_drawer(&mut self) {
        self.cart.mutate(Cart::close);
    }

    pub fn toggle_drawer(&mut self) {
        self.cart.mutate(Cart::toggle);
    }

    pub fn is_drawer_open(&self) -> bool {
        self.cart.cart().is_open()
    }

    /// Success-page reconciliation: clear the cart exactly once when a
    /// payment reference is present. Safe to call on every render; a visit
    /// without a reference leaves the cart untouched. Returns whether this
    /// call cleared the cart.
    pub fn reconcile_success(
        &mut self,
        provider: Option<String>,
        order_id: Option<String>,
        session_id: Option<String>,
    ) -> bool {
        let params = SuccessParams {
            provider,
            order_id,
            session_id,
        };
        let reconciler = &mut self.reconciler;
        let mut cleared = false;
        self.cart
            .mutate(|cart| cleared = reconciler.reconcile(&params, cart));
        cleared
    }
}

/// Format minor units for display (e.g. `2899` -> `"£28.99"`)
#[wasm_bindgen]
pub fn format_price(minor: i64) -> String {
    format!("£{}", checkout_core::format_major_units(minor))
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

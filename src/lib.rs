//! Folio browser binding.
//!
//! Compiles to a WebAssembly module that attaches the
//! [`folio_core`] controllers to the static portfolio page it is loaded
//! into.

mod app;
pub mod dom;
pub mod logging;
pub mod registry;

use wasm_bindgen::prelude::*;

pub use app::CONFIG_ELEMENT_ID;

/// Module entry point, run by the wasm-bindgen glue on load.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::init();
    app::boot().map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// Bind console.log directly; warn/error go through web-sys
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

#[cfg(target_arch = "wasm32")]
pub fn warn(s: &str) {
    web_sys::console::warn_1(&JsValue::from_str(s));
}

#[cfg(target_arch = "wasm32")]
pub fn error(s: &str) {
    web_sys::console::error_1(&JsValue::from_str(s));
}

// Host builds (unit tests, tooling) have no JS console
#[cfg(not(target_arch = "wasm32"))]
pub fn log(s: &str) {
    eprintln!("{}", s);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(s: &str) {
    eprintln!("WARN {}", s);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn error(s: &str) {
    eprintln!("ERROR {}", s);
}

// Note: the console_* macros are defined in lib.rs to avoid duplication

//! Shared helpers for the WASM boundary
//!
//! Console lines carry a `[WASM]` tag plus a level marker. Every failure that
//! crosses into JavaScript goes through [`js_error`], so the page sees
//! the same message in the console and in the rejected value.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::formula::FormulaConfig;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    fn console_debug(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = info)]
    fn console_info(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = warn)]
    fn console_warn(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    fn console_error(s: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn marker(self) -> &'static str {
        match self {
            Level::Debug | Level::Info => "",
            Level::Warn => "⚠️ ",
            Level::Error => "❌ ",
        }
    }
}

/// The console text for one message
pub fn console_line(level: Level, msg: &str) -> String {
    format!("[WASM] {}{}", level.marker(), msg)
}

pub fn emit(level: Level, msg: &str) {
    let line = console_line(level, msg);
    match level {
        Level::Debug => console_debug(&line),
        Level::Info => console_info(&line),
        Level::Warn => console_warn(&line),
        Level::Error => console_error(&line),
    }
}

#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        $crate::api::helpers::emit($crate::api::helpers::Level::Debug, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::emit($crate::api::helpers::Level::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        $crate::api::helpers::emit($crate::api::helpers::Level::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::emit($crate::api::helpers::Level::Error, &format!($($arg)*))
    };
}

/// Message handed back to JavaScript for a failed call
pub fn boundary_message(context: &str, err: impl std::fmt::Display) -> String {
    format!("{}: {}", context, err)
}

/// Log a failure at error level and turn it into a rejection value
pub fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    let msg = boundary_message(context, err);
    crate::wasm_error!("{}", msg);
    JsValue::from_str(&msg)
}

pub fn deserialize<T: DeserializeOwned>(value: JsValue, context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| js_error(context, e))
}

pub fn serialize<T: Serialize>(value: &T, context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| js_error(context, e))
}

/// Config from JavaScript; `undefined`/`null` means defaults
pub fn config_from_js(value: JsValue) -> Result<FormulaConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(FormulaConfig::default());
    }
    deserialize(value, "Failed to deserialize formula config")
}

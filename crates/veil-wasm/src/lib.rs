//! WebAssembly bindings for Veil
//!
//! The interception shims hold no state of their own: they call these
//! exports for every request, created node and navigation. Before `init`
//! every call fails open.

mod console;

use std::sync::{PoisonError, RwLock};

use wasm_bindgen::prelude::*;
use veil_core::{Engine, EngineConfig, PageContext, PatternStore};
use veil_lists::compile_lists;

static ENGINE: RwLock<Option<Engine>> = RwLock::new(None);

fn with_engine<R>(fallback: R, f: impl FnOnce(&Engine) -> R) -> R {
    let guard = ENGINE.read().unwrap_or_else(PoisonError::into_inner);
    match guard.as_ref() {
        Some(engine) => f(engine),
        None => fallback,
    }
}

fn not_initialized() -> JsValue {
    JsValue::from_str("Not initialized. Call init() first.")
}

/// Like `with_engine`, but an uninitialized engine is an error.
fn try_engine<R>(f: impl FnOnce(&Engine) -> R) -> Result<R, JsValue> {
    let guard = ENGINE.read().unwrap_or_else(PoisonError::into_inner);
    guard.as_ref().map(f).ok_or_else(not_initialized)
}

fn with_engine_mut<R>(f: impl FnOnce(&mut Engine) -> R) -> Result<R, JsValue> {
    let mut guard = ENGINE.write().unwrap_or_else(PoisonError::into_inner);
    guard.as_mut().map(f).ok_or_else(not_initialized)
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Page context of the current window, if there is one.
fn current_page() -> PageContext {
    web_sys::window()
        .and_then(|window| window.location().href().ok())
        .and_then(|href| PageContext::from_location(&href).ok())
        .unwrap_or_else(PageContext::detached)
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Initialize (or re-initialize) the engine from a JSON configuration.
#[wasm_bindgen]
pub fn init(config_json: &str) -> Result<(), JsValue> {
    let config = EngineConfig::from_json(config_json).map_err(js_error)?;
    let patterns = config.patterns.len();
    let engine = Engine::new(config, current_page());

    *ENGINE.write().unwrap_or_else(PoisonError::into_inner) = Some(engine);
    log::info!("engine initialized with {} patterns", patterns);
    Ok(())
}

#[wasm_bindgen]
pub fn is_initialized() -> bool {
    with_engine(false, |_| true)
}

/// Route `log` output to the console at the given level (`off`, `error`, ..., `trace`).
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter: log::LevelFilter = level
        .parse()
        .map_err(|_| JsValue::from_str(&format!("Unknown log level '{}'", level)))?;
    console::install(filter);
    Ok(())
}

/// Point the engine at the current document, e.g. after `history.pushState`.
#[wasm_bindgen]
pub fn set_page(location: &str, base_uri: Option<String>) -> Result<(), JsValue> {
    let mut page = PageContext::from_location(location).map_err(js_error)?;
    if let Some(base_uri) = base_uri.as_deref().filter(|base| !base.is_empty()) {
        page = page.with_base_uri(base_uri).map_err(js_error)?;
    }
    with_engine_mut(|engine| engine.set_page(page))
}

// =============================================================================
// Decisions
// =============================================================================

#[wasm_bindgen]
pub fn should_block(url: Option<String>) -> bool {
    with_engine(false, |engine| engine.should_block(url.as_deref()))
}

#[wasm_bindgen]
pub fn clean_href(url: &str, base: Option<String>) -> String {
    with_engine(None, |engine| Some(engine.clean_href(url, base.as_deref())))
        .unwrap_or_else(|| url.to_string())
}

/// Clean an href and report the stages that fired: `{ href, changed, steps }`.
#[wasm_bindgen]
pub fn clean_href_report(url: &str, base: Option<String>) -> JsValue {
    let result = js_sys::Object::new();
    let cleaned = match with_engine(None, |engine| Some(engine.clean(url, base.as_deref()))) {
        Some(cleaned) => cleaned,
        None => {
            let _ = js_sys::Reflect::set(&result, &"href".into(), &JsValue::from_str(url));
            let _ = js_sys::Reflect::set(&result, &"changed".into(), &JsValue::from(false));
            let _ = js_sys::Reflect::set(&result, &"steps".into(), &js_sys::Array::new());
            return result.into();
        }
    };

    let steps = js_sys::Array::new();
    for (name, _) in cleaned.steps.iter_names() {
        steps.push(&JsValue::from_str(name));
    }
    let _ = js_sys::Reflect::set(&result, &"changed".into(), &JsValue::from(cleaned.href != url));
    let _ = js_sys::Reflect::set(&result, &"href".into(), &JsValue::from_str(&cleaned.href));
    let _ = js_sys::Reflect::set(&result, &"steps".into(), &steps);
    result.into()
}

// =============================================================================
// Pattern Store
// =============================================================================

#[wasm_bindgen]
pub fn add_blocked_host(pattern: &str) -> Result<(), JsValue> {
    try_engine(|engine| engine.patterns().add_blocked_host(pattern))
}

#[wasm_bindgen]
pub fn add_allowed_host(pattern: &str) -> Result<(), JsValue> {
    try_engine(|engine| engine.patterns().add_allowed_host(pattern))
}

/// Remove every occurrence of a blocked host pattern. Returns the count removed.
#[wasm_bindgen]
pub fn remove_blocked_host(pattern: &str) -> Result<u32, JsValue> {
    try_engine(|engine| engine.patterns().remove_blocked_host(pattern) as u32)
}

#[wasm_bindgen]
pub fn remove_allowed_host(pattern: &str) -> Result<u32, JsValue> {
    try_engine(|engine| engine.patterns().remove_allowed_host(pattern) as u32)
}

/// Replace all four pattern collections with the given JSON store.
#[wasm_bindgen]
pub fn replace_patterns(patterns_json: &str) -> Result<(), JsValue> {
    let store: PatternStore = serde_json::from_str(patterns_json).map_err(js_error)?;
    try_engine(|engine| {
        engine.patterns().replace(store);
    })
}

/// Serialize the current pattern store, for later `restore_patterns`.
#[wasm_bindgen]
pub fn snapshot_patterns() -> Result<String, JsValue> {
    let snapshot = try_engine(|engine| engine.patterns().snapshot())?;
    serde_json::to_string(&snapshot).map_err(js_error)
}

#[wasm_bindgen]
pub fn restore_patterns(snapshot_json: &str) -> Result<(), JsValue> {
    let store: PatternStore = serde_json::from_str(snapshot_json).map_err(js_error)?;
    try_engine(|engine| engine.patterns().restore(store))
}

/// Compile pattern list texts into a pattern store JSON plus statistics.
#[wasm_bindgen]
pub fn compile_pattern_lists(list_texts: JsValue) -> Result<JsValue, JsValue> {
    let list_array = js_sys::Array::from(&list_texts);
    if list_array.length() == 0 {
        return Err(JsValue::from_str("No list texts provided"));
    }

    let mut texts = Vec::with_capacity(list_array.length() as usize);
    for value in list_array.iter() {
        let text = value
            .as_string()
            .ok_or_else(|| JsValue::from_str("List text must be a string"))?;
        texts.push(text);
    }

    let (store, parse_stats, optimize_stats) = compile_lists(texts.iter().map(String::as_str));
    let patterns = serde_json::to_string(&store).map_err(js_error)?;

    let js_result = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&js_result, &"patterns".into(), &JsValue::from_str(&patterns));
    let _ = js_sys::Reflect::set(&js_result, &"lines".into(), &JsValue::from(parse_stats.lines as u32));
    let _ = js_sys::Reflect::set(&js_result, &"entries".into(), &JsValue::from(parse_stats.entries as u32));
    let _ = js_sys::Reflect::set(&js_result, &"skipped".into(), &JsValue::from(parse_stats.skipped as u32));
    let _ = js_sys::Reflect::set(&js_result, &"patternsAfter".into(), &JsValue::from(optimize_stats.after as u32));
    let _ = js_sys::Reflect::set(&js_result, &"deduped".into(), &JsValue::from(optimize_stats.deduped as u32));
    let _ = js_sys::Reflect::set(&js_result, &"inert".into(), &JsValue::from(optimize_stats.inert as u32));
    Ok(js_result.into())
}

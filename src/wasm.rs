use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn layout_json(json: &str) -> Result<String, JsValue> {
    let output = crate::layout_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&output).map_err(|e| JsValue::from_str(&e.to_string()))
}

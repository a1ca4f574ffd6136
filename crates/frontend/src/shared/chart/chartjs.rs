//! Привязка к Chart.js, подключённому на странице
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use super::spec::ChartSpec;
use super::ChartHandle;
use crate::shared::error::{DashboardError, DashboardResult};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Chart)]
    type JsChart;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(canvas: &HtmlCanvasElement, config: &JsValue) -> Result<JsChart, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &JsChart);
}

/// Живой экземпляр Chart.js
pub struct ChartJsHandle(JsChart);

impl ChartHandle for ChartJsHandle {
    fn destroy(&mut self) {
        self.0.destroy();
    }
}

pub fn create_chart(canvas: &HtmlCanvasElement, spec: &ChartSpec) -> DashboardResult<ChartJsHandle> {
    let config = spec
        .to_config()
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| DashboardError::Chart(e.to_string()))?;
    JsChart::new(canvas, &config)
        .map(ChartJsHandle)
        .map_err(|e| DashboardError::Chart(format!("Chart.js: {:?}", e)))
}

use austin_web_core::ChartState;
use austin_web_core::html::annotate;
use austin_web_core::label::format_hhmmss;
use austin_web_core::model::{FrameId, FrameTree, parse_samples};
use austin_web_protocol::{ChartConfig, FrameData};
use wasm_bindgen::prelude::*;

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn parse_config(config_json: Option<String>) -> Result<ChartConfig, JsError> {
    match config_json.as_deref() {
        None | Some("") => Ok(ChartConfig::default()),
        Some(json) => serde_json::from_str(json).map_err(js_err),
    }
}

/// A flame chart's data and interaction state, owned by the page script.
///
/// The chart widget keeps doing layout and drawing; it calls `color` and
/// `label` with the frame ids embedded by `data()`.
#[wasm_bindgen]
pub struct FlameChart {
    tree: FrameTree,
    state: ChartState,
}

#[wasm_bindgen]
impl FlameChart {
    /// Build from a frame data blob (`{name, file?, value, children}`).
    #[wasm_bindgen(constructor)]
    pub fn new(data_json: &str, config_json: Option<String>) -> Result<FlameChart, JsError> {
        Ok(Self {
            tree: FrameTree::from_json(data_json).map_err(js_err)?,
            state: ChartState::new(parse_config(config_json)?),
        })
    }

    /// Build from Austin collapsed sample text.
    pub fn from_samples(text: &str, config_json: Option<String>) -> Result<FlameChart, JsError> {
        let builder = parse_samples(text).map_err(js_err)?;
        Ok(Self {
            tree: builder.finish(),
            state: ChartState::new(parse_config(config_json)?),
        })
    }

    /// The annotated frame tree as JSON, ready for `d3.select(..).datum()`.
    pub fn data(&self) -> Result<String, JsError> {
        let annotated = annotate(&self.tree, &self.state).map_err(js_err)?;
        serde_json::to_string(&annotated).map_err(js_err)
    }

    pub fn frame_count(&self) -> usize {
        self.tree.len()
    }

    /// Highlight matches; returns the summary as JSON, or `undefined` for
    /// an empty term.
    pub fn search(&mut self, term: &str) -> Result<Option<String>, JsError> {
        self.state
            .search(&self.tree, term)
            .map(|summary| serde_json::to_string(&summary).map_err(js_err))
            .transpose()
    }

    pub fn on_search_input(&mut self, term: &str) {
        self.state.on_search_input(term);
    }

    pub fn clear(&mut self) {
        self.state.clear();
    }

    pub fn zoom_to(&mut self, id: usize) -> bool {
        self.state.zoom_to(&self.tree, FrameId(id))
    }

    pub fn reset_zoom(&mut self) {
        self.state.reset_zoom();
    }

    pub fn hover(&mut self, id: Option<usize>) {
        self.state.hover(id.map(FrameId));
    }

    pub fn set_width(&mut self, width: f64) {
        self.state.set_width(width);
    }

    pub fn set_height(&mut self, rows: u32) {
        self.state.set_height(rows);
    }

    pub fn width(&self) -> f64 {
        self.state.width()
    }

    pub fn pixel_height(&self) -> f64 {
        self.state.pixel_height()
    }

    /// Color-mapper slot: `#rrggbb` fill for a frame.
    pub fn color(&self, id: usize) -> Result<String, JsError> {
        self.state
            .fill(&self.tree, FrameId(id))
            .map(|c| c.to_hex())
            .ok_or_else(|| JsError::new(&format!("unknown frame id {id}")))
    }

    /// Label slot.
    pub fn label(&self, id: usize) -> Result<String, JsError> {
        self.state
            .label(&self.tree, FrameId(id))
            .ok_or_else(|| JsError::new(&format!("unknown frame id {id}")))
    }
}

/// Color a standalone frame with the default settings.
#[wasm_bindgen]
pub fn colorize_frame(name: &str, file: Option<String>, highlighted: bool) -> String {
    let frame = FrameData {
        name: name.to_string(),
        file,
        value: 0,
        children: Vec::new(),
    };
    austin_web_core::colorize(&frame, highlighted).to_hex()
}

/// Whole seconds as `HH:MM:SS`.
#[wasm_bindgen]
pub fn format_duration(seconds: f64) -> String {
    format_hhmmss(seconds.max(0.0) as u64)
}

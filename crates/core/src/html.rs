//! Compiles a frame tree into a standalone HTML flame graph page.
//!
//! Every frame is annotated with its fill and label up front. The page
//! script only recomputes the percentage, against the frame the chart is
//! currently zoomed into.

use austin_web_protocol::{AnnotatedFrame, ChartConfig, Easing};
use thiserror::Error;

use crate::chart::ChartState;
use crate::color::SEARCH_ACCENT;
use crate::model::{FrameId, FrameTree};

const PAGE_TEMPLATE: &str = include_str!("../assets/flamegraph.html");

const OPEN: &str = "((%";
const CLOSE: &str = "%))";

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("frame {0} is missing from the tree")]
    MissingFrame(FrameId),
    #[error("serializing frame data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Replace every `((% key %))` marker with its value.
///
/// Markers whose key is unknown or maps to an empty value are left as
/// they are. Substituted values are not scanned for further markers.
pub fn replace_placeholders(text: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find(CLOSE) else {
            break;
        };
        let marker_end = start + OPEN.len() + end + CLOSE.len();
        let key = after[..end].trim();

        out.push_str(&rest[..start]);
        match values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .filter(|v| !v.is_empty())
        {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..marker_end]),
        }
        rest = &rest[marker_end..];
    }

    out.push_str(rest);
    out
}

/// Annotate the whole tree with the state's fill and label callbacks.
pub fn annotate(tree: &FrameTree, state: &ChartState) -> Result<AnnotatedFrame, CompileError> {
    annotate_node(tree, state, tree.root())
}

fn annotate_node(
    tree: &FrameTree,
    state: &ChartState,
    id: FrameId,
) -> Result<AnnotatedFrame, CompileError> {
    let node = tree.node(id).ok_or(CompileError::MissingFrame(id))?;
    let fill = state.fill(tree, id).ok_or(CompileError::MissingFrame(id))?;
    let label = state.label(tree, id).ok_or(CompileError::MissingFrame(id))?;
    let parts = state.labeler().parts(node);
    let children = node
        .children
        .iter()
        .map(|&child| annotate_node(tree, state, child))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnnotatedFrame {
        id: id.0,
        name: node.name.clone(),
        file: node.file.clone(),
        value: node.value,
        fill,
        label,
        head: parts.head,
        tail: parts.tail,
        children,
    })
}

/// Fill the page template with a JSON data blob and chart settings.
///
/// `data_json` is inserted verbatim inside a `<script>` element.
pub fn render_page(data_json: &str, config: &ChartConfig) -> String {
    let profile_type = config.mode.title();
    let title = if config.title.is_empty() {
        format!("{profile_type} Profile")
    } else {
        config.title.clone()
    };
    let title = escape_html(&title);
    let cell_height = config.cell_height.to_string();
    let transition = config.transition_ms.to_string();
    let min_frame_size = config.min_frame_size.to_string();
    let height = config.pixel_height().to_string();
    let accent = SEARCH_ACCENT.to_hex();
    let easing = match config.easing {
        Easing::Linear => "d3.easeLinear",
        Easing::Cubic => "d3.easeCubic",
    };

    replace_placeholders(
        PAGE_TEMPLATE,
        &[
            ("data", data_json),
            ("title", title.as_str()),
            ("profile_type", profile_type),
            ("mode", config.mode.code()),
            ("cell_height", cell_height.as_str()),
            ("height", height.as_str()),
            ("transition", transition.as_str()),
            ("easing", easing),
            ("min_frame_size", min_frame_size.as_str()),
            ("sort", if config.sort { "true" } else { "false" }),
            ("inverted", if config.inverted { "true" } else { "false" }),
            ("accent", accent.as_str()),
        ],
    )
}

/// Compile a tree into a complete HTML page.
pub fn compile_page(tree: &FrameTree, state: &ChartState) -> Result<String, CompileError> {
    let annotated = annotate(tree, state)?;
    let json = serde_json::to_string(&annotated)?;
    let page = render_page(&escape_script(&json), state.config());
    tracing::debug!(frames = tree.len(), bytes = page.len(), "compiled flame graph page");
    Ok(page)
}

/// Keep embedded JSON from closing the surrounding `<script>` element.
fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

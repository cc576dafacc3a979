//! Interaction state of a flame chart, owned by whoever drives the UI.
//!
//! The chart widget does layout and drawing; this object holds the
//! transient state it needs (zoom focus, search term, hovered frame,
//! dimensions) and answers the widget's color and label callbacks.

use austin_web_protocol::{ChartConfig, Color};
use serde::{Deserialize, Serialize};

use crate::color::Colorizer;
use crate::label::{Labeler, percentage_root};
use crate::model::{FrameId, FrameNode, FrameTree};

/// Outcome of a search: how many frames matched and the total value they
/// cover (matches nested under another match are not counted twice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchSummary {
    pub matches: usize,
    pub value: u64,
}

#[derive(Debug, Clone)]
pub struct ChartState {
    config: ChartConfig,
    colorizer: Colorizer,
    labeler: Labeler,
    search: Option<String>,
    zoom: Option<FrameId>,
    hovered: Option<FrameId>,
}

impl ChartState {
    pub fn new(config: ChartConfig) -> Self {
        let colorizer = Colorizer::new(config.source_extension.clone());
        let labeler = Labeler::new(config.mode, config.time_style);
        Self {
            config,
            colorizer,
            labeler,
            search: None,
            zoom: None,
            hovered: None,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn colorizer(&self) -> &Colorizer {
        &self.colorizer
    }

    pub fn labeler(&self) -> &Labeler {
        &self.labeler
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn zoom(&self) -> Option<FrameId> {
        self.zoom
    }

    pub fn hovered(&self) -> Option<FrameId> {
        self.hovered
    }

    // --- Interactions ---

    /// Highlight frames matching `term`. An empty term leaves the current
    /// search untouched and returns `None`.
    pub fn search(&mut self, tree: &FrameTree, term: &str) -> Option<SearchSummary> {
        if term.is_empty() {
            return None;
        }
        self.search = Some(term.to_string());
        let summary = self.summarize(tree);
        tracing::debug!(term, matches = summary.matches, "search");
        Some(summary)
    }

    /// Reaction to the search input changing: clearing the input clears
    /// the highlight.
    pub fn on_search_input(&mut self, term: &str) {
        if term.is_empty() {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.search = None;
    }

    /// Focus the chart on `id`. Returns false for unknown frames.
    pub fn zoom_to(&mut self, tree: &FrameTree, id: FrameId) -> bool {
        if tree.node(id).is_none() {
            return false;
        }
        self.zoom = (id != tree.root()).then_some(id);
        true
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = None;
    }

    pub fn hover(&mut self, id: Option<FrameId>) {
        self.hovered = id;
    }

    /// Container resized; negative or NaN widths collapse to zero.
    pub fn set_width(&mut self, width: f64) {
        self.config.width = if width.is_nan() { 0.0 } else { width.max(0.0) };
    }

    /// Set the height in rows.
    pub fn set_height(&mut self, rows: u32) {
        self.config.height = rows;
    }

    pub fn width(&self) -> f64 {
        self.config.width
    }

    pub fn pixel_height(&self) -> f64 {
        self.config.pixel_height()
    }

    // --- Callbacks (read-only) ---

    pub fn is_search_match(&self, node: &FrameNode) -> bool {
        self.search.as_deref().is_some_and(|term| {
            node.name.contains(term) || node.file.as_deref().is_some_and(|f| f.contains(term))
        })
    }

    /// Fill color for a frame.
    pub fn fill(&self, tree: &FrameTree, id: FrameId) -> Option<Color> {
        let node = tree.node(id)?;
        let highlighted = self.hovered == Some(id);
        Some(
            self.colorizer
                .fill(node, highlighted, self.is_search_match(node)),
        )
    }

    /// Label for a frame, with its percentage taken against the top-level
    /// frame of the hierarchy as currently shown.
    pub fn label(&self, tree: &FrameTree, id: FrameId) -> Option<String> {
        let node = tree.node(id)?;
        let root_id = percentage_root(id, |n| self.view_parent(tree, n));
        let root = tree.node(root_id)?;
        Some(self.labeler.label(node, root))
    }

    /// Parent links of the visible hierarchy: a zoom focus is its top.
    fn view_parent(&self, tree: &FrameTree, id: FrameId) -> Option<FrameId> {
        if self.zoom == Some(id) {
            None
        } else {
            tree.parent(id)
        }
    }

    fn summarize(&self, tree: &FrameTree) -> SearchSummary {
        let mut summary = SearchSummary::default();
        let mut pending = vec![(tree.root(), false)];
        while let Some((id, under_match)) = pending.pop() {
            let Some(node) = tree.node(id) else {
                continue;
            };
            let is_match = self.is_search_match(node);
            if is_match {
                summary.matches += 1;
                if !under_match {
                    summary.value += node.value;
                }
            }
            pending.extend(node.children.iter().map(|&c| (c, under_match || is_match)));
        }
        summary
    }
}

impl Default for ChartState {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

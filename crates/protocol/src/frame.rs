use serde::{Deserialize, Serialize};

/// One node of the flame graph data blob, as handed to the chart widget.
///
/// `value` is the aggregated metric of this frame and everything below it:
/// microseconds in time mode, kilobytes in memory mode. It is not required
/// to equal the sum of the children's values (self time may exist).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameData {
    pub name: String,
    /// Originating module path. Absent for synthetic or unresolved frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub value: u64,
    #[serde(default)]
    pub children: Vec<FrameData>,
}

impl FrameData {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            file: None,
            value,
            children: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_child(mut self, child: FrameData) -> Self {
        self.children.push(child);
        self
    }

    /// Number of frames in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(FrameData::count).sum::<usize>()
    }
}

/// A frame annotated with its precomputed fill and label, embedded into
/// compiled pages so the browser glue needs no color or label logic.
///
/// `label` carries the share of the unzoomed top frame. `head` and `tail`
/// are the same label with the ` (pct%)` cut out, so a page can recompute
/// the share against whatever frame it is zoomed into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedFrame {
    /// Arena index of the frame, for mapping chart callbacks back to it.
    pub id: usize,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub value: u64,
    pub fill: crate::Color,
    pub label: String,
    pub head: String,
    pub tail: String,
    #[serde(default)]
    pub children: Vec<AnnotatedFrame>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_file_is_omitted() {
        let frame = FrameData::new("root", 10);
        let json = serde_json::to_string(&frame).unwrap_or_default();
        assert_eq!(json, r#"{"name":"root","value":10,"children":[]}"#);
    }

    #[test]
    fn children_default_to_empty() {
        let frame: FrameData =
            serde_json::from_str(r#"{"name":"foo","file":"foo.py","value":3}"#)
                .unwrap_or_else(|_| FrameData::new("", 0));
        assert_eq!(frame.file.as_deref(), Some("foo.py"));
        assert!(frame.children.is_empty());
    }

    #[test]
    fn count_includes_descendants() {
        let tree = FrameData::new("root", 3)
            .with_child(FrameData::new("a", 2).with_child(FrameData::new("b", 1)))
            .with_child(FrameData::new("c", 1));
        assert_eq!(tree.count(), 4);
    }
}

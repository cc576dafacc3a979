//! Human-readable frame labels for the chart's label/tooltip slot.

use austin_web_protocol::{ProfileMode, TimeStyle};

use crate::model::{FrameId, FrameInfo};

/// Escape the first `<` and the first `>` of a frame name.
///
/// Only the first occurrence of each is replaced; names with several
/// angle brackets keep the rest verbatim. Existing compiled pages depend
/// on this exact output.
pub fn esc(text: &str) -> String {
    text.replacen('<', "&lt;", 1).replacen('>', "&gt;", 1)
}

/// Whole seconds as `HH:MM:SS`; hours grow past two digits if needed.
pub fn format_hhmmss(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Kilobytes below 1024 verbatim, otherwise whole megabytes (truncated).
pub fn format_memory(kilobytes: u64) -> String {
    if kilobytes < 1024 {
        format!("{kilobytes} KB")
    } else {
        format!("{} MB", kilobytes >> 10)
    }
}

/// `value / root * 100` with exactly two decimals.
///
/// Exact ties round up (`3.125` → `3.13`), matching how browsers render
/// the same share with `toFixed(2)`.
pub fn format_percentage(value: u64, root: u64) -> String {
    let pct = value as f64 / root as f64 * 100.0;
    // A double sits exactly halfway between two hundredths only when it is
    // an odd number of eighths; `{:.2}` would send those to even.
    if (pct * 8.0) % 2.0 == 1.0 {
        return format!("{:.2}", (pct * 100.0).ceil() / 100.0);
    }
    format!("{pct:.2}")
}

/// The frame whose value is the 100% reference for `id`.
///
/// Walks up while the parent itself has a parent, so the result is the
/// top-level frame just below the hierarchy root; a root is its own
/// reference. `parent_of` describes the hierarchy as currently shown, so
/// a zoomed chart passes a view whose top has no parent.
pub fn percentage_root(id: FrameId, parent_of: impl Fn(FrameId) -> Option<FrameId>) -> FrameId {
    let mut current = id;
    while let Some(parent) = parent_of(current) {
        if parent_of(parent).is_none() {
            break;
        }
        current = parent;
    }
    current
}

fn module_suffix(frame: &impl FrameInfo) -> String {
    frame
        .file()
        .map(|file| format!(" in {file}"))
        .unwrap_or_default()
}

/// A label split around its percentage.
///
/// `head (pct%)tail` is the full label. Renderers that track which frame
/// is currently on top fill in the share themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelParts {
    pub head: String,
    pub tail: String,
}

impl LabelParts {
    pub fn with_percentage(&self, value: u64, root: u64) -> String {
        format!("{} ({}%){}", self.head, format_percentage(value, root), self.tail)
    }
}

pub fn time_label_parts(frame: &impl FrameInfo, style: TimeStyle) -> LabelParts {
    let value = match style {
        TimeStyle::Microseconds => format!("{} μs", frame.value()),
        TimeStyle::Clock => format_hhmmss(frame.value() / 1_000_000),
    };
    LabelParts {
        head: format!("{} 🕘 {value}", esc(frame.name())),
        tail: module_suffix(frame),
    }
}

pub fn memory_label_parts(frame: &impl FrameInfo) -> LabelParts {
    LabelParts {
        head: format!("{} 📏 {}", esc(frame.name()), format_memory(frame.value())),
        tail: module_suffix(frame),
    }
}

pub fn time_label(frame: &impl FrameInfo, root: &impl FrameInfo, style: TimeStyle) -> String {
    time_label_parts(frame, style).with_percentage(frame.value(), root.value())
}

pub fn memory_label(frame: &impl FrameInfo, root: &impl FrameInfo) -> String {
    memory_label_parts(frame).with_percentage(frame.value(), root.value())
}

/// Picks the label variant for a profile mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Labeler {
    pub mode: ProfileMode,
    pub time_style: TimeStyle,
}

impl Labeler {
    pub fn new(mode: ProfileMode, time_style: TimeStyle) -> Self {
        Self { mode, time_style }
    }

    pub fn parts(&self, frame: &impl FrameInfo) -> LabelParts {
        match self.mode {
            ProfileMode::Time => time_label_parts(frame, self.time_style),
            ProfileMode::Memory => memory_label_parts(frame),
        }
    }

    pub fn label(&self, frame: &impl FrameInfo, root: &impl FrameInfo) -> String {
        self.parts(frame).with_percentage(frame.value(), root.value())
    }
}

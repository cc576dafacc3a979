use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What the frame values measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProfileMode {
    /// Elapsed time in microseconds.
    #[default]
    #[serde(rename = "t")]
    Time,
    /// Memory in kilobytes.
    #[serde(rename = "m")]
    Memory,
}

impl ProfileMode {
    /// The short code used by the page glue (`"t"` / `"m"`).
    pub fn code(self) -> &'static str {
        match self {
            Self::Time => "t",
            Self::Memory => "m",
        }
    }

    /// Human-readable profile type shown in page titles.
    pub fn title(self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::Memory => "Memory",
        }
    }
}

impl fmt::Display for ProfileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown profile mode {0:?} (expected \"t\" or \"m\")")]
pub struct UnknownMode(pub String);

impl FromStr for ProfileMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "t" | "time" => Ok(Self::Time),
            "m" | "memory" => Ok(Self::Memory),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// How time values are rendered in labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeStyle {
    /// Raw microseconds: `65000000 μs`.
    #[default]
    Microseconds,
    /// Whole seconds as `HH:MM:SS`.
    Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    Cubic,
}

/// Settings handed to the chart widget plus the knobs of the color and
/// label callbacks. Every field has a default so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart width in pixels.
    pub width: f64,
    /// Chart height in rows; pixel height is `height * cell_height`.
    pub height: u32,
    pub cell_height: f64,
    /// Draw root at the top instead of the bottom.
    pub inverted: bool,
    pub transition_ms: u32,
    pub easing: Easing,
    /// Frames narrower than this many pixels are not drawn.
    pub min_frame_size: f64,
    /// Sort siblings by name instead of keeping insertion order.
    pub sort: bool,
    pub title: String,
    pub mode: ProfileMode,
    pub time_style: TimeStyle,
    /// Module extension marking frames of the profiled language's own
    /// source (more saturated colors).
    pub source_extension: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 0,
            cell_height: 18.0,
            inverted: false,
            transition_ms: 250,
            easing: Easing::Cubic,
            min_frame_size: 0.0,
            sort: true,
            title: String::new(),
            mode: ProfileMode::Time,
            time_style: TimeStyle::Microseconds,
            source_extension: ".py".to_string(),
        }
    }
}

impl ChartConfig {
    /// Pixel height of the chart.
    pub fn pixel_height(&self) -> f64 {
        f64::from(self.height) * self.cell_height
    }
}

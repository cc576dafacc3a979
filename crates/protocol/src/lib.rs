pub mod config;
pub mod frame;
pub mod types;

pub use config::{ChartConfig, Easing, ProfileMode, TimeStyle, UnknownMode};
pub use frame::{AnnotatedFrame, FrameData};
pub use types::{Color, Hsl};

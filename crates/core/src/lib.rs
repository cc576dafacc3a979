//! Frame colorization, labeling and page compilation for austin-web.
//!
//! ```text
//!   austin samples ─▶ ProfileBuilder ─▶ FrameTree ─┬─▶ ChartState callbacks (fill, label)
//!   data blob (JSON) ─────────────────────────────┘        │
//!                                                           └─▶ html::compile_page
//! ```

pub mod chart;
pub mod color;
pub mod html;
pub mod label;
pub mod model;

pub use chart::{ChartState, SearchSummary};
pub use color::{Colorizer, colorize};
pub use html::{CompileError, compile_page};
pub use label::{LabelParts, Labeler, esc, format_hhmmss};

pub mod builder;
pub mod sample;
pub mod tree;

pub use builder::{ProfileBuilder, parse_samples};
pub use sample::{Sample, SampleFrame, SampleParseError};
pub use tree::{FrameId, FrameInfo, FrameNode, FrameTree, parse_frame_data};

//! Frame acquisition: the luma [`Frame`] type and the [`FrameSource`]
//! boundary the pipeline pulls frames through.
//!
//! Real camera drivers sit behind [`FrameSource`]; the in-tree
//! [`PatternSource`] renders a synthetic sweeping line for the demo
//! binary and the tests.

mod source;
mod types;

pub use source::{FrameSource, PatternSource};
pub use types::{Frame, Resolution};

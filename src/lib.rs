//! linesense library crate.
//!
//! Real-time line-following sensing: luma frames are reduced to
//! per-band centroids ([`vision`]), turned into a smoothed steering
//! signal ([`steering`]) and relayed across worker threads ([`relay`],
//! [`pipeline`]) to a serial transmitter ([`serial`]).

pub mod camera;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod relay;
pub mod serial;
pub mod steering;
pub mod vision;

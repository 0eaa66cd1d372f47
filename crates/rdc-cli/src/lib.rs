//! Library side of the `rdc` binary.

pub mod config;
pub mod logging;
pub mod pipeline;

//! Library side of the `rtx` command: logging setup and file orchestration.

pub mod logging;
pub mod pipeline;
pub mod types;

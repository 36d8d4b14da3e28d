//! Console logging built on [`tracing`].

mod logger;
mod subscriber;

pub use logger::{DRY_RUN_TARGET, Logger, STAGE_TARGET};
pub use subscriber::{RunnerFormatter, init_subscriber};

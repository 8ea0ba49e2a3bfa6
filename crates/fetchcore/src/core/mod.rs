//! Core utilities, configuration, and logging

pub mod config;
pub mod logging;
pub mod utils;

// Re-exports for convenience
pub use logging::init_logger;
pub use utils::{display_name, sanitize_filename};

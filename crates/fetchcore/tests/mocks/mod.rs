//! Mock implementations for orchestrator tests
//!
//! Scripted extraction engines that never touch the network.

pub mod fake_engine;

pub use fake_engine::{DownloadOutcome, FakeEngine};

//! Tokensync Test Harness
//!
//! Shared fixtures and fakes for the tokensync crates: a sample variable
//! graph that extracts into every token file, and a fake GitHub server
//! that serves published files and records dispatches.

pub mod context;
pub mod fixtures;
pub mod github;

pub use context::TestContext;
pub use fixtures::{sample_graph, snapshot_json, GraphBuilder};
pub use github::FakeGitHub;

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

/// Initialize the test harness with tracing support
pub fn init() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,tokensync=debug"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_file(true)
            .with_line_number(true)
            .try_init()
            .ok();
    });

    Lazy::force(&INIT);
}

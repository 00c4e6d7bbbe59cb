mod exec_log;
pub use exec_log::ExecLog;

pub mod fixtures;
pub use fixtures::Fixture;

mod logging_driver;
pub use logging_driver::{DriverOp, LoggingDriver};

pub use std_util::*;

/// Installs a `tracing` subscriber honoring `RUST_LOG`. Safe to call from
/// every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

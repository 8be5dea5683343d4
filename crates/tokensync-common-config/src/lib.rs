//! Configuration for tokensync.
//!
//! Settings live in `.tokensync/config.yaml`; values may reference
//! environment variables as `${VAR}` or `${VAR:-default}`.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;

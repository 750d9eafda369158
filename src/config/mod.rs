// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod config;
pub mod logging;
pub mod secret;
pub mod upstream;

pub use config::*;
pub use logging::*;
pub use secret::*;
pub use upstream::*;

//! Centralized mocks and fixtures for testing
//!
//! Reusable settings and engine builders shared by the integration tests.

pub mod configs;
pub mod engines;

// Re-export commonly used items for convenience
#[allow(unused_imports)]
pub use configs::MockConfigs;
#[allow(unused_imports)]
pub use engines::TestEngine;

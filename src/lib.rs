pub mod config;
pub mod coordinator;
pub mod error;
pub mod export;
pub mod media_types;
pub mod player;
pub mod selection;
#[cfg(any(test, feature = "integration-test-api"))]
pub mod test_support;
pub mod timefmt;

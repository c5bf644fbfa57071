//! Shared fixtures for resolver integration tests.

#[allow(dead_code)]
pub mod mock_site;

//! Shared test utilities for orgpush.

pub mod fixtures;

#[cfg(unix)]
pub use fixtures::FakeGit;
pub use fixtures::WorkDirFixture;

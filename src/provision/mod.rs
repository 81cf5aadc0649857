//! Repository provisioning.
//!
//! Creates the target repository through the GitHub REST API before anything
//! touches the local working copy.

pub mod client;

pub use client::{CreateRepoRequest, CreatedRepository, GitHubClient};

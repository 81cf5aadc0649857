//! orgpush - create a repository in a GitHub organization and push the
//! current directory to it.
//!
//! The run is two steps in strict order: [`provision`] creates the repository
//! through the REST API, then [`publish`] commits the working directory and
//! pushes `master` to the new remote.

pub mod app;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod provision;
pub mod publish;
pub mod test_utils;
pub mod utils;

pub use error::{OrgpushError, Result};

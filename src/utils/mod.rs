//! Utility functions and helpers.

pub mod git;

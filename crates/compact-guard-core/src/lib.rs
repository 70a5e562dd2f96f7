//! compact-guard Core Library
//!
//! Extracts a fixed-schema decision summary from a session transcript before
//! the host compacts it, stores it per project, and re-injects it when the
//! session resumes.

pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod hooks;
pub mod inject;
pub mod logging;
pub mod project_key;
pub mod store;
pub mod summary;
pub mod transcript;

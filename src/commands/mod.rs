//! CLI commands for compact-guard

pub mod dispatch;
pub mod extract;
pub mod hook;
pub mod key;
pub mod show;
pub mod status;

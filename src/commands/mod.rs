//! CLI commands

pub mod build;
pub mod check;
pub mod clean;
pub mod init;
pub mod new;
pub mod render;

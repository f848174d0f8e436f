//! CLI subcommands other than `server`

pub mod config;
pub mod list;
pub mod show;

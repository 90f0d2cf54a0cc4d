//! CLI subcommands

pub mod headings;
pub mod list;
pub mod show;

//! CLI command handlers

pub mod config;
pub mod remove;
pub mod search;
pub mod show;
pub mod tag;
pub mod untag;

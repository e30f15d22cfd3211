//! Changelog and manifest reports over a local git history, plus a WIP push gate.

pub mod changelog;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod manifest;
pub mod model;
pub mod util;
pub mod wip;

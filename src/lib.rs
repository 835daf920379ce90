//! `license-harvest` — third-party license compliance for npm projects.
//!
//! # Flow
//! 1. Collect the installed dependency tree ([`collector`]), apply
//!    [`overrides`], and write the CSV manifest ([`manifest`]).
//! 2. Summarize licenses and check the unknown/copyleft policy ([`license`]).
//! 3. Download each package's license text into a cached directory ([`fetcher`]).
//! 4. Render the HTML report ([`report::html`]).

pub mod cli;
pub mod collector;
pub mod config;
pub mod fetcher;
pub mod license;
pub mod logging;
pub mod manifest;
pub mod models;
pub mod overrides;
pub mod report;

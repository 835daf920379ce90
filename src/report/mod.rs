//! Output renderers.
//!
//! - [`terminal`] — colored summary tables for the manifest and download steps; respects `--quiet`.
//! - [`html`] — the third-party license page, rendered from a Jinja template.

pub mod html;
pub mod terminal;

//! Core domain entities representing the render data model.
//!
//! Entities are plain data structures; parsing helpers live next to the
//! types they produce.
//!
//! # Entity Types
//!
//! - [`Color`] - RGB color with hex conversion
//! - [`RenderRequest`] - Fully resolved render parameters
//! - [`StyleDefaults`] - Global defaults applied during resolution
//! - [`OutputFormat`], [`ModuleStyle`], [`EyeStyle`] - Closed style vocabularies

pub mod color;
pub mod render_request;

pub use color::{Color, InvalidColor};
pub use render_request::{
    EyeStyle, MAX_LOGO_SIZE_PERCENT, MAX_MARGIN, MAX_SIZE, MIN_LOGO_SIZE_PERCENT, MIN_SIZE,
    ModuleStyle, OutputFormat, RenderRequest, StyleDefaults,
};

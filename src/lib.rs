//! Image redaction engine: mosaic and blur filters applied to
//! user-selected regions of a raster image, with linear undo/redo and
//! PNG/JPEG export.
//!
//! [`session::RedactionSession`] is the main entry point; the modules
//! underneath it are usable on their own.

pub mod buffer;
pub mod compose;
pub mod error;
pub mod export;
pub mod filter;
pub mod geometry;
pub mod history;
pub mod loader;
pub mod logging;
pub mod mapper;
pub mod selection;
pub mod session;

pub use error::{AppError, AppResult};

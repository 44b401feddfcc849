//! Gang sheet editor engine.
//!
//! Composes print-ready "gang sheets": uploaded raster images and text
//! labels laid out on a sheet sized in physical units at a fixed 300 DPI.
//! The crate compiles to WebAssembly for the browser editor and natively for
//! the headless `gangsheet` host. All editor state lives in
//! [`engine::EngineCore`]; every user action goes through
//! [`engine::EngineCore::handle`], and the canvas is redrawn from scratch from
//! the pure [`render::render`] display list.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Event dispatcher [`engine::EngineCore`] and browser wrapper [`engine::Engine`] |
//! | [`doc`] | Placed elements and the element store with its selection |
//! | [`hit`] | Hit-testing against element bounding boxes |
//! | [`input`] | Pointer events, view toggles and the drag state machine |
//! | [`viewport`] | Client-to-canvas coordinate transform and fit-to-container scale |
//! | [`layout`] | Auto-arrange row flow |
//! | [`units`] | Inch/centimeter conversion and sheet dimensions |
//! | [`render`] | Display-list construction |
//! | [`web`] | Display-list replay on a browser 2D context |
//! | [`raster`] | Display-list replay into a pixmap |
//! | [`export`] | PNG and PDF encoding |
//! | [`error`] | Editor and export error types |
//! | [`consts`] | Shared constants (DPI, margins, stroke widths, file names) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod export;
pub mod hit;
pub mod input;
pub mod layout;
pub mod raster;
pub mod render;
pub mod units;
pub mod viewport;
pub mod web;

//! Fixed-ratio image cropping widget for the browser.
//!
//! This crate is compiled to WebAssembly. It shows an image inside a canvas
//! viewport and lets the user move and resize a crop rectangle of a fixed
//! aspect ratio, mirroring the selected region into a preview canvas. The
//! host JavaScript layer forwards pointer events and receives rectangle
//! updates through a callback.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Browser [`engine::Engine`] and testable [`engine::EngineCore`] |
//! | [`geometry`] | Rectangle math: inscribed rectangles, corner resize, clamping |
//! | [`hit`] | Hit-testing against handles and the crop body |
//! | [`input`] | Interaction state machine types |
//! | [`config`] | Widget configuration parsed from JSON |
//! | [`render`] | Applies engine actions to a [`surface::Surface`] |
//! | [`surface`] | Draw-target and image-source seams plus their web implementations |
//! | [`error`] | The crate error type |
//! | [`consts`] | Shared numeric defaults (handle sizes, preview width) |

pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod render;
pub mod surface;

use wasm_bindgen::prelude::wasm_bindgen;

/// Module start hook: routes panics and `log` records to the browser console.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::warn!("console logger was already installed");
    }
}

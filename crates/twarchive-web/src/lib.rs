#![forbid(unsafe_code)]

//! Browser bindings for the `twarchive-frame` protocol.
//!
//! Two entry points are exported to JavaScript:
//!
//! - `ChildFrame`, constructed inside each embedded post document. It owns the
//!   resize observer, the explanation toggle and the data URI escape hatch.
//! - `HostFrame`, constructed once in the top-level page. It listens for
//!   `message` events and resizes frames or displays data URIs.
//!
//! The module start hook checks the page address for a smuggled data URI and
//! displays it before anything else runs.
//!
//! Everything touching `web-sys` is compiled only on `wasm32`; the DOM string
//! conventions in [`dom`] are shared and unit tested natively.

pub mod dom;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{ChildFrame, ConsoleLogSink, HostFrame, WebPage, WebRootObserver, message_value};

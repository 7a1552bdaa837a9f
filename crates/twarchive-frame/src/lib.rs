#![forbid(unsafe_code)]

//! Cross-frame messaging for sandboxed archived-post embeds.
//!
//! Each archived post is rendered into its own sandboxed `<iframe>`. The
//! embedded document has no script access to the host page, so the two sides
//! talk only through `postMessage`:
//!
//! - **Child side**: [`observer::ResizeObservationAgent`] reports content size
//!   changes, [`escape::DataUriEscapeAgent`] asks the host to show a data URI.
//! - **Host side**: [`dispatch::HostMessageDispatcher`] classifies everything
//!   arriving on the shared channel and routes it to
//!   [`resolver::FrameHeightResolver`] or [`render::TopLevelDataUriRenderer`].
//!
//! Nothing here binds to a browser. The DOM is reached through the small
//! traits in [`host`], which `twarchive-web` implements over `web-sys` and the
//! tests implement in memory.
//!
//! The channel is not origin-checked in either direction: children post to
//! `"*"` and the host accepts any sender.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod escape;
pub mod host;
pub mod identity;
pub mod marker;
pub mod message;
pub mod observer;
pub mod render;
pub mod resolver;

#[cfg(test)]
mod testing;

pub use config::FrameConfig;
pub use dispatch::{DispatchOutcome, HostMessageDispatcher};
pub use error::{FrameError, Result};
pub use escape::{DataUriEscapeAgent, EscapeRoute};
pub use host::{
    AddressBar, ChildDocument, DocumentSurface, ExplanationPanel, FrameHost, LogSink, ParentChannel,
    RootObserver, TracingLogSink,
};
pub use identity::{FrameIdentity, FrameSelector};
pub use marker::{MarkerCodec, MarkerDetector, MarkerState};
pub use message::{FrameMessage, Inbound, LogLevel, ResizeReport};
pub use observer::{ObservationState, ResizeObservationAgent, SizeReporter};
pub use render::{SandboxedFrame, TopLevelDataUriRenderer};
pub use resolver::{FrameHeightResolver, HEIGHT_PAD, ResizeSummary};

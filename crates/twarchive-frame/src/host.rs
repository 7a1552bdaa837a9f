//! Seams between the protocol and the document it runs in.
//!
//! `twarchive-web` implements these over `web-sys`; tests implement them in
//! memory. Every method is synchronous: each document runs a single
//! cooperative event loop and nothing here blocks.

use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::message::{FrameMessage, LogLevel};
use crate::observer::SizeReporter;
use crate::render::SandboxedFrame;

/// The `postMessage` link from an embedded document to its parent.
pub trait ParentChannel {
    /// True when this document is the top-level browsing context.
    fn is_top_level(&self) -> bool;

    /// Fire-and-forget post to the parent, any origin.
    fn post_to_parent(&self, message: &FrameMessage) -> Result<()>;
}

/// A platform size observer bound to the document root element.
pub trait RootObserver {
    fn observe(&self) -> Result<()>;
    fn unobserve(&self) -> Result<()>;
}

/// The embedded document as seen by the resize loop.
pub trait ChildDocument: ParentChannel {
    type Observer: RootObserver;

    /// Create the platform observer. Its callback hands every size change to
    /// [`SizeReporter::on_size_observed`].
    fn create_observer(&self, reporter: SizeReporter) -> Result<Self::Observer>;

    /// Current viewport `(width, height)`.
    fn viewport_size(&self) -> (f64, f64);
}

/// The collapsible "about this archive" panel inside an embed.
pub trait ExplanationPanel {
    fn is_shown(&self) -> bool;
    fn set_shown(&self, shown: bool);
}

/// Host-document access to the embed frames.
pub trait FrameHost {
    type Frame;

    fn frames_with_class(&self, class: &str) -> Vec<Self::Frame>;

    /// Height of the frame's embedded content root, or `None` while the
    /// embedded document has no body yet.
    fn content_height(&self, frame: &Self::Frame) -> Option<f64>;

    fn set_frame_height(&self, frame: &Self::Frame, height: f64);

    fn frame_attribute(&self, frame: &Self::Frame, name: &str) -> Option<String>;

    /// Open or close every collapsible with `class`; returns how many changed.
    fn set_collapsibles_open(&self, class: &str, open: bool) -> usize;
}

/// The visible page address.
pub trait AddressBar {
    fn href(&self) -> Result<String>;

    /// Navigate the current browsing context to `href`.
    fn assign(&self, href: &str) -> Result<()>;
}

/// Whole-document replacement used to display untrusted content.
pub trait DocumentSurface {
    /// Discard the current document content, leaving `markup` as the root's
    /// inner HTML and `body_style` on the new body.
    fn reset_to_blank(&self, markup: &str, body_style: &str) -> Result<()>;

    fn append_frame(&self, frame: &SandboxedFrame) -> Result<()>;
}

/// Host logging sink for forwarded child logs and protocol errors.
pub trait LogSink {
    fn log(&self, level: LogLevel, message: &str);
}

impl<T: LogSink + ?Sized> LogSink for &T {
    fn log(&self, level: LogLevel, message: &str) {
        (**self).log(level, message);
    }
}

/// Routes sink records into `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => debug!(target: "twarchive_frame::sink", "{message}"),
            LogLevel::Log | LogLevel::Info => info!(target: "twarchive_frame::sink", "{message}"),
            LogLevel::Warn => warn!(target: "twarchive_frame::sink", "{message}"),
            LogLevel::Error => error!(target: "twarchive_frame::sink", "{message}"),
        }
    }
}

//! Full-page display of an untrusted data URI.
//!
//! The current document is discarded and replaced by a bare one holding a
//! single viewport-sized `<iframe sandbox="">`. The empty sandbox policy
//! denies scripts, same-origin access and forms.
//!
//! Rendering discards the document that called it, so it runs at most once
//! per document lifetime in practice. The usual trigger is the load-time
//! marker check ([`TopLevelDataUriRenderer::display_marked_address`]).

use tracing::info;

use crate::error::Result;
use crate::host::{AddressBar, DocumentSurface};
use crate::marker::{MarkerCodec, MarkerDetector, MarkerState};

/// Root inner HTML after teardown: empty head, empty body.
pub const BLANK_DOCUMENT: &str = "<head></head><body></body>";
pub const BODY_STYLE: &str = "margin: 0; padding: 0;";
pub const FRAME_STYLE: &str = "display: block; border: none; width: 100vw; height: 100vh;";

/// The one element inserted into the blank document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxedFrame {
    pub src: String,
    /// Always empty: the most restrictive policy.
    pub sandbox: &'static str,
    pub style: &'static str,
}

impl SandboxedFrame {
    #[must_use]
    pub fn for_data_uri(data_uri: &str) -> Self {
        Self {
            src: data_uri.to_string(),
            sandbox: "",
            style: FRAME_STYLE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TopLevelDataUriRenderer {
    codec: MarkerCodec,
}

impl TopLevelDataUriRenderer {
    #[must_use]
    pub fn new(codec: MarkerCodec) -> Self {
        Self { codec }
    }

    #[must_use]
    pub fn codec(&self) -> &MarkerCodec {
        &self.codec
    }

    pub fn render(&self, surface: &impl DocumentSurface, data_uri: &str) -> Result<()> {
        info!(
            target: "twarchive_frame::render",
            uri_len = data_uri.len(),
            "replacing document with sandboxed data URI frame"
        );
        surface.reset_to_blank(BLANK_DOCUMENT, BODY_STYLE)?;
        surface.append_frame(&SandboxedFrame::for_data_uri(data_uri))
    }

    /// Write the marker-encoded address, so a reload or shared link shows the
    /// same content, then render.
    pub fn navigate_and_render<P>(&self, page: &P, data_uri: &str) -> Result<()>
    where
        P: AddressBar + DocumentSurface,
    {
        let target = self.codec.encode(&page.href()?, data_uri);
        page.assign(&target)?;
        self.render(page, data_uri)
    }

    /// Load-time entry point: render if `href` carries the marker.
    /// Returns whether a data URI was displayed.
    pub fn display_marked_address(
        &self,
        detector: &mut MarkerDetector,
        surface: &impl DocumentSurface,
        href: &str,
    ) -> Result<bool> {
        let MarkerState::MarkerFound(data_uri) = detector.check(href) else {
            return Ok(false);
        };
        let data_uri = data_uri.clone();
        self.render(surface, &data_uri)?;
        Ok(true)
    }
}

//! Child-side request to show a data URI.
//!
//! A sandboxed embed cannot navigate the top-level page itself, so it asks
//! its parent to. A document that already is the top level renders directly.

use tracing::debug;

use crate::error::Result;
use crate::host::{AddressBar, DocumentSurface, ParentChannel};
use crate::message::FrameMessage;
use crate::render::TopLevelDataUriRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeRoute {
    /// Top-level document: address updated and data URI rendered in place.
    Rendered,
    /// Embedded document: `display-data-uri` posted to the parent.
    Forwarded,
}

#[derive(Debug, Clone, Default)]
pub struct DataUriEscapeAgent {
    renderer: TopLevelDataUriRenderer,
}

impl DataUriEscapeAgent {
    #[must_use]
    pub fn new(renderer: TopLevelDataUriRenderer) -> Self {
        Self { renderer }
    }

    /// The message carries the URI as a structured value, so it reaches the
    /// parent unchanged without extra escaping.
    pub fn handle<P>(&self, page: &P, data_uri: &str) -> Result<EscapeRoute>
    where
        P: ParentChannel + AddressBar + DocumentSurface,
    {
        if page.is_top_level() {
            self.renderer.navigate_and_render(page, data_uri)?;
            return Ok(EscapeRoute::Rendered);
        }
        debug!(
            target: "twarchive_frame::escape",
            uri_len = data_uri.len(),
            "forwarding data URI to parent"
        );
        page.post_to_parent(&FrameMessage::DisplayDataUri {
            data_uri: data_uri.to_string(),
        })?;
        Ok(EscapeRoute::Forwarded)
    }
}

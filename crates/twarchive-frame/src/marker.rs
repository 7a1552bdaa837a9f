//! Smuggling a data URI through the page address.
//!
//! The URI is appended after a fixed marker:
//!
//! ```text
//! https://example.org/posts/1234/?twarchive-datauri#data:image/png;base64,...
//! ```
//!
//! Decoding is positional. A data URI may contain `?`, `#` and `=`, so the
//! address is never run through a query-string parser; everything after the
//! first marker occurrence is the URI, byte for byte.

use tracing::debug;

/// Fragment-based marker. The older query-prefix form is not accepted.
pub const MARKER: &str = "?twarchive-datauri#";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerCodec {
    marker: String,
}

impl Default for MarkerCodec {
    fn default() -> Self {
        Self::new(MARKER)
    }
}

impl MarkerCodec {
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Build the address that displays `data_uri` when loaded.
    ///
    /// Any existing fragment or marker on `current_href` is dropped first, so
    /// the only marker in the result is the one preceding `data_uri`.
    #[must_use]
    pub fn encode(&self, current_href: &str, data_uri: &str) -> String {
        let base = self.base_address(current_href);
        let mut out = String::with_capacity(base.len() + self.marker.len() + data_uri.len());
        out.push_str(base);
        out.push_str(&self.marker);
        out.push_str(data_uri);
        out
    }

    /// Everything after the first marker, verbatim. `None` when there is no
    /// marker or nothing follows it.
    #[must_use]
    pub fn decode<'a>(&self, href: &'a str) -> Option<&'a str> {
        if self.marker.is_empty() {
            return None;
        }
        let idx = href.find(self.marker.as_str())?;
        let payload = &href[idx + self.marker.len()..];
        (!payload.is_empty()).then_some(payload)
    }

    fn base_address<'a>(&self, href: &'a str) -> &'a str {
        let without_marker = if self.marker.is_empty() {
            href
        } else {
            href.find(self.marker.as_str())
                .map_or(href, |idx| &href[..idx])
        };
        without_marker
            .find('#')
            .map_or(without_marker, |idx| &without_marker[..idx])
    }
}

/// Load-time check for a smuggled data URI. Runs at most once per document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MarkerState {
    #[default]
    NotChecked,
    NoMarker,
    MarkerFound(String),
}

#[derive(Debug, Clone, Default)]
pub struct MarkerDetector {
    codec: MarkerCodec,
    state: MarkerState,
}

impl MarkerDetector {
    #[must_use]
    pub fn new(codec: MarkerCodec) -> Self {
        Self {
            codec,
            state: MarkerState::NotChecked,
        }
    }

    #[must_use]
    pub fn state(&self) -> &MarkerState {
        &self.state
    }

    /// Inspect `href` on the first call; later calls return the recorded state
    /// without looking at their argument.
    pub fn check(&mut self, href: &str) -> &MarkerState {
        if self.state == MarkerState::NotChecked {
            self.state = match self.codec.decode(href) {
                Some(data_uri) => {
                    debug!(
                        target: "twarchive_frame::marker",
                        uri_len = data_uri.len(),
                        "found data URI marker in address"
                    );
                    MarkerState::MarkerFound(data_uri.to_string())
                }
                None => MarkerState::NoMarker,
            };
        }
        &self.state
    }
}

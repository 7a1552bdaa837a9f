//! DOM naming conventions shared with the page templates.
//!
//! The templating layer stamps these class and attribute names onto the
//! rendered markup; the protocol only consumes them. Hosts that render with
//! different names can override any field from JSON.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameConfig {
    /// Class carried by every embed frame; selects all of them.
    pub frame_class: String,
    /// Prefix of the per-content class, followed by the content id.
    pub content_class_prefix: String,
    /// Prefix of the per-instance class, followed by the instance ordinal.
    pub instance_class_prefix: String,
    pub content_id_attribute: String,
    pub instance_attribute: String,
    /// Class of `<details>` elements toggled by the open/close-all control.
    pub collapsible_class: String,
    /// Class of the explanation panel inside an embedded document.
    pub explanation_class: String,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_class: "twarchive-html-iframe".to_string(),
            content_class_prefix: "twarchive-html-iframe-".to_string(),
            instance_class_prefix: "twarchive-html-iframe-instance-".to_string(),
            content_id_attribute: "twarchive-tweet-id".to_string(),
            instance_attribute: "twarchive-tweet-instance".to_string(),
            collapsible_class: "twarchive-collapsible".to_string(),
            explanation_class: "twarchive-about-explanation".to_string(),
        }
    }
}

impl FrameConfig {
    /// Parse a (possibly partial) JSON override. Missing fields keep defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Like [`Self::from_json`], but `None` or blank input yields defaults.
    pub fn from_optional_json(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            Some(raw) if !raw.is_empty() => Self::from_json(raw),
            _ => Ok(Self::default()),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::config::FrameConfig;

/// Identifies one embedded document on a page.
///
/// The same post may be embedded more than once, so the content id alone is
/// not enough; the instance ordinal tells the copies apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameIdentity {
    pub content_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_ordinal: Option<String>,
}

impl FrameIdentity {
    #[must_use]
    pub fn new(content_id: impl Into<String>, instance_ordinal: Option<String>) -> Self {
        Self {
            content_id: content_id.into(),
            instance_ordinal,
        }
    }

    #[must_use]
    pub fn selector(&self) -> FrameSelector {
        FrameSelector::from_parts(Some(&self.content_id), self.instance_ordinal.as_deref())
    }
}

impl core::fmt::Display for FrameIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.instance_ordinal {
            Some(ordinal) => write!(f, "{}#{ordinal}", self.content_id),
            None => f.write_str(&self.content_id),
        }
    }
}

/// Which embed frames a resize report applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSelector {
    /// Every frame carrying the shared embed class.
    Default,
    /// All instances of one piece of content.
    Content(String),
    /// Exactly one instance.
    Instance(String),
}

impl FrameSelector {
    /// Instance ordinals are more specific than content ids and win when both
    /// are present. Empty strings count as absent.
    #[must_use]
    pub fn from_parts(content_id: Option<&str>, instance_ordinal: Option<&str>) -> Self {
        let non_empty = |s: &&str| !s.is_empty();
        if let Some(ordinal) = instance_ordinal.filter(non_empty) {
            return Self::Instance(ordinal.to_string());
        }
        if let Some(id) = content_id.filter(non_empty) {
            return Self::Content(id.to_string());
        }
        Self::Default
    }

    #[must_use]
    pub fn class_name(&self, config: &FrameConfig) -> String {
        match self {
            Self::Default => config.frame_class.clone(),
            Self::Content(id) => format!("{}{id}", config.content_class_prefix),
            Self::Instance(ordinal) => format!("{}{ordinal}", config.instance_class_prefix),
        }
    }
}

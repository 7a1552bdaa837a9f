//! Wire schema of the cross-document channel.
//!
//! ```text
//! { kind: "resize", contentId?, instanceOrdinal?, width, height }
//! { kind: "display-data-uri", dataUri }
//! { kind: "child-log", level, message }
//! ```
//!
//! The channel is shared with anything else on the page (other scripts,
//! browser devtools), so inbound values are first classified and only then
//! decoded.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::identity::{FrameIdentity, FrameSelector};

/// Discriminator field present on every protocol message.
pub const KIND_FIELD: &str = "kind";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FrameMessage {
    Resize(ResizeReport),
    DisplayDataUri {
        #[serde(rename = "dataUri")]
        data_uri: String,
    },
    ChildLog {
        level: String,
        message: String,
    },
}

impl FrameMessage {
    /// Every `kind` tag, in variant order. Matches the serde renames.
    pub const KINDS: [&'static str; 3] = ["resize", "display-data-uri", "child-log"];

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Resize(_) => Self::KINDS[0],
            Self::DisplayDataUri { .. } => Self::KINDS[1],
            Self::ChildLog { .. } => Self::KINDS[2],
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Size report sent by an embedded document.
///
/// Only `height` is informational on the host; the host re-measures the
/// frame's content itself. Width and height are the child's viewport size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_ordinal: Option<String>,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl ResizeReport {
    #[must_use]
    pub fn new(identity: &FrameIdentity, width: f64, height: f64) -> Self {
        Self {
            content_id: Some(identity.content_id.clone()),
            instance_ordinal: identity.instance_ordinal.clone(),
            width,
            height,
        }
    }

    #[must_use]
    pub fn selector(&self) -> FrameSelector {
        FrameSelector::from_parts(self.content_id.as_deref(), self.instance_ordinal.as_deref())
    }
}

/// Result of classifying one value received on the shared channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Not ours: no usable `kind` tag.
    Foreign,
    /// Tagged, but with a kind this protocol does not define.
    Unrecognized { kind: String },
    /// A known kind whose payload does not decode.
    Malformed { kind: String, reason: String },
    Message(FrameMessage),
}

impl Inbound {
    /// A missing, non-string or empty `kind` makes the value foreign.
    #[must_use]
    pub fn classify(raw: &Value) -> Self {
        let Some(kind) = raw.get(KIND_FIELD).and_then(Value::as_str) else {
            return Self::Foreign;
        };
        if kind.is_empty() {
            return Self::Foreign;
        }
        if !FrameMessage::KINDS.contains(&kind) {
            return Self::Unrecognized {
                kind: kind.to_string(),
            };
        }
        match FrameMessage::deserialize(raw) {
            Ok(message) => Self::Message(message),
            Err(err) => Self::Malformed {
                kind: kind.to_string(),
                reason: err.to_string(),
            },
        }
    }

    /// Classify a JSON text. Text that is not JSON at all is foreign.
    #[must_use]
    pub fn classify_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::classify(&value),
            Err(_) => Self::Foreign,
        }
    }
}

/// Severity attached to a forwarded child log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Log,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Console method names; anything unknown degrades to `Log`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Self::Debug,
            "info" => Self::Info,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Log,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Log => "log",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

//! Host-side frame height updates.
//!
//! This is the only code that sets an embed frame's height. The child's
//! report selects which frames to update; the height itself comes from
//! measuring each frame's content root, plus [`HEIGHT_PAD`].

use tracing::{debug, trace};

use crate::config::FrameConfig;
use crate::host::FrameHost;
use crate::identity::FrameSelector;

/// Added to the measured content height to absorb sub-pixel rounding and
/// borders, which otherwise clip the last line or show a scrollbar.
pub const HEIGHT_PAD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeSummary {
    pub matched: usize,
    pub updated: usize,
    /// Frames whose embedded document has no body yet (early load).
    pub skipped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FrameHeightResolver {
    config: FrameConfig,
}

impl FrameHeightResolver {
    #[must_use]
    pub fn new(config: FrameConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn padded_height(content_height: f64) -> f64 {
        content_height + HEIGHT_PAD
    }

    pub fn apply_resize<H: FrameHost>(&self, host: &H, selector: &FrameSelector) -> ResizeSummary {
        let class = selector.class_name(&self.config);
        let frames = host.frames_with_class(&class);
        let mut summary = ResizeSummary {
            matched: frames.len(),
            ..ResizeSummary::default()
        };
        for frame in &frames {
            let Some(content_height) = host.content_height(frame) else {
                trace!(
                    target: "twarchive_frame::resolver",
                    class = %class,
                    "embedded document has no body yet; skipping frame"
                );
                summary.skipped += 1;
                continue;
            };
            let height = Self::padded_height(content_height);
            host.set_frame_height(frame, height);
            summary.updated += 1;
            let content_id = host.frame_attribute(frame, &self.config.content_id_attribute);
            let instance = host.frame_attribute(frame, &self.config.instance_attribute);
            debug!(
                target: "twarchive_frame::resolver",
                content_id = content_id.as_deref().unwrap_or("-"),
                instance = instance.as_deref().unwrap_or("-"),
                content_height,
                height,
                "resized embed frame"
            );
        }
        summary
    }
}

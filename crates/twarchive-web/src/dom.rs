//! DOM-facing string conventions.

use twarchive_frame::FrameIdentity;

/// Value for the `height` attribute of an `<iframe>`, formatted the way a JS
/// number stringifies: `250` rather than `250.0`.
#[must_use]
pub fn frame_height_attr(height: f64) -> String {
    if !height.is_finite() || height < 0.0 {
        return "0".to_string();
    }
    format!("{height}")
}

/// Inline `display` value for the explanation panel.
#[must_use]
pub const fn panel_display(shown: bool) -> &'static str {
    if shown { "block" } else { "none" }
}

/// The panel starts visible unless its inline style says `none`.
#[must_use]
pub fn display_is_hidden(display: &str) -> bool {
    display.trim().eq_ignore_ascii_case("none")
}

/// Identity as stamped by the templates. A blank ordinal means the embed is
/// the page's only instance of that content.
#[must_use]
pub fn frame_identity(content_id: &str, instance_ordinal: Option<&str>) -> FrameIdentity {
    let ordinal = instance_ordinal
        .map(str::trim)
        .filter(|ordinal| !ordinal.is_empty())
        .map(str::to_string);
    FrameIdentity::new(content_id.trim(), ordinal)
}

//! Provider URL templates.
//!
//! Pure string templating from a media reference; nothing here touches the
//! network.

pub const DEFAULT_EMBED_BASE: &str = "https://www.youtube.com/embed";
pub const DEFAULT_WATCH_BASE: &str = "https://www.youtube.com/watch";
pub const DEFAULT_THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";

/// Query string appended to every embed URL: no related videos, minimal branding.
const EMBED_QUERY: &str = "rel=0&modestbranding=1";

/// Embeddable player URL for `media_ref` on the default provider.
///
/// ```
/// use vitalfeed_core::media::embed::embed_url;
///
/// assert_eq!(
///     embed_url("yBEww8MlrEg"),
///     "https://www.youtube.com/embed/yBEww8MlrEg?rel=0&modestbranding=1"
/// );
/// ```
pub fn embed_url(media_ref: &str) -> String {
    build_embed_url(DEFAULT_EMBED_BASE, media_ref)
}

/// Non-embedded watch link for `media_ref` on the default provider.
pub fn watch_url(media_ref: &str) -> String {
    build_watch_url(DEFAULT_WATCH_BASE, media_ref)
}

/// Highest-resolution thumbnail URL for `media_ref` on the default provider.
pub fn thumbnail_url(media_ref: &str) -> String {
    format!(
        "{}/{}/{}",
        DEFAULT_THUMBNAIL_BASE,
        media_ref,
        super::thumbnail::PRIMARY_THUMBNAIL_SUFFIX
    )
}

pub(crate) fn build_embed_url(base: &str, media_ref: &str) -> String {
    format!("{}/{}?{}", base.trim_end_matches('/'), media_ref, EMBED_QUERY)
}

pub(crate) fn build_watch_url(base: &str, media_ref: &str) -> String {
    format!("{}?v={}", base.trim_end_matches('/'), media_ref)
}

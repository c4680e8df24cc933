//! Content types for files served next to the markdown document.

use std::path::Path;

pub const HTML: &str = "text/html; charset=utf-8";
pub const PLAIN: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

/// Extension (lowercase) to content type, for assets a markdown page
/// typically links or embeds.
const BY_EXTENSION: &[(&[&str], &str)] = &[
    (&["html", "htm"], HTML),
    (&["md", "markdown"], "text/markdown; charset=utf-8"),
    (&["txt"], PLAIN),
    (&["css"], "text/css; charset=utf-8"),
    (&["js", "mjs"], "text/javascript; charset=utf-8"),
    (&["json"], "application/json"),
    (&["pdf"], "application/pdf"),
    (&["svg"], "image/svg+xml"),
    (&["png"], "image/png"),
    (&["jpg", "jpeg"], "image/jpeg"),
    (&["gif"], "image/gif"),
    (&["webp"], "image/webp"),
    (&["avif"], "image/avif"),
    (&["ico"], "image/x-icon"),
    (&["mp3"], "audio/mpeg"),
    (&["mp4", "m4v"], "video/mp4"),
    (&["webm"], "video/webm"),
    (&["woff"], "font/woff"),
    (&["woff2"], "font/woff2"),
];

/// Content type for `path`, by extension. Unknown files are octet streams.
pub fn from_path(path: &Path) -> &'static str {
    let Some(ext) = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
    else {
        return OCTET_STREAM;
    };

    BY_EXTENSION
        .iter()
        .find(|(extensions, _)| extensions.contains(&ext.as_str()))
        .map_or(OCTET_STREAM, |(_, content_type)| content_type)
}

//! Extension to Content-Type mapping for static files.

use std::path::Path;

pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Returns the Content-Type for a file, judged by its extension only.
///
/// Unknown or missing extensions fall back to `text/plain`.
///
/// ```
/// # use std::path::Path;
/// # use switchyard::http::mime::content_type_for;
/// assert_eq!(content_type_for(Path::new("index.html")), "text/html");
/// assert_eq!(content_type_for(Path::new("notes")), "text/plain");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("png") => "image/png",
        Some("jpg") => "image/jpeg",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

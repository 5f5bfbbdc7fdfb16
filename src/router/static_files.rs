use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::http::mime::content_type_for;
use crate::http::response::{Response, ResponseBuilder, StatusCode};

const INDEX_FILE: &str = "index.html";

/// Serves files from a fixed document root.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a request path onto the document root.
    ///
    /// Returns `None` for anything that could leave the root: `..`
    /// segments, or a drive prefix. Percent escapes are not decoded, so
    /// `%2e%2e` names a literal file. An empty path means the index file.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let mut resolved = self.root.clone();
        let mut depth = 0usize;

        for component in Path::new(path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        if depth == 0 {
            resolved.push(INDEX_FILE);
        }

        Some(resolved)
    }

    /// GET: the whole file is read before any header is produced.
    pub async fn get(&self, path: &str) -> Response {
        let Some(mut file) = self.resolve(path) else {
            tracing::warn!(path = %path, "Rejected static path outside the document root");
            return Response::not_found();
        };

        if tokio::fs::metadata(&file).await.is_ok_and(|meta| meta.is_dir()) {
            file.push(INDEX_FILE);
        }

        match tokio::fs::read(&file).await {
            Ok(contents) => {
                tracing::debug!(file = %file.display(), bytes = contents.len(), "Serving static file");
                ResponseBuilder::new(StatusCode::Ok)
                    .header("Content-Type", content_type_for(&file))
                    .body(contents)
                    .build()
            }
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
                tracing::debug!(file = %file.display(), "Static file not found");
                Response::not_found()
            }
            Err(e) => {
                tracing::error!(file = %file.display(), error = %e, "Failed to read static file");
                Response::internal_error()
            }
        }
    }

    /// POST to a non-application path: acknowledges the received payload.
    pub fn post(payload: &str) -> Response {
        Response::html(format!(
            "<html><body><h1>POST data received:</h1>\n<p>{}</p>\n</body></html>\n",
            escape_html(payload)
        ))
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

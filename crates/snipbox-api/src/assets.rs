//! Static frontend serving.
//!
//! Files come from a single root directory. `/` returns the entry file, and
//! so does any path that neither matches an API route nor names a file under
//! the root, which lets the frontend handle its own client-side routes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use tracing::{debug, warn};

/// Location of the frontend files.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    inner: Arc<AssetsInner>,
}

#[derive(Debug)]
struct AssetsInner {
    root: PathBuf,
    entry: String,
}

impl StaticAssets {
    pub fn new(root: impl Into<PathBuf>, entry: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(AssetsInner {
                root: root.into(),
                entry: entry.into(),
            }),
        }
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    pub fn entry_path(&self) -> PathBuf {
        self.inner.root.join(&self.inner.entry)
    }

    /// Map a request path onto a file under the root. Each segment is
    /// percent-decoded first. Paths that would leave the root, or that name
    /// the root itself, map to nothing.
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let mut resolved = self.inner.root.clone();
        let mut depth = 0;
        for segment in request_path.split('/') {
            let part = percent_decode_str(segment).decode_utf8().ok()?;
            match part.as_ref() {
                "" | "." => {}
                ".." => return None,
                p if p.contains(['/', '\\', '\0']) => return None,
                p => {
                    resolved.push(p);
                    depth += 1;
                }
            }
        }
        (depth > 0).then_some(resolved)
    }
}

/// GET /
pub async fn index(State(assets): State<StaticAssets>) -> Response {
    serve_entry(&assets).await
}

/// Lowest-priority rule: a static file if one matches, else the entry file.
pub async fn fallback(State(assets): State<StaticAssets>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    if let Some(path) = assets.resolve(uri.path()) {
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if is_file {
            match serve_file(&path).await {
                Ok(resp) => return resp,
                Err(e) => warn!(?path, error = %e, "failed to read static file"),
            }
        }
    }

    debug!(path = uri.path(), "no static file, serving entry file");
    serve_entry(&assets).await
}

/// Respond with the entry file, or 404 if it is missing.
pub async fn serve_entry(assets: &StaticAssets) -> Response {
    let path = assets.entry_path();
    match serve_file(&path).await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(?path, error = %e, "entry file unavailable");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}

async fn serve_file(path: &Path) -> std::io::Result<Response> {
    let bytes = tokio::fs::read(path).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type_for(path))],
        bytes,
    )
        .into_response())
}

/// Content type inferred from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn test_assets() -> (tempfile::TempDir, StaticAssets) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>entry</html>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('hi');").unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/site.css"), "body {}").unwrap();
        let assets = StaticAssets::new(dir.path(), "index.html");
        (dir, assets)
    }

    async fn body_string(resp: Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn content_type(resp: &Response) -> &str {
        resp.headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[test]
    fn resolve_rejects_escapes() {
        let assets = StaticAssets::new("/srv/static", "index.html");
        assert_eq!(
            assets.resolve("/css/site.css"),
            Some(PathBuf::from("/srv/static/css/site.css"))
        );
        assert_eq!(assets.resolve("/../secret"), None);
        assert_eq!(assets.resolve("/a/../../secret"), None);
        assert_eq!(assets.resolve("/"), None);
        assert_eq!(assets.resolve(""), None);
    }

    #[test]
    fn resolve_decodes_segments() {
        let assets = StaticAssets::new("/srv/static", "index.html");
        assert_eq!(
            assets.resolve("/my%20file.css"),
            Some(PathBuf::from("/srv/static/my file.css"))
        );
        assert_eq!(
            assets.resolve("/caf%C3%A9/menu.txt"),
            Some(PathBuf::from("/srv/static/café/menu.txt"))
        );
        // Encoded separators and parent refs must not escape the root.
        assert_eq!(assets.resolve("/%2e%2e/secret"), None);
        assert_eq!(assets.resolve("/a%2F..%2F..%2Fsecret"), None);
        assert_eq!(assets.resolve("/..%5Csecret"), None);
        assert_eq!(assets.resolve("/bad%FF"), None);
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for(Path::new("a.HTML")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("a.css")), "text/css; charset=utf-8");
        assert_eq!(content_type_for(Path::new("a.png")), "image/png");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn index_serves_entry_file() {
        let (_dir, assets) = test_assets();
        let resp = index(State(assets)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(content_type(&resp), "text/html; charset=utf-8");
        assert_eq!(body_string(resp).await, "<html>entry</html>");
    }

    #[tokio::test]
    async fn fallback_serves_existing_file() {
        let (_dir, assets) = test_assets();
        let resp = fallback(State(assets), Method::GET, Uri::from_static("/css/site.css")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(content_type(&resp), "text/css; charset=utf-8");
        assert_eq!(body_string(resp).await, "body {}");
    }

    #[tokio::test]
    async fn fallback_serves_percent_encoded_names() {
        let (dir, assets) = test_assets();
        std::fs::write(dir.path().join("my file.css"), "CSS").unwrap();
        let resp = fallback(State(assets), Method::GET, Uri::from_static("/my%20file.css")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(content_type(&resp), "text/css; charset=utf-8");
        assert_eq!(body_string(resp).await, "CSS");
    }

    #[tokio::test]
    async fn fallback_serves_entry_for_unknown_paths() {
        let (_dir, assets) = test_assets();
        for path in ["/foo/bar", "/css", "/../index.html", "/missing.js"] {
            let resp = fallback(State(assets.clone()), Method::GET, Uri::from_static(path)).await;
            assert_eq!(resp.status(), StatusCode::OK, "path: {path}");
            assert_eq!(body_string(resp).await, "<html>entry</html>", "path: {path}");
        }
    }

    #[tokio::test]
    async fn fallback_rejects_non_get() {
        let (_dir, assets) = test_assets();
        let resp = fallback(State(assets), Method::POST, Uri::from_static("/foo")).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn missing_entry_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let assets = StaticAssets::new(dir.path(), "index.html");
        let resp = index(State(assets)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

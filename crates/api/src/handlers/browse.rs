//! Directory browser over the annotated inspection tree.
//!
//! A GET below the root resolves to either an auto-generated HTML index
//! (directories) or the raw bytes of an image file. Only image extensions
//! are served; anything else is a 403, as is any path that would escape
//! the inspections root.

use std::path::{Component, Path as FsPath, PathBuf};

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// File extensions (lowercase) the gallery will serve.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

/// GET / -- the workcenter overview.
pub async fn index(State(state): State<AppState>) -> AppResult<Response> {
    browse_path(&state, String::new()).await
}

/// GET /{*path} -- a workcenter directory or a stored image.
pub async fn browse(State(state): State<AppState>, Path(path): Path<String>) -> AppResult<Response> {
    browse_path(&state, path).await
}

async fn browse_path(state: &AppState, raw_path: String) -> AppResult<Response> {
    let rel = sanitize_request_path(&raw_path)?;
    let full = state.config.inspections_root.join(&rel);

    let metadata = match tokio::fs::metadata(&full).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(
                "The requested path does not exist.".to_string(),
            ));
        }
        Err(e) => return Err(AppError::Io(e)),
    };

    if metadata.is_dir() {
        let html = render_directory(&full, &rel).await?;
        Ok(Html(html).into_response())
    } else {
        serve_file(&full).await
    }
}

/// Normalize a request path into a relative path that cannot escape the
/// inspections root.
///
/// Only plain path segments are accepted; `..`, absolute prefixes, and
/// anything else resolve to a 403 before the filesystem is touched.
fn sanitize_request_path(raw: &str) -> Result<PathBuf, AppError> {
    let mut rel = PathBuf::new();
    for component in FsPath::new(raw).components() {
        match component {
            Component::Normal(part) => rel.push(part),
            Component::CurDir => {}
            _ => {
                return Err(AppError::Forbidden(
                    "Access outside the inspections directory is not allowed.".to_string(),
                ));
            }
        }
    }
    Ok(rel)
}

/// Serve an image file's raw bytes with the right content type.
///
/// Non-image extensions are rejected: the tree holds only annotated
/// images, so anything else being requested is either a mistake or
/// probing.
async fn serve_file(full: &FsPath) -> AppResult<Response> {
    let Some(content_type) = content_type_for(full) else {
        return Err(AppError::Forbidden(
            "Only images and directories can be accessed.".to_string(),
        ));
    };

    let bytes = tokio::fs::read(full).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

/// Content type for an allowed image extension, `None` for anything else.
fn content_type_for(path: &FsPath) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => unreachable!("extension already filtered"),
    })
}

/// Render the HTML index for a directory.
///
/// The root level lists workcenter directories only; inside a workcenter
/// a parent link and a "Most Recent Inspections" image grid are added.
async fn render_directory(full: &FsPath, rel: &FsPath) -> AppResult<String> {
    let mut dirs: Vec<String> = Vec::new();
    let mut images: Vec<String> = Vec::new();

    let mut entries = tokio::fs::read_dir(full).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type().await?;
        if file_type.is_dir() {
            dirs.push(name);
        } else if content_type_for(&entry.path()).is_some() {
            images.push(name);
        }
    }
    dirs.sort();
    images.sort();

    let at_root = rel.as_os_str().is_empty();
    let rel_str = rel.to_string_lossy().replace('\\', "/");

    let mut html = String::from(
        "<html>\n<head>\n<title>Inspection Workcenters</title>\n<style>\n\
         body { font-family: Arial, sans-serif; margin: 20px; }\n\
         h1 { color: #333; }\n\
         ul { list-style: none; padding: 0; }\n\
         li { margin: 10px 0; }\n\
         a { text-decoration: none; color: #0066cc; }\n\
         a:hover { text-decoration: underline; }\n\
         .image-list { display: flex; flex-wrap: wrap; gap: 10px; }\n\
         .image-item { max-width: 200px; text-align: center; }\n\
         img { max-width: 100%; height: auto; border: 1px solid #ddd; border-radius: 4px; cursor: pointer; }\n\
         .fullscreen { position: fixed; top: 0; left: 0; width: 100%; height: 100%; object-fit: contain; background: rgba(0,0,0,0.9); z-index: 1000; }\n\
         </style>\n<script>\n\
         function toggleFullScreen(img) {\n\
             if (!document.fullscreenElement) {\n\
                 img.requestFullscreen().catch(err => console.error('Fullscreen error:', err));\n\
                 img.classList.add('fullscreen');\n\
             } else {\n\
                 document.exitFullscreen();\n\
                 img.classList.remove('fullscreen');\n\
             }\n\
         }\n\
         document.addEventListener('fullscreenchange', () => {\n\
             document.querySelectorAll('.image-item img').forEach(img => {\n\
                 if (!document.fullscreenElement) {\n\
                     img.classList.remove('fullscreen');\n\
                 }\n\
             });\n\
         });\n\
         </script>\n</head>\n<body>\n<h1>Workcenters</h1>\n<ul>\n",
    );

    if !at_root {
        let parent = rel
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        html.push_str(&format!(
            "<li><a href=\"/{}\">.. (Parent Directory)</a></li>\n",
            escape_html(&parent)
        ));
    }

    for dir in &dirs {
        let link = if at_root {
            dir.clone()
        } else {
            format!("{rel_str}/{dir}")
        };
        html.push_str(&format!(
            "<li><a href=\"/{}\">{}/</a></li>\n",
            escape_html(&link),
            escape_html(dir)
        ));
    }
    html.push_str("</ul>\n");

    if !at_root {
        html.push_str("<h2>Most Recent Inspections</h2>\n<div class=\"image-list\">\n");
        for image in &images {
            let link = format!("{rel_str}/{image}");
            html.push_str(&format!(
                "<div class=\"image-item\">\n\
                 <a href=\"javascript:void(0)\" onclick=\"toggleFullScreen(document.getElementById('img-{name}'))\">\n\
                 <img id=\"img-{name}\" src=\"/{link}\" alt=\"{name}\"></a>\n\
                 <p>{name}</p>\n</div>\n",
                link = escape_html(&link),
                name = escape_html(image)
            ));
        }
        html.push_str("</div>\n");
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

/// Minimal HTML escaping for names interpolated into the index page.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn sanitize_accepts_nested_segments() {
        let rel = sanitize_request_path("Line A/image.jpg").unwrap();
        assert_eq!(rel, PathBuf::from("Line A/image.jpg"));
    }

    #[test]
    fn sanitize_accepts_empty_path() {
        assert_eq!(sanitize_request_path("").unwrap(), PathBuf::new());
    }

    #[test]
    fn sanitize_rejects_parent_components() {
        assert!(sanitize_request_path("../secret").is_err());
        assert!(sanitize_request_path("a/../../secret").is_err());
    }

    #[test]
    fn sanitize_rejects_absolute_paths() {
        assert!(sanitize_request_path("/etc/passwd").is_err());
    }

    #[test]
    fn content_type_covers_allowed_extensions() {
        assert_eq!(
            content_type_for(Path::new("a.jpg")),
            Some("image/jpeg")
        );
        assert_eq!(
            content_type_for(Path::new("a.JPEG")),
            Some("image/jpeg")
        );
        assert_eq!(content_type_for(Path::new("a.png")), Some("image/png"));
        assert_eq!(content_type_for(Path::new("a.gif")), Some("image/gif"));
        assert_eq!(content_type_for(Path::new("a.bmp")), Some("image/bmp"));
    }

    #[test]
    fn content_type_rejects_everything_else() {
        assert_eq!(content_type_for(Path::new("a.txt")), None);
        assert_eq!(content_type_for(Path::new("a.html")), None);
        assert_eq!(content_type_for(Path::new("noext")), None);
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<img src="x">&"#),
            "&lt;img src=&quot;x&quot;&gt;&amp;"
        );
    }
}

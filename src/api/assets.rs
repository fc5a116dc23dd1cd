use std::path::{Component, Path, PathBuf};

use axum::extract::{Path as UrlPath, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::state::AppState;

/// GET /assets/{*path} - Dish photo referenced by a result's `image_path`.
pub async fn get_asset(
    State(state): State<AppState>,
    UrlPath(path): UrlPath<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let full = resolve_asset_path(&state.config.asset_root, &path)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Invalid asset path".to_string()))?;

    let bytes = tokio::fs::read(&full).await.map_err(|e| {
        tracing::warn!("Asset {} unavailable: {e}", full.display());
        (StatusCode::NOT_FOUND, "Asset not found".to_string())
    })?;

    Ok(([(header::CONTENT_TYPE, content_type_for(&full))], bytes))
}

/// Join a relative `image_path` onto the asset root. Absolute paths and any
/// `..` component are refused so lookups stay inside the root.
pub fn resolve_asset_path(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    let mut clean = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        return None;
    }
    Some(root.join(clean))
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_path() {
        let root = Path::new("/srv/data");
        assert_eq!(
            resolve_asset_path(root, "images/pizza.jpg"),
            Some(PathBuf::from("/srv/data/images/pizza.jpg"))
        );
        assert_eq!(
            resolve_asset_path(root, "./images/pizza.jpg"),
            Some(PathBuf::from("/srv/data/images/pizza.jpg"))
        );
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let root = Path::new("/srv/data");
        assert_eq!(resolve_asset_path(root, "../secret.txt"), None);
        assert_eq!(resolve_asset_path(root, "images/../../etc/passwd"), None);
        assert_eq!(resolve_asset_path(root, "/etc/passwd"), None);
        assert_eq!(resolve_asset_path(root, ""), None);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.png")), "image/png");
        assert_eq!(content_type_for(Path::new("a")), "application/octet-stream");
    }
}

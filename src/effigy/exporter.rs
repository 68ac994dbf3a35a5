//! 💾 Image exporter - PNG artifact and embedded download link

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::builder::Avatar;
use crate::utils::escape_html;

pub const DEFAULT_AVATAR_FILE: &str = "avatar.png";

/// The rendered artifact disappeared before it could be encoded
#[derive(Debug, Error)]
#[error("image file not found: {}", .path.display())]
pub struct MissingArtifactError {
    pub path: PathBuf,
}

/// Writes avatars to one well-known path, overwriting on every export
#[derive(Debug, Clone)]
pub struct ImageExporter {
    path: PathBuf,
}

impl ImageExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Renders the avatar and writes it as PNG
    pub fn export(&self, avatar: &Avatar) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let image = avatar.render();
        image
            .save_with_format(&self.path, image::ImageFormat::Png)
            .with_context(|| format!("writing avatar to {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "avatar exported");
        Ok(self.path.clone())
    }
}

/// Base64 data URI of a PNG on disk
pub fn png_data_uri(path: &Path) -> Result<String, MissingArtifactError> {
    let bytes = read_artifact(path)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
}

/// Anchor tag that downloads the file under its own name
pub fn download_link(path: &Path) -> Result<String, MissingArtifactError> {
    let uri = png_data_uri(path)?;
    let file_name = path
        .file_name()
        .map(|n| escape_html(&n.to_string_lossy()))
        .unwrap_or_else(|| DEFAULT_AVATAR_FILE.to_string());
    Ok(format!(
        "<a href=\"{uri}\" download=\"{file_name}\">Download Avatar</a>"
    ))
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, MissingArtifactError> {
    if !path.is_file() {
        return Err(MissingArtifactError {
            path: path.to_path_buf(),
        });
    }
    // a file removed between the check and the read counts as missing too
    std::fs::read(path).map_err(|err| {
        tracing::warn!(path = %path.display(), %err, "artifact unreadable");
        MissingArtifactError {
            path: path.to_path_buf(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effigy::builder::AvatarBuilder;
    use crate::effigy::options::AvatarOptions;
    use tempfile::TempDir;

    fn avatar() -> Avatar {
        AvatarBuilder::build(&AvatarOptions::example()).unwrap()
    }

    #[test]
    fn test_export_writes_png_and_link() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = ImageExporter::new(temp_dir.path().join("avatar.png"));

        let path = exporter.export(&avatar()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let link = download_link(&path).unwrap();
        assert!(link.starts_with("<a href=\"data:image/png;base64,iVBORw0KGgo"));
        assert!(link.contains("download=\"avatar.png\""));
        assert!(link.ends_with(">Download Avatar</a>"));
    }

    #[test]
    fn test_export_overwrites_same_path() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = ImageExporter::new(temp_dir.path().join("out/avatar.png"));
        exporter.export(&avatar()).unwrap();
        exporter.export(&avatar()).unwrap();

        let entries = std::fs::read_dir(temp_dir.path().join("out")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_download_name_is_attribute_safe() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = ImageExporter::new(temp_dir.path().join("my \"best\" <avatar>.png"));
        let path = exporter.export(&avatar()).unwrap();

        let link = download_link(&path).unwrap();
        assert!(link.contains("download=\"my &quot;best&quot; &lt;avatar&gt;.png\""));
        assert_eq!(link.matches('"').count(), 4);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.png");
        let err = download_link(&missing).unwrap_err();
        assert_eq!(err.path, missing);
        assert!(err.to_string().contains("nope.png"));
    }

    #[test]
    fn test_round_trip_decodes_to_avatar_size() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = ImageExporter::new(temp_dir.path().join("avatar.png"));
        let path = exporter.export(&avatar()).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), crate::effigy::builder::AVATAR_WIDTH);
        assert_eq!(decoded.height(), crate::effigy::builder::AVATAR_HEIGHT);
    }
}

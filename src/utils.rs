use std::path::{Path, PathBuf};

// === WEIGHTS LOOKUP ===

pub const SAFETENSORS_FILE: &str = "model.safetensors";
pub const PYTORCH_FILE: &str = "pytorch_model.bin";

/// Single-file checkpoint in one of the two formats candle reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightsFile {
    SafeTensors(PathBuf),
    Pytorch(PathBuf),
}

impl WeightsFile {
    pub fn path(&self) -> &Path {
        match self {
            WeightsFile::SafeTensors(p) | WeightsFile::Pytorch(p) => p,
        }
    }
}

/// Asks `fetch` for safetensors first, then for the pytorch pickle.
/// `fetch` returns `None` when the file does not exist at its source.
pub fn resolve_weights<F>(mut fetch: F) -> Option<WeightsFile>
where
    F: FnMut(&str) -> Option<PathBuf>,
{
    if let Some(path) = fetch(SAFETENSORS_FILE) {
        return Some(WeightsFile::SafeTensors(path));
    }
    fetch(PYTORCH_FILE).map(WeightsFile::Pytorch)
}

// === PATHS ===

/// Relative paths resolve against the project root (the first ancestor of
/// the executable holding a Cargo.toml), else the working directory.
pub fn resolve_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let exe_path = std::env::current_exe().unwrap_or(PathBuf::from("."));
    let mut current = exe_path.as_path();

    while let Some(parent) = current.parent() {
        if parent.join("Cargo.toml").exists() {
            return parent.join(path);
        }
        current = parent;
    }

    std::env::current_dir()
        .unwrap_or(PathBuf::from("."))
        .join(path)
}

// === MARKUP ===

/// Escapes text for HTML/SVG content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

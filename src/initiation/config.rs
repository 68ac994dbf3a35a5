//! 🜂 Конфигурация Avatar Insights
//!
//! Читается из `config/insights.toml`; при первом запуске файл создаётся
//! с настройками по умолчанию. Флаги командной строки применяются поверх.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::demiurge::plotter::DEFAULT_CHART_FILE;
use crate::effigy::exporter::DEFAULT_AVATAR_FILE;
use crate::logos::tokenizer::DEFAULT_MAX_TOKENS;
use crate::utils::resolve_path;

pub const DEFAULT_CONFIG_PATH: &str = "config/insights.toml";
pub const DEFAULT_MODEL_ID: &str = "Minej/bert-base-personality";

/// Откуда берётся модель личности и как она запускается
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Репозиторий чекпоинта на HF Hub
    pub model_id: String,
    pub revision: String,
    /// Локальная папка с чекпоинтом, приоритетнее хаба
    pub model_dir: Option<PathBuf>,
    /// Максимум токенов на описание
    pub max_tokens: usize,
    pub force_cpu: bool,
    /// Размер LRU кэша анализов, 0 отключает
    pub cache_size: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: "main".to_string(),
            model_dir: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            force_cpu: false,
            cache_size: 64,
        }
    }
}

/// Пути выходных файлов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub avatar_path: PathBuf,
    pub chart_path: PathBuf,
    pub page_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            avatar_path: PathBuf::from(DEFAULT_AVATAR_FILE),
            chart_path: PathBuf::from(DEFAULT_CHART_FILE),
            page_path: PathBuf::from("insights.html"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Загружает конфиг или создаёт файл с настройками по умолчанию
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: AppConfig = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            config.validate()?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let default_config = AppConfig::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;

            println!("📝 Создан конфиг по умолчанию: {}", path.display());
            Ok(default_config)
        }
    }

    /// Относительные пути разрешаются так же, как путь к самому конфигу
    pub fn resolved(mut self) -> Self {
        if let Some(dir) = &self.model.model_dir {
            self.model.model_dir = Some(resolve_path(dir));
        }
        self.output.avatar_path = resolve_path(&self.output.avatar_path);
        self.output.chart_path = resolve_path(&self.output.chart_path);
        self.output.page_path = resolve_path(&self.output.page_path);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.model_id.trim().is_empty() && self.model.model_dir.is_none() {
            anyhow::bail!("no model configured: set model.model_id or model.model_dir");
        }
        if self.model.max_tokens == 0 {
            anyhow::bail!("model.max_tokens must be > 0");
        }
        for (name, path) in [
            ("output.avatar_path", &self.output.avatar_path),
            ("output.chart_path", &self.output.chart_path),
            ("output.page_path", &self.output.page_path),
        ] {
            if path.as_os_str().is_empty() {
                anyhow::bail!("{name} must not be empty");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model.model_id, "Minej/bert-base-personality");
        assert_eq!(config.model.max_tokens, 512);
        assert_eq!(config.output.avatar_path, PathBuf::from("avatar.png"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config/insights.toml");

        let config = AppConfig::load_or_init(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());

        let reloaded = AppConfig::load_or_init(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("insights.toml");
        std::fs::write(&path, "[model]\nforce_cpu = true\ncache_size = 0\n").unwrap();

        let config = AppConfig::load_or_init(&path).unwrap();
        assert!(config.model.force_cpu);
        assert_eq!(config.model.cache_size, 0);
        assert_eq!(config.model.revision, "main");
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_resolved_anchors_relative_paths() {
        let temp_dir = TempDir::new().unwrap();
        let absolute_chart = temp_dir.path().join("chart.svg");
        let mut config = AppConfig::default();
        config.model.model_dir = Some(PathBuf::from("models/bert"));
        config.output.chart_path = absolute_chart.clone();

        let config = config.resolved();
        let model_dir = config.model.model_dir.unwrap();
        assert!(model_dir.is_absolute());
        assert!(model_dir.ends_with("models/bert"));
        assert!(config.output.avatar_path.is_absolute());
        assert!(config.output.avatar_path.ends_with("avatar.png"));
        assert!(config.output.page_path.ends_with("insights.html"));
        assert_eq!(config.output.chart_path, absolute_chart);
    }

    #[test]
    fn test_invalid_budget_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("insights.toml");
        std::fs::write(&path, "[model]\nmax_tokens = 0\n").unwrap();
        assert!(AppConfig::load_or_init(&path).is_err());
    }
}

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use safelearn_engine::{
    ChangeCoordinator, ClassNames, Document, EditSurface, PreviewSurface, RenderMode, Signal,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// User settings for the annotation engine.
///
/// Every key is optional; missing keys fall back to the built-in defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Surface mode a new view starts in.
    pub default_mode: RenderMode,
    /// Class names used for decorations and hidden preview nodes.
    pub classes: ClassNames,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Loads the user config, or the defaults when there is none.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/safelearn");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Builds a coordinator for one view using these settings.
    pub fn coordinator<S: EditSurface + 'static>(
        &self,
        surface: S,
        preview: Rc<RefCell<PreviewSurface>>,
        document: Document,
    ) -> ChangeCoordinator<S> {
        let coordinator = ChangeCoordinator::new(surface, preview, self.classes.clone(), document);
        if self.default_mode != RenderMode::Edit {
            coordinator.handle(&Signal::ViewModeChanged(self.default_mode));
        }
        coordinator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use safelearn_engine::{Action, RecordingSurface};
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/safelearn/config.toml"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            classes: ClassNames {
                hidden: "sl-hidden".into(),
                ..ClassNames::default()
            },
            default_mode: RenderMode::Preview,
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
default_mode = "preview"

[classes]
fragment_highlight = "answer"
"#,
        )
        .unwrap();

        assert_eq!(config.default_mode, RenderMode::Preview);
        assert_eq!(config.classes.fragment_highlight, "answer");
        assert_eq!(config.classes.hidden, "safelearn-hidden");
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_config_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "default_mode = 3").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_coordinator_uses_configured_classes_and_mode() {
        let config = Config {
            classes: ClassNames {
                fragment_highlight: "answer".into(),
                ..ClassNames::default()
            },
            default_mode: RenderMode::Edit,
        };
        let coordinator = config.coordinator(
            RecordingSurface::default(),
            Rc::new(RefCell::new(PreviewSurface::new())),
            Document::from("a ##fragment b"),
        );
        let action = coordinator.with_surface(|s| s.decorations[0].action.clone());
        assert_eq!(
            action,
            Action::Mark {
                class: "answer".into()
            }
        );

        let preview_config = Config {
            default_mode: RenderMode::Preview,
            ..config
        };
        let coordinator = preview_config.coordinator(
            RecordingSurface::default(),
            Rc::new(RefCell::new(PreviewSurface::new())),
            Document::from("a ##fragment b"),
        );
        assert_eq!(coordinator.mode(), RenderMode::Preview);
        let action = coordinator.with_surface(|s| s.decorations[0].action.clone());
        assert_eq!(action, Action::Replace);
    }
}

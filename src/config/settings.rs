//! Render settings loaded from an optional TOML file.

use crate::error::{Result, SlidesError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const MIN_SIDE_PX: u32 = 100;
const MAX_SIDE_PX: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureFormat {
    #[default]
    Png,
    Svg,
}

impl FigureFormat {
    /// Pick the format from a file extension, falling back to `default`.
    pub fn for_path(path: &Path, default: FigureFormat) -> FigureFormat {
        match path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("svg") => FigureFormat::Svg,
            Some("png") => FigureFormat::Png,
            _ => default,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FigureSettings {
    pub width: u32,
    pub height: u32,
    pub format: FigureFormat,
}

impl Default for FigureSettings {
    fn default() -> Self {
        // matplotlib's default 6.4x4.8in figure at 125 dpi
        Self {
            width: 800,
            height: 600,
            format: FigureFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DeckSettings {
    /// Overrides the notebook title on the title slide
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub figure: FigureSettings,
    pub deck: DeckSettings,
}

impl RenderConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RenderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        tracing::debug!("Loaded config file {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.figure.width < MIN_SIDE_PX || self.figure.height < MIN_SIDE_PX {
            return Err(SlidesError::Config {
                message: format!(
                    "figure size {}x{} is below the {}px minimum",
                    self.figure.width, self.figure.height, MIN_SIDE_PX
                ),
            });
        }
        if self.figure.width > MAX_SIDE_PX || self.figure.height > MAX_SIDE_PX {
            return Err(SlidesError::Config {
                message: format!(
                    "figure size {}x{} is above the {}px maximum",
                    self.figure.width, self.figure.height, MAX_SIDE_PX
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file() {
        let config = RenderConfig::load(None).unwrap();
        assert_eq!(config.figure.width, 800);
        assert_eq!(config.figure.height, 600);
        assert_eq!(config.figure.format, FigureFormat::Png);
        assert!(config.deck.title.is_none());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = RenderConfig::from_toml_str(
            r#"
[figure]
width = 1200
format = "svg"

[deck]
title = "Quarterly scores"
"#,
        )
        .unwrap();
        assert_eq!(config.figure.width, 1200);
        assert_eq!(config.figure.height, 600);
        assert_eq!(config.figure.format, FigureFormat::Svg);
        assert_eq!(config.deck.title.as_deref(), Some("Quarterly scores"));
    }

    #[test]
    fn test_rejects_tiny_figure() {
        let err = RenderConfig::from_toml_str("[figure]\nwidth = 20\n").unwrap_err();
        assert!(matches!(err, SlidesError::Config { .. }));
    }

    #[test]
    fn test_rejects_huge_figure() {
        let err =
            RenderConfig::from_toml_str("[figure]\nwidth = 40000\nheight = 40000\n").unwrap_err();
        assert!(matches!(err, SlidesError::Config { ref message } if message.contains("maximum")));
    }

    #[test]
    fn test_rejects_unknown_format() {
        let err = RenderConfig::from_toml_str("[figure]\nformat = \"gif\"\n").unwrap_err();
        assert!(matches!(err, SlidesError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[figure]\nheight = 480").unwrap();
        let config = RenderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.figure.height, 480);
    }

    #[test]
    fn test_format_for_path() {
        assert_eq!(
            FigureFormat::for_path(Path::new("out.SVG"), FigureFormat::Png),
            FigureFormat::Svg
        );
        assert_eq!(
            FigureFormat::for_path(Path::new("out"), FigureFormat::Svg),
            FigureFormat::Svg
        );
    }
}

//! Configuration loading and management for rfpdeck.
//!
//! Settings come from `rfpdeck.toml` when one exists and fall back to the
//! built-in defaults otherwise. Deck plans are separate TOML files describing
//! a custom deck.

use crate::deck::DeckConfig;
use crate::extract::Marker;
use crate::summary::DEFAULT_MAX_SENTENCES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "rfpdeck.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("failed to serialise config: {0}")]
    WriteError(#[from] toml::ser::Error),
    #[error("invalid deck plan: {0}")]
    InvalidPlan(#[from] crate::deck::DeckError),
    #[error("invalid section markers: {0}")]
    InvalidMarkers(#[from] crate::extract::ExtractError),
}

/// Summarisation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Sentences kept per section
    pub max_sentences: usize,
    /// Sections looked up in the RFP; the built-in list when empty
    pub markers: Vec<Marker>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_sentences: DEFAULT_MAX_SENTENCES,
            markers: Vec::new(),
        }
    }
}

/// Where generated decks are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Settings {
    /// Load settings from the default location, or defaults when there is none
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                log::debug!("no {CONFIG_FILE} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        crate::extract::validate_markers(&settings.summary.markers)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("rfpdeck")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }

    /// Markers to extract, falling back to the built-in RFP sections
    pub fn markers(&self) -> Vec<Marker> {
        if self.summary.markers.is_empty() {
            Marker::defaults()
        } else {
            self.summary.markers.clone()
        }
    }

    /// Output path for a deck file name
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output.directory.join(file_name)
    }
}

/// Load and validate a deck plan
pub fn load_plan(path: &Path) -> Result<DeckConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_plan(&content)
}

pub fn parse_plan(content: &str) -> Result<DeckConfig, ConfigError> {
    let plan: DeckConfig = toml::from_str(content)?;
    plan.validate()?;
    Ok(plan)
}

/// Serialise a plan so it can be edited and fed back with `--plan`
pub fn plan_to_toml(plan: &DeckConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(plan)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::SectionConfig;
    use crate::slide::Rgb;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.summary.max_sentences, 3);
        assert_eq!(settings.markers().len(), 4);
        assert_eq!(
            settings.output_path("deck.pptx"),
            PathBuf::from("./deck.pptx")
        );
    }

    #[test]
    fn test_partial_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[summary]\nmax_sentences = 5").unwrap();
        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.summary.max_sentences, 5);
        assert_eq!(settings.output, OutputConfig::default());
        assert_eq!(settings.markers(), Marker::defaults());
    }

    #[test]
    fn test_custom_markers() {
        let toml = r#"
[summary]
markers = [
    { name = "Scope", keyword = "Scope of Work" },
    { name = "Budget", keyword = "Budget" },
]

[output]
directory = "decks"
"#;
        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(
            settings.markers(),
            vec![Marker::new("Scope", "Scope of Work"), Marker::new("Budget", "Budget")]
        );
        assert_eq!(settings.output_path("a.pptx"), PathBuf::from("decks/a.pptx"));
    }

    #[test]
    fn test_duplicate_markers_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[summary]\nmarkers = [{{ name = \"A\", keyword = \"Goals\" }}, {{ name = \"B\", keyword = \"goals\" }}]\n"
        )
        .unwrap();
        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMarkers(_)));
    }

    #[test]
    fn test_padded_marker_keyword_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[summary]\nmarkers = [{{ name = \"Goals\", keyword = \"Goals\" }}, {{ name = \"Deliverables\", keyword = \" Deliverables\" }}]\n"
        )
        .unwrap();
        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidMarkers(crate::extract::ExtractError::PaddedKeyword(_))
        ));
    }

    #[test]
    fn test_parse_plan() {
        let plan = parse_plan(
            r##"
title = "Board Update"

[[section]]
title = "Highlights"
slide_count = 2
color = "#1F4E79"

[[section]]
title = "Risks"
slide_count = 1
color = "c0504d"
"##,
        )
        .unwrap();
        assert_eq!(plan.title, "Board Update");
        assert_eq!(
            plan.sections,
            vec![
                SectionConfig::new("Highlights", 2, Rgb::new(0x1F, 0x4E, 0x79)),
                SectionConfig::new("Risks", 1, Rgb::new(0xC0, 0x50, 0x4D)),
            ]
        );
    }

    #[test]
    fn test_plan_rejects_bad_input() {
        let bad_color = "title = \"x\"\n[[section]]\ntitle = \"a\"\nslide_count = 1\ncolor = \"blue\"\n";
        assert!(matches!(parse_plan(bad_color), Err(ConfigError::ParseError(_))));

        let too_many = "title = \"x\"\n[[section]]\ntitle = \"a\"\nslide_count = 11\ncolor = \"#000000\"\n";
        assert!(matches!(parse_plan(too_many), Err(ConfigError::InvalidPlan(_))));
    }

    #[test]
    fn test_default_plan_round_trips() {
        let plan = DeckConfig::default();
        let text = plan_to_toml(&plan).unwrap();
        assert!(text.contains("[[section]]"));
        assert_eq!(parse_plan(&text).unwrap(), plan);
    }

    #[test]
    fn test_missing_plan_file() {
        let err = load_plan(Path::new("/nonexistent/plan.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }
}

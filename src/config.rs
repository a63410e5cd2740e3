//! Dashboard configuration.
//!
//! Values are layered with `figment`: built-in defaults, then an optional TOML
//! file, then `UX_COPILOT_` environment variables (`__` separates nested keys,
//! e.g. `UX_COPILOT_CLICK_TEST__MAX_CLICKS=60`). Command-line flags are applied
//! on top by the binary.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "ux-copilot.toml";
const ENV_PREFIX: &str = "UX_COPILOT_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Fixed seed for every simulated measurement. Unset means entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub output: OutputConfig,
    pub research: ResearchConfig,
    pub click_test: ClickTestConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    pub interview_limit: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self { interview_limit: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickTestConfig {
    pub min_clicks: usize,
    pub max_clicks: usize,
    pub default_clicks: usize,
}

impl Default for ClickTestConfig {
    fn default() -> Self {
        Self {
            min_clicks: 10,
            max_clicks: 100,
            default_clicks: 40,
        }
    }
}

/// Which scored hypotheses end up in the exported report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HypothesisExport {
    #[default]
    All,
    Selected,
    #[serde(rename = "none")]
    Off,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub hypotheses: HypothesisExport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_dir: Option<PathBuf>,
    pub font_family: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            hypotheses: HypothesisExport::All,
            font_dir: None,
            font_family: "LiberationSans".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration. An explicit `path` must exist; without one,
    /// `ux-copilot.toml` in the working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(DashboardConfig::default()));

        match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(DashboardError::unsupported(path, "config file not found"));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    figment = figment.merge(Toml::file(default_path));
                }
            }
        }

        let config: DashboardConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.research.interview_limit == 0 {
            return Err(DashboardError::InvalidConfig(
                "research.interview_limit must be positive",
            ));
        }
        let clicks = &self.click_test;
        if clicks.min_clicks == 0 || clicks.min_clicks > clicks.max_clicks {
            return Err(DashboardError::InvalidConfig(
                "click_test range must satisfy 0 < min_clicks <= max_clicks",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.research.interview_limit, 5);
        assert_eq!(config.click_test.default_clicks, 40);
        assert_eq!(config.report.hypotheses, HypothesisExport::All);
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "seed = 7\n[click_test]\nmax_clicks = 60\n[report]\nhypotheses = \"selected\""
        )
        .unwrap();

        let config = DashboardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.click_test.max_clicks, 60);
        assert_eq!(config.click_test.min_clicks, 10);
        assert_eq!(config.report.hypotheses, HypothesisExport::Selected);
    }

    #[test]
    fn missing_explicit_file_is_rejected() {
        let err = DashboardConfig::load(Some(Path::new("/nonexistent/ux.toml"))).unwrap_err();
        assert!(matches!(err, DashboardError::UnsupportedFile { .. }));
    }

    #[test]
    fn inverted_click_range_fails_validation() {
        let mut config = DashboardConfig::default();
        config.click_test.min_clicks = 80;
        config.click_test.max_clicks = 20;
        assert!(matches!(
            config.validate(),
            Err(DashboardError::InvalidConfig(_))
        ));
    }
}

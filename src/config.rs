//! Timeline configuration.
//!
//! Settings are read from `.kp/timeline.toml` and layered
//! file → environment → CLI:
//!
//! ```toml
//! [timeline]
//! base_path = "/student/internship"
//! ui = "full"
//! unlocked = "IN_PROGRESS"
//!
//! [routes]
//! "/student/internship/logbook/weekly" = "IN_PROGRESS"
//! ```
//!
//! `[routes]` entries extend or override the built-in route table.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::gates::{AccessGate, StaticProgress};
use crate::routes::{DEFAULT_BASE_PATH, RouteTable, normalize_path};
use crate::stage::Stage;
use crate::ui::UiMode;

/// Directory holding the config file, relative to the project directory.
pub const CONFIG_DIR: &str = ".kp";
pub const CONFIG_FILE: &str = "timeline.toml";

/// Environment override for the UI mode.
pub const UI_ENV: &str = "KP_TIMELINE_UI";

/// `[timeline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineSection {
    /// Root of the timeline-gated route subtree
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Output mode
    #[serde(default)]
    pub ui: UiMode,
    /// Furthest unlocked stage; unset means every stage is open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked: Option<String>,
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_string()
}

impl Default for TimelineSection {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            ui: UiMode::default(),
            unlocked: None,
        }
    }
}

/// The complete timeline.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineToml {
    #[serde(default)]
    pub timeline: TimelineSection,
    /// Route path → stage key
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
}

impl TimelineToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse timeline.toml")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize timeline.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Built-in routes under the configured base path, plus `[routes]`.
    ///
    /// Fails on the first entry whose stage key is not a known stage.
    pub fn route_table(&self) -> Result<RouteTable> {
        let mut table = RouteTable::with_defaults(&self.timeline.base_path);
        for (route, key) in &self.routes {
            let stage = key
                .parse::<Stage>()
                .with_context(|| format!("Invalid stage for route '{}' in [routes]", route))?;
            if let Some(previous) = table.insert(route, stage)
                && previous != stage
            {
                tracing::debug!(route = %route, from = %previous, to = %stage, "route overridden");
            }
        }
        Ok(table)
    }

    pub fn unlocked_stage(&self) -> Result<Option<Stage>> {
        self.timeline
            .unlocked
            .as_deref()
            .map(str::parse::<Stage>)
            .transpose()
            .context("Invalid [timeline].unlocked")
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.timeline.base_path.starts_with('/') {
            warnings.push(format!(
                "base_path '{}' should start with '/' (using '{}')",
                self.timeline.base_path,
                normalize_path(&self.timeline.base_path)
            ));
        }

        if let Some(ref unlocked) = self.timeline.unlocked
            && unlocked.parse::<Stage>().is_err()
        {
            warnings.push(format!("Invalid stage '{}' in [timeline].unlocked", unlocked));
        }

        // Coverage is checked against the entries that do parse.
        let mut table = RouteTable::with_defaults(&self.timeline.base_path);
        for (route, key) in &self.routes {
            match key.parse::<Stage>() {
                Ok(stage) => {
                    table.insert(route, stage);
                }
                Err(_) => warnings.push(format!(
                    "Invalid stage '{}' for route '{}'",
                    key, route
                )),
            }
        }

        warnings.extend(table.validate());
        warnings
    }
}

pub fn default_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Runtime configuration: the parsed file with environment and CLI applied.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_dir: PathBuf,
    /// File the settings came from, if any
    pub config_path: Option<PathBuf>,
    pub toml: TimelineToml,
    pub routes: RouteTable,
    pub ui: UiMode,
    pub unlocked: Option<Stage>,
    pub verbose: bool,
}

impl Config {
    /// Resolve configuration.
    ///
    /// An explicit `config_file` must exist. Otherwise `.kp/timeline.toml` is
    /// used when present. `KP_TIMELINE_UI` overrides the file's UI mode and
    /// `cli_ui` overrides both; `cli_unlocked` overrides `[timeline].unlocked`.
    pub fn load(
        project_dir: PathBuf,
        config_file: Option<PathBuf>,
        cli_ui: Option<UiMode>,
        cli_unlocked: Option<Stage>,
        verbose: bool,
    ) -> Result<Self> {
        let (config_path, toml) = match config_file {
            Some(path) => {
                let toml = TimelineToml::load(&path)?;
                (Some(path), toml)
            }
            None => {
                let path = default_config_path(&project_dir);
                if path.exists() {
                    (Some(path.clone()), TimelineToml::load(&path)?)
                } else {
                    (None, TimelineToml::default())
                }
            }
        };

        let ui = match cli_ui {
            Some(ui) => ui,
            None => match std::env::var(UI_ENV) {
                Ok(value) => UiMode::from_name(&value).with_context(|| {
                    format!("Invalid {}: '{}' (expected full, minimal or json)", UI_ENV, value)
                })?,
                Err(_) => toml.timeline.ui,
            },
        };

        let unlocked = match cli_unlocked {
            Some(stage) => Some(stage),
            None => toml.unlocked_stage()?,
        };
        let routes = toml.route_table()?;

        tracing::debug!(
            config = ?config_path,
            ui = %ui,
            unlocked = ?unlocked.map(|s| s.key()),
            "configuration resolved"
        );

        Ok(Self {
            project_dir,
            config_path,
            toml,
            routes,
            ui,
            unlocked,
            verbose,
        })
    }

    pub fn route_table(&self) -> RouteTable {
        self.routes.clone()
    }

    /// Open gate unless an unlock level is configured.
    pub fn access_gate(&self) -> AccessGate {
        match self.unlocked {
            Some(stage) => AccessGate::new(StaticProgress(Some(stage))),
            None => AccessGate::open(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let config_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        let path = config_dir.join(CONFIG_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let toml = TimelineToml::parse("").unwrap();
        assert_eq!(toml.timeline.base_path, DEFAULT_BASE_PATH);
        assert_eq!(toml.timeline.ui, UiMode::Full);
        assert!(toml.routes.is_empty());
        assert!(toml.validate().is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = TimelineToml::parse(
            r#"
            [timeline]
            base_path = "/kp"
            ui = "json"
            unlocked = "submission"

            [routes]
            "/kp/logbook/weekly" = "IN_PROGRESS"
            "#,
        )
        .unwrap();

        assert_eq!(toml.timeline.base_path, "/kp");
        assert_eq!(toml.timeline.ui, UiMode::Json);
        assert_eq!(toml.unlocked_stage().unwrap(), Some(Stage::Submission));
        assert_eq!(toml.routes.len(), 1);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = TimelineToml::parse("[timeline\nbase_path = ");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse timeline.toml")
        );
    }

    #[test]
    fn test_route_table_applies_overrides() {
        let toml = TimelineToml::parse(
            r#"
            [routes]
            "/student/internship/hearing" = "RESPONSE_LETTER"
            "/student/internship/defense" = "HEARING"
            "#,
        )
        .unwrap();

        let table = toml.route_table().unwrap();
        assert_eq!(
            table.resolve("/student/internship/hearing").map(|(_, s)| s),
            Some(Stage::ResponseLetter)
        );
        assert_eq!(
            table.resolve("/student/internship/defense").map(|(_, s)| s),
            Some(Stage::Hearing)
        );
    }

    #[test]
    fn test_route_table_rejects_invalid_stage() {
        let toml = TimelineToml::parse(
            r#"
            [routes]
            "/student/internship/party" = "GRADUATION"
            "#,
        )
        .unwrap();

        let err = toml.route_table().unwrap_err();
        assert!(format!("{:#}", err).contains("/student/internship/party"));
        let warnings = toml.validate();
        assert!(warnings.iter().any(|w| w.contains("GRADUATION")));
    }

    #[test]
    fn test_validate_flags_bad_unlocked_and_stray_route() {
        let toml = TimelineToml::parse(
            r#"
            [timeline]
            unlocked = "DONE"

            [routes]
            "/admin/hearing" = "HEARING"
            "#,
        )
        .unwrap();

        let warnings = toml.validate();
        assert!(warnings.iter().any(|w| w.contains("[timeline].unlocked")));
        assert!(warnings.iter().any(|w| w.contains("/admin/hearing")));
        assert!(toml.unlocked_stage().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("timeline.toml");
        let mut toml = TimelineToml::default();
        toml.timeline.ui = UiMode::Minimal;
        toml.routes
            .insert("/student/internship/extra".into(), "SUBMISSION".into());

        toml.save(&path).unwrap();
        let loaded = TimelineToml::load(&path).unwrap();

        assert_eq!(loaded.timeline.ui, UiMode::Minimal);
        assert_eq!(loaded.routes.get("/student/internship/extra").unwrap(), "SUBMISSION");
    }

    #[test]
    fn test_load_missing_file() {
        let result = TimelineToml::load(Path::new("/nonexistent/timeline.toml"));
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn test_config_uses_project_file() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "[timeline]\nui = \"minimal\"\nunlocked = \"COVER_LETTER\"\n");

        let config = Config::load(dir.path().to_path_buf(), None, None, None, false).unwrap();

        assert!(config.config_path.is_some());
        assert_eq!(config.unlocked, Some(Stage::CoverLetter));
        assert!(!config.access_gate().allows(Stage::InProgress));
    }

    #[test]
    fn test_config_cli_overrides_file() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "[timeline]\nui = \"minimal\"\nunlocked = \"COVER_LETTER\"\n");

        let config = Config::load(
            dir.path().to_path_buf(),
            None,
            Some(UiMode::Json),
            Some(Stage::Hearing),
            true,
        )
        .unwrap();

        assert_eq!(config.ui, UiMode::Json);
        assert_eq!(config.unlocked, Some(Stage::Hearing));
        assert!(config.access_gate().allows(Stage::Hearing));
    }

    #[test]
    fn test_config_without_file_is_open() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path().to_path_buf(), None, None, None, false).unwrap();
        assert!(config.config_path.is_none());
        assert_eq!(config.unlocked, None);
        assert!(config.access_gate().allows(Stage::Hearing));
        assert_eq!(config.route_table(), RouteTable::default());
    }

    #[test]
    fn test_config_rejects_invalid_route_stage() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "[routes]\n\"/student/internship/party\" = \"GRADUATION\"\n");

        let err = Config::load(dir.path().to_path_buf(), None, None, None, false).unwrap_err();
        assert!(format!("{:#}", err).contains("GRADUATION"));
    }

    #[test]
    fn test_config_explicit_file_must_exist() {
        let dir = tempdir().unwrap();
        let result = Config::load(
            dir.path().to_path_buf(),
            Some(dir.path().join("missing.toml")),
            None,
            None,
            false,
        );
        assert!(result.is_err());
    }
}

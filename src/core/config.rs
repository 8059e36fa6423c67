//! Configuration management with layered hierarchy
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. Global user config (`~/.config/rtm/config.yaml`)
//! 3. Project config (`./rtm.yaml`, or the file given with `--config`)
//! 4. `RTM_*` environment variables
//!
//! Command-line flags are applied on top by the individual commands.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::core::links::LinkTemplates;
use crate::core::matcher::DEFAULT_DELIMITER;
use crate::core::status::StatusMap;
use crate::sources::http::DEFAULT_TIMEOUT;
use crate::sources::jira::{JiraFields, DEFAULT_PAGE_SIZE};

/// File name of the project-level config
pub const PROJECT_CONFIG_FILE: &str = "rtm.yaml";

/// Environment variables and the keys they set
pub const ENV_VARS: &[(&str, &str)] = &[
    ("RTM_JIRA_URL", "jira.url"),
    ("RTM_JIRA_EMAIL", "jira.email"),
    ("RTM_JIRA_TOKEN", "jira.token"),
    ("RTM_TESTRAIL_URL", "testrail.url"),
    ("RTM_TESTRAIL_USER", "testrail.user"),
    ("RTM_TESTRAIL_KEY", "testrail.api_key"),
    ("RTM_TESTRAIL_PROJECT", "testrail.project_id"),
];

const MASK: &str = "********";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Issue tracker settings
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraSettings {
    pub url: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
    pub sprint_field: Option<String>,
    pub acceptance_field: Option<String>,
    pub page_size: Option<u32>,
}

/// Test-management settings
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestRailSettings {
    pub url: Option<String>,
    pub user: Option<String>,
    pub api_key: Option<String>,
    pub project_id: Option<u64>,
}

/// RTM configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub jira: JiraSettings,
    pub testrail: TestRailSettings,

    /// Explicit link templates; derived from the base URLs when unset
    pub links: LinkTemplates,

    /// Extra or replacement status labels keyed by status code
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub status_labels: BTreeMap<i64, String>,

    /// Separator for joined test-case lists
    pub delimiter: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Directory report files are written to
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// Unreadable global or project files are skipped with a warning. An
    /// explicit `path` must exist and parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                match Self::from_file(&global_path) {
                    Ok(global) => config.merge(global),
                    Err(e) => tracing::warn!(error = %e, "ignoring global config"),
                }
            }
        }

        match path {
            Some(path) => config.merge(Self::from_file(path)?),
            None => {
                let project_path = Self::project_config_path();
                if project_path.exists() {
                    match Self::from_file(&project_path) {
                        Ok(project) => config.merge(project),
                        Err(e) => tracing::warn!(error = %e, "ignoring project config"),
                    }
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a single YAML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&contents).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, String> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(contents).map_err(|e| e.to_string())
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "rtm")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to the project config file in the working directory
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_CONFIG_FILE)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        take(&mut self.jira.url, other.jira.url);
        take(&mut self.jira.email, other.jira.email);
        take(&mut self.jira.token, other.jira.token);
        take(&mut self.jira.sprint_field, other.jira.sprint_field);
        take(&mut self.jira.acceptance_field, other.jira.acceptance_field);
        take(&mut self.jira.page_size, other.jira.page_size);

        take(&mut self.testrail.url, other.testrail.url);
        take(&mut self.testrail.user, other.testrail.user);
        take(&mut self.testrail.api_key, other.testrail.api_key);
        take(&mut self.testrail.project_id, other.testrail.project_id);

        take(&mut self.links.issue, other.links.issue);
        take(&mut self.links.test_case, other.links.test_case);

        self.status_labels.extend(other.status_labels);

        take(&mut self.delimiter, other.delimiter);
        take(&mut self.timeout_secs, other.timeout_secs);
        take(&mut self.output_dir, other.output_dir);
    }

    /// Apply `RTM_*` variables through `lookup`
    ///
    /// A project id that does not parse as a number is ignored with a warning.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        take(&mut self.jira.url, lookup("RTM_JIRA_URL"));
        take(&mut self.jira.email, lookup("RTM_JIRA_EMAIL"));
        take(&mut self.jira.token, lookup("RTM_JIRA_TOKEN"));
        take(&mut self.testrail.url, lookup("RTM_TESTRAIL_URL"));
        take(&mut self.testrail.user, lookup("RTM_TESTRAIL_USER"));
        take(&mut self.testrail.api_key, lookup("RTM_TESTRAIL_KEY"));
        if let Some(raw) = lookup("RTM_TESTRAIL_PROJECT") {
            match raw.trim().parse() {
                Ok(id) => self.testrail.project_id = Some(id),
                Err(_) => tracing::warn!(value = %raw, "RTM_TESTRAIL_PROJECT is not a number"),
            }
        }
    }

    pub fn delimiter(&self) -> &str {
        self.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn page_size(&self) -> u32 {
        self.jira.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Status table: built-in labels plus configured overrides
    pub fn status_map(&self) -> StatusMap {
        StatusMap::default().with_overrides(self.status_labels.clone())
    }

    pub fn jira_fields(&self) -> JiraFields {
        let defaults = JiraFields::default();
        JiraFields {
            sprint: self.jira.sprint_field.clone().unwrap_or(defaults.sprint),
            acceptance_criteria: self
                .jira
                .acceptance_field
                .clone()
                .unwrap_or(defaults.acceptance_criteria),
        }
    }

    /// Explicit templates where set, otherwise derived from the base URLs
    pub fn link_templates(&self) -> LinkTemplates {
        let derived =
            LinkTemplates::from_base_urls(self.jira.url.as_deref(), self.testrail.url.as_deref());
        LinkTemplates {
            issue: self.links.issue.clone().or(derived.issue),
            test_case: self.links.test_case.clone().or(derived.test_case),
        }
    }

    /// Copy of this config with secrets hidden, for display
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        if copy.jira.token.is_some() {
            copy.jira.token = Some(MASK.to_string());
        }
        if copy.testrail.api_key.is_some() {
            copy.testrail.api_key = Some(MASK.to_string());
        }
        copy
    }

    /// Commented starter file for `rtm config init`
    pub fn starter_yaml() -> &'static str {
        STARTER_CONFIG
    }
}

fn take<T>(slot: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *slot = other;
    }
}

const STARTER_CONFIG: &str = r#"# RTM configuration
# Secrets are better kept in RTM_JIRA_TOKEN / RTM_TESTRAIL_KEY.

jira:
  url: https://your-domain.atlassian.net
  email: you@example.com
  # sprint_field: customfield_10020
  # acceptance_field: customfield_10021
  # page_size: 100

testrail:
  url: https://your-domain.testrail.io
  user: you@example.com
  project_id: 1

# links:
#   issue: https://your-domain.atlassian.net/browse/{id}
#   test_case: https://your-domain.testrail.io/index.php?/tests/view/{id}

# status_labels:
#   6: Deferred

# delimiter: ", "
# timeout_secs: 30
# output_dir: reports
"#;

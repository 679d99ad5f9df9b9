//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use estate_types::{Identity, WorkflowParams};

use crate::logging::{parse_filter, LogFormat};
use crate::NodeError;

/// File name of the state snapshot inside `data_dir`.
pub const SNAPSHOT_FILE: &str = "estate.snapshot";

/// Configuration for an estate node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Directory holding the state snapshot.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Registry administrator: manages the writer designation. Only used for
    /// fresh state; a restored snapshot keeps its own administrator.
    #[serde(default = "default_administrator")]
    pub administrator: Identity,

    /// Identity the valuation workflow commits under. Only used for fresh
    /// state.
    #[serde(default = "default_workflow_writer")]
    pub workflow_writer: Identity,

    /// Designate the workflow as the registry's writer when building fresh
    /// state. Ignored when state is restored from a snapshot.
    #[serde(default = "default_true")]
    pub authorize_workflow: bool,

    /// Number of published events kept for `recent_events` queries.
    #[serde(default = "default_recent_events_capacity")]
    pub recent_events_capacity: usize,

    /// Whether the daemon writes a snapshot when it shuts down.
    #[serde(default = "default_true")]
    pub snapshot_on_shutdown: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Vote thresholds. Only used for fresh state.
    #[serde(default)]
    pub params: WorkflowParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./estate_data")
}

fn default_administrator() -> Identity {
    Identity::from("admin")
}

fn default_workflow_writer() -> Identity {
    Identity::from("valuation-workflow")
}

fn default_true() -> bool {
    true
}

fn default_recent_events_capacity() -> usize {
    256
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject configurations the node cannot run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        if !self.administrator.is_valid() {
            return Err(NodeError::Config("administrator must not be empty".into()));
        }
        if !self.workflow_writer.is_valid() {
            return Err(NodeError::Config("workflow_writer must not be empty".into()));
        }
        if let Some(name) = self.params.zero_threshold() {
            return Err(NodeError::Config(format!("{name} must be at least 1")));
        }
        self.log_format()?;
        parse_filter(&self.log_level)?;
        Ok(())
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse().map_err(NodeError::Config)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            administrator: default_administrator(),
            workflow_writer: default_workflow_writer(),
            authorize_workflow: default_true(),
            recent_events_capacity: default_recent_events_capacity(),
            snapshot_on_shutdown: default_true(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            params: WorkflowParams::default(),
        }
    }
}

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::{EmblemError, Result};

/// Top-level service configuration, parsed from the JSON file given on the
/// command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    pub server: ServerConfig,
    /// Directory scanned for per-project JSON files.
    #[serde(default)]
    pub projects_path: String,
    /// Directory holding page templates' static assets (css/js/images).
    #[serde(default = "default_pages_path")]
    pub pages_path: String,
    /// Directory holding badge backgrounds and status sub-images.
    #[serde(default = "default_badges_path")]
    pub badges_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerConfig {
    #[serde(rename = "IP")]
    pub ip: String,
    pub port: u16,
    #[serde(default)]
    pub base_path: String,
}

fn default_pages_path() -> String {
    "pages".to_string()
}

fn default_badges_path() -> String {
    "badges".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read(path)
            .map_err(|e| EmblemError::Config(format!("Unable to read '{}': {e}", path.display())))?;
        let config: Self = serde_json::from_slice(&raw)
            .map_err(|e| EmblemError::Config(format!("Unable to parse '{}': {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server.ip.is_empty() {
            return Err(EmblemError::Config(
                "You must specify a bind address".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(EmblemError::Config("You must specify a bind port".to_string()));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.ip, self.server.port)
            .parse()
            .map_err(|e| EmblemError::Config(format!("Invalid bind address: {e}")))
    }

    pub fn projects_dir(&self) -> PathBuf {
        if self.projects_path.is_empty() {
            PathBuf::from("projects")
        } else {
            PathBuf::from(&self.projects_path)
        }
    }
}

/// One configured status source: which provider to ask and where.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusSourceConfig {
    pub provider: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BadgeTemplates {
    pub passing: String,
    pub failing: String,
    pub unknown: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BadgeTemplateConfig {
    pub background: String,
    pub badges: BadgeTemplates,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OverlayPosition {
    pub left: i64,
    pub top: i64,
}

/// Placement of one provider's status sub-image on the badge background.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BadgeOverlay {
    pub provider: String,
    pub position: OverlayPosition,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BadgeConfig {
    pub template: Option<BadgeTemplateConfig>,
    #[serde(default)]
    pub overlays: Vec<BadgeOverlay>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub statuses: Vec<StatusSourceConfig>,
    #[serde(default)]
    pub badge: BadgeConfig,
}

/// Loads every project JSON file in `dir`, keyed by lowercased project
/// name. Unreadable or unparseable files are skipped with a warning; zero
/// loaded projects is fatal.
pub fn load_projects(dir: &Path) -> Result<IndexMap<String, ProjectConfig>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| EmblemError::Config(format!("Unable to open project path '{}': {e}", dir.display())))?;

    let mut projects = IndexMap::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Unable to read project file '{}': {e}", path.display());
                continue;
            }
        };
        let project: ProjectConfig = match serde_json::from_slice(&raw) {
            Ok(project) => project,
            Err(e) => {
                warn!("Unable to parse project file '{}': {e}", path.display());
                continue;
            }
        };

        debug!("Project '{}' loaded", project.name);
        projects.insert(project.name.to_lowercase(), project);
    }

    if projects.is_empty() {
        return Err(EmblemError::Config("No project configs loaded".to_string()));
    }
    if projects.len() == 1 {
        info!("Loaded 1 project config");
    } else {
        info!("Loaded {} project configs", projects.len());
    }

    Ok(projects)
}

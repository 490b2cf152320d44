use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::GenError;
use crate::types::event::{Event, EventObject, FileFields};

/// File rewritten by every iteration of a `{commits: N}` request
pub const SYNTHETIC_FILE: &str = "test.txt";

/// Process-wide authorship defaults, overridable per event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDefaults {
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A declarative event log plus authorship defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitConf {
    pub log: Vec<Event>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conf: Option<AuthorDefaults>,
}

impl GitConf {
    pub fn new(log: Vec<Event>) -> Self {
        Self { log, conf: None }
    }

    pub fn with_defaults(mut self, defaults: AuthorDefaults) -> Self {
        self.conf = Some(defaults);
        self
    }

    /// Fixed log for `commits` iterations over a single tracked file
    pub fn synthetic(commits: u32) -> Self {
        let mut log = vec![Event::from("init")];
        for i in 0..commits {
            let fields = FileFields {
                file: Some(SYNTHETIC_FILE.to_string()),
                content: Some(format!("text {}", i + 1)),
            };
            log.push(if i == 0 {
                EventObject::CreateFile(fields).into()
            } else {
                EventObject::ChangeContent(fields).into()
            });
            log.push(Event::from("commit"));
        }
        Self::new(log)
    }
}

/// What to generate: an explicit log or a number of linear commits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerateRequest {
    Log(GitConf),
    Commits { commits: u32 },
}

impl GenerateRequest {
    /// Expand into the event log the normalizer consumes
    pub fn into_conf(self) -> GitConf {
        match self {
            GenerateRequest::Log(conf) => conf,
            GenerateRequest::Commits { commits } => GitConf::synthetic(commits),
        }
    }
}

/// Config file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ConfigFormat::Json,
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Parse a request from config file content
pub fn parse_request(content: &str, format: ConfigFormat) -> Result<GenerateRequest, GenError> {
    let request = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(request)
}

/// Load a request from a YAML, JSON or TOML config file
pub fn load_request(path: &Path) -> Result<GenerateRequest, GenError> {
    if !path.exists() {
        return Err(GenError::NotFound(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    parse_request(&content, ConfigFormat::from_path(path))
}

use thiserror::Error;

/// A malformed or unrecognized entry in an event log.
///
/// `line` is 1-based over the input log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct EventLogError {
    pub line: usize,
    pub message: String,
}

impl EventLogError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Main error type for gitgen operations
#[derive(Debug, Error)]
pub enum GenError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error(transparent)]
    EventLog(#[from] EventLogError),

    #[error("A Git repository already exists in {0}")]
    RepoExists(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("merge conflict: {0}")]
    Conflict(String),

    #[error("git error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl GenError {
    /// Error code for the JSON output envelope
    pub fn error_code(&self) -> &'static str {
        match self {
            GenError::InvalidArgs(_) => "invalid_args",
            GenError::EventLog(_) => "invalid_event_log",
            GenError::RepoExists(_) => "repo_exists",
            GenError::NotFound(_) => "not_found",
            GenError::Conflict(_) => "conflict",
            GenError::Backend(_) => "git_error",
            GenError::Io(_) => "io_error",
            GenError::Json(_) => "invalid_config",
            GenError::Yaml(_) => "invalid_config",
            GenError::TomlParse(_) => "invalid_config",
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            GenError::InvalidArgs(_) => 2,
            GenError::EventLog(_) => 2,
            GenError::Json(_) | GenError::Yaml(_) | GenError::TomlParse(_) => 2,
            GenError::NotFound(_) => 3,
            GenError::RepoExists(_) => 4,
            GenError::Conflict(_) => 4,
            GenError::Io(_) => 5,
            GenError::Backend(_) => 1,
        }
    }

    /// Actionable suggestions for fixing the error
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            GenError::RepoExists(_) => vec![
                "Pass --dir with an empty or missing directory",
                "Or remove the existing .git directory first",
            ],
            GenError::EventLog(_) => vec![
                "Run with --dry-run to check the log without touching the filesystem",
            ],
            GenError::NotFound(msg) if msg.contains("branch") || msg.contains("ref") => vec![
                "Create the branch with a \"branch <name>\" event before using it",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_error_display() {
        let err = EventLogError::new(2, "\"branch\": missing branch name");
        assert_eq!(err.to_string(), "line 2: \"branch\": missing branch name");
    }

    #[test]
    fn test_exit_codes() {
        let err: GenError = EventLogError::new(1, "unrecognized event").into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.error_code(), "invalid_event_log");
        assert_eq!(GenError::RepoExists("/tmp/x".into()).exit_code(), 4);
        assert!(!GenError::RepoExists("/tmp/x".into()).suggestions().is_empty());
    }
}

use thiserror::Error;

/// Unified error type for git-versioner operations
#[derive(Error, Debug)]
pub enum GitVersionError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration error: invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("No environment of '{scope}' matches the current branch '{branch}'")]
    NoMatchingEnvironment { scope: String, branch: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-versioner
pub type Result<T> = std::result::Result<T, GitVersionError>;

impl GitVersionError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitVersionError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitVersionError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        GitVersionError::Tag(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        GitVersionError::Branch(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        GitVersionError::Remote(msg.into())
    }

    /// Create the error raised when a scope has no environment for a branch
    pub fn no_matching_environment(scope: impl Into<String>, branch: impl Into<String>) -> Self {
        GitVersionError::NoMatchingEnvironment {
            scope: scope.into(),
            branch: branch.into(),
        }
    }

    /// True for errors that abort the whole run rather than a single scope
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            GitVersionError::Config(_) | GitVersionError::Yaml(_) | GitVersionError::Toml(_)
        )
    }

    /// True for failures reported by the repository layer
    pub fn is_repository_error(&self) -> bool {
        matches!(
            self,
            GitVersionError::Git(_)
                | GitVersionError::Tag(_)
                | GitVersionError::Branch(_)
                | GitVersionError::Remote(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitVersionError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GitVersionError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_no_matching_environment_message() {
        let err = GitVersionError::no_matching_environment("app", "feature/x");
        assert_eq!(
            err.to_string(),
            "No environment of 'app' matches the current branch 'feature/x'"
        );
        assert!(!err.is_configuration_error());
        assert!(!err.is_repository_error());
    }

    #[test]
    fn test_yaml_error_is_configuration_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [unclosed").unwrap_err();
        let err: GitVersionError = yaml_err.into();
        assert!(err.is_configuration_error());
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (GitVersionError::config("x"), "Configuration error"),
            (GitVersionError::version("x"), "Version parsing error"),
            (GitVersionError::tag("x"), "Tag error"),
            (GitVersionError::branch("x"), "Branch error"),
            (GitVersionError::remote("x"), "Remote operation failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_repository_error_classification() {
        assert!(GitVersionError::tag("exists").is_repository_error());
        assert!(GitVersionError::remote("rejected").is_repository_error());
        assert!(!GitVersionError::version("bad").is_repository_error());
    }
}

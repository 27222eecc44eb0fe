use std::fmt;

/// Non-fatal conditions met while resolving a scope.
/// These never stop a resolution but must be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Several environments match the branch; the first declared one is used
    AmbiguousEnvironment {
        scope: String,
        branch: String,
        matched: Vec<String>,
        selected: String,
    },
    /// Tag is namespaced under the scope but its suffix is not a version
    UnparsableTag { tag: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::AmbiguousEnvironment {
                scope,
                branch,
                matched,
                selected,
            } => write!(
                f,
                "Multiple environments of '{}' match branch '{}': [{}]; using '{}'",
                scope,
                branch,
                matched.join(", "),
                selected
            ),
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Ignoring tag '{}': {}", tag, reason)
            }
        }
    }
}

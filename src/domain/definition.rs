use crate::boundary::BoundaryWarning;
use crate::domain::{EnvironmentDefinition, Version};

/// A named versioning scope: baseline version plus ordered environments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDefinition {
    pub name: String,
    pub baseline_version: Version,
    pub environments: Vec<EnvironmentDefinition>,
}

/// Outcome of matching a branch against the environments of a scope
#[derive(Debug, Clone, PartialEq)]
pub enum EnvironmentMatch<'a> {
    /// No environment selects the branch
    None,
    /// Exactly one environment selects the branch
    Single(&'a EnvironmentDefinition),
    /// Several environments select the branch; the first declared one wins
    Ambiguous {
        selected: &'a EnvironmentDefinition,
        matched: Vec<String>,
    },
}

impl<'a> EnvironmentMatch<'a> {
    /// The environment to use, if any
    pub fn environment(&self) -> Option<&'a EnvironmentDefinition> {
        match self {
            EnvironmentMatch::None => None,
            EnvironmentMatch::Single(env) => Some(*env),
            EnvironmentMatch::Ambiguous { selected, .. } => Some(*selected),
        }
    }

    /// Warning to surface to the operator for this match
    pub fn warning(&self, scope: &str, branch: &str) -> Option<BoundaryWarning> {
        match self {
            EnvironmentMatch::Ambiguous { selected, matched } => {
                Some(BoundaryWarning::AmbiguousEnvironment {
                    scope: scope.to_string(),
                    branch: branch.to_string(),
                    matched: matched.clone(),
                    selected: selected.name.clone(),
                })
            }
            _ => None,
        }
    }
}

impl RootDefinition {
    /// Create a scope with the default 1.0.0 baseline and no environments
    pub fn new(name: impl Into<String>) -> Self {
        RootDefinition {
            name: name.into(),
            baseline_version: Version::default(),
            environments: Vec::new(),
        }
    }

    pub fn with_baseline(mut self, version: Version) -> Self {
        self.baseline_version = version;
        self
    }

    pub fn with_environment(mut self, environment: EnvironmentDefinition) -> Self {
        self.environments.push(environment);
        self
    }

    /// Select the environment for a branch, in declaration order
    pub fn get_environment(&self, branch: &str) -> EnvironmentMatch<'_> {
        let matches: Vec<&EnvironmentDefinition> = self
            .environments
            .iter()
            .filter(|env| env.is_matching(branch))
            .collect();

        match matches.as_slice() {
            [] => EnvironmentMatch::None,
            [single] => EnvironmentMatch::Single(*single),
            [first, ..] => EnvironmentMatch::Ambiguous {
                selected: *first,
                matched: matches.iter().map(|env| env.name.clone()).collect(),
            },
        }
    }
}

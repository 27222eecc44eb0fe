use crate::domain::{BranchFilter, BumpType};

/// Versioning policy applied to the branches selected by its filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDefinition {
    pub name: String,
    pub is_prerelease: bool,
    pub prerelease_tag: Option<String>,
    pub auto_tag: bool,
    pub branch_filter: BranchFilter,
    /// Parsed from configuration but not consulted when computing versions
    pub bump_type: BumpType,
}

impl EnvironmentDefinition {
    /// Create a stable, non-tagging environment that matches no branch
    pub fn new(name: impl Into<String>) -> Self {
        EnvironmentDefinition {
            name: name.into(),
            is_prerelease: false,
            prerelease_tag: None,
            auto_tag: false,
            branch_filter: BranchFilter::None,
            bump_type: BumpType::Patch,
        }
    }

    pub fn prerelease(mut self, tag: Option<&str>) -> Self {
        self.is_prerelease = true;
        self.prerelease_tag = tag.map(str::to_string);
        self
    }

    pub fn auto_tag(mut self, auto_tag: bool) -> Self {
        self.auto_tag = auto_tag;
        self
    }

    pub fn branches(mut self, filter: BranchFilter) -> Self {
        self.branch_filter = filter;
        self
    }

    pub fn bump_type(mut self, bump_type: BumpType) -> Self {
        self.bump_type = bump_type;
        self
    }

    pub fn is_matching(&self, branch: &str) -> bool {
        self.branch_filter.is_match(branch)
    }

    /// Prerelease label for a counter, falling back to the branch name
    ///
    /// A branch name is reduced to a single semver identifier so the tag
    /// built from it parses back (`feature/x` becomes `feature-x`).
    pub fn prerelease_label(&self, branch: &str, counter: usize) -> String {
        match self.prerelease_tag.as_deref() {
            Some(tag) => format!("{}.{}", tag, counter),
            None => format!("{}.{}", branch_identifier(branch), counter),
        }
    }
}

fn branch_identifier(branch: &str) -> String {
    let identifier: String = branch
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect();

    // numeric identifiers must not carry leading zeros
    if identifier.bytes().all(|b| b.is_ascii_digit()) {
        let trimmed = identifier.trim_start_matches('0');
        return if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() };
    }
    identifier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let env = EnvironmentDefinition::new("production");
        assert!(!env.is_prerelease);
        assert!(!env.auto_tag);
        assert_eq!(env.prerelease_tag, None);
        assert_eq!(env.branch_filter, BranchFilter::None);
        assert_eq!(env.bump_type, BumpType::Patch);
        assert!(!env.is_matching("main"));
    }

    #[test]
    fn test_prerelease_label_override() {
        let env = EnvironmentDefinition::new("staging").prerelease(Some("rc"));
        assert_eq!(env.prerelease_label("develop", 3), "rc.3");
    }

    #[test]
    fn test_prerelease_label_from_branch() {
        let env = EnvironmentDefinition::new("dev").prerelease(None);
        assert_eq!(env.prerelease_label("develop", 0), "develop.0");
    }

    #[test]
    fn test_branch_label_is_a_semver_identifier() {
        let env = EnvironmentDefinition::new("preview").prerelease(None);
        assert_eq!(env.prerelease_label("feature/x", 2), "feature-x.2");
        assert_eq!(env.prerelease_label("fix/JIRA_12.a", 1), "fix-JIRA-12-a.1");
        assert_eq!(env.prerelease_label("007", 4), "7.4");

        for branch in ["feature/x", "users/me/wip", "release_1.02", "0"] {
            let label = env.prerelease_label(branch, 1);
            assert!(semver::Prerelease::new(&label).is_ok(), "{}", label);
        }
    }

    #[test]
    fn test_matching_delegates_to_filter() {
        let env = EnvironmentDefinition::new("production").branches(BranchFilter::only(["main"]));
        assert!(env.is_matching("main"));
        assert!(!env.is_matching("develop"));
    }
}

use crate::domain::Version;
use crate::error::Result;

/// A repository tag that belongs to a versioning scope (`{scope}-{version}`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTag {
    pub scope: String,
    pub version: Version,
}

impl ScopeTag {
    /// Create a new scope tag
    pub fn new(scope: impl Into<String>, version: Version) -> Self {
        ScopeTag {
            scope: scope.into(),
            version,
        }
    }

    /// Prefix shared by every tag of a scope
    pub fn prefix(scope: &str) -> String {
        format!("{}-", scope)
    }

    /// Whether a tag name is namespaced under the scope
    pub fn belongs_to(scope: &str, tag_name: &str) -> bool {
        tag_name.starts_with(&Self::prefix(scope))
    }

    /// Decode a tag name for a scope
    ///
    /// Returns `Ok(None)` when the tag belongs to another scope and an error
    /// when the suffix is not a version.
    pub fn parse(scope: &str, tag_name: &str) -> Result<Option<Self>> {
        let Some(suffix) = tag_name.strip_prefix(&Self::prefix(scope)) else {
            return Ok(None);
        };
        let version = Version::parse(suffix)?;
        Ok(Some(ScopeTag::new(scope, version)))
    }

    /// Tag name as written to the repository
    pub fn name(&self) -> String {
        format!("{}{}", Self::prefix(&self.scope), self.version)
    }

    /// Annotation message stored on the tag object
    pub fn message(&self) -> String {
        format!("{} version {}", self.scope, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name() {
        let tag = ScopeTag::new("app", Version::new(1, 2, 3));
        assert_eq!(tag.name(), "app-1.2.3");
        assert_eq!(tag.message(), "app version 1.2.3");
    }

    #[test]
    fn test_tag_name_with_labels() {
        let version = Version::new(1, 2, 1)
            .with_prerelease("rc.3")
            .with_build(Some("42".to_string()));
        let tag = ScopeTag::new("api", version);
        assert_eq!(tag.name(), "api-1.2.1-rc.3+42");
    }

    #[test]
    fn test_parse_own_scope() {
        let tag = ScopeTag::parse("app", "app-1.2.0").unwrap().unwrap();
        assert_eq!(tag.version, Version::new(1, 2, 0));
    }

    #[test]
    fn test_parse_scope_with_dash() {
        let tag = ScopeTag::parse("web-ui", "web-ui-2.0.0-beta.1")
            .unwrap()
            .unwrap();
        assert_eq!(tag.version.prerelease.as_deref(), Some("beta.1"));
    }

    #[test]
    fn test_parse_other_scope() {
        assert!(ScopeTag::parse("app", "api-1.0.0").unwrap().is_none());
        assert!(ScopeTag::parse("app", "application-1.0.0").unwrap().is_none());
        assert!(ScopeTag::parse("app", "v1.0.0").unwrap().is_none());
    }

    #[test]
    fn test_parse_bad_suffix() {
        assert!(ScopeTag::parse("app", "app-latest").is_err());
        assert!(ScopeTag::parse("app", "app-1.0").is_err());
    }

    #[test]
    fn test_belongs_to() {
        assert!(ScopeTag::belongs_to("app", "app-anything"));
        assert!(!ScopeTag::belongs_to("app", "apple-1.0.0"));
    }
}

use git_versioner::boundary::BoundaryWarning;
use git_versioner::domain::{BranchFilter, EnvironmentDefinition, RootDefinition};
use git_versioner::git::MockRepository;
use git_versioner::resolver::{ResolverOptions, VersionResolver};
use git_versioner::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_ambiguous_environment_display() {
    let warning = BoundaryWarning::AmbiguousEnvironment {
        scope: "app".to_string(),
        branch: "main".to_string(),
        matched: vec!["production".to_string(), "catch-all".to_string()],
        selected: "production".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("Multiple environments"),
        "Message should contain 'Multiple environments', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("[production, catch-all]"),
        "Message should list every matched environment, got: {}",
        display_msg
    );
    assert!(
        display_msg.ends_with("using 'production'"),
        "Message should name the selected environment, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_unparsable_tag_display() {
    let warning = BoundaryWarning::UnparsableTag {
        tag: "app-latest".to_string(),
        reason: "unexpected character".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("Ignoring tag 'app-latest'"),
        "Message should name the ignored tag, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("unexpected character"),
        "Message should contain the reason, got: {}",
        display_msg
    );
}

#[test]
fn test_display_boundary_warning_does_not_panic() {
    // Visual verification test - output is printed to stderr
    ui::display_boundary_warning(&BoundaryWarning::UnparsableTag {
        tag: "app-x".to_string(),
        reason: "not a version".to_string(),
    });
}

// ============================================================================
// Warnings Raised During Resolution
// ============================================================================

#[test]
fn test_resolution_reports_ambiguous_environment() {
    let definition = RootDefinition::new("app")
        .with_environment(EnvironmentDefinition::new("production").branches(BranchFilter::only(["main"])))
        .with_environment(EnvironmentDefinition::new("catch-all").branches(BranchFilter::ignore(["release"])));

    let mut repo = MockRepository::new();
    repo.commit();

    let resolver = VersionResolver::new(&definition, &repo, ResolverOptions::default());
    let resolution = resolver.get_new_version(None).unwrap();

    assert_eq!(resolution.environment, "production");
    assert_eq!(
        resolution.warnings,
        vec![BoundaryWarning::AmbiguousEnvironment {
            scope: "app".to_string(),
            branch: "main".to_string(),
            matched: vec!["production".to_string(), "catch-all".to_string()],
            selected: "production".to_string(),
        }]
    );
}

#[test]
fn test_resolution_reports_unparsable_tags() {
    let definition = RootDefinition::new("app")
        .with_environment(EnvironmentDefinition::new("production").branches(BranchFilter::only(["main"])));

    let mut repo = MockRepository::new();
    let first = repo.commit();
    repo.add_tag("app-1.2.0", first);
    let second = repo.commit();
    repo.add_tag("app-latest", second);
    repo.add_tag("other-nonsense", second);
    repo.commit();

    let resolver = VersionResolver::new(&definition, &repo, ResolverOptions::default());
    let resolution = resolver.get_new_version(None).unwrap();

    assert_eq!(resolution.version.to_string(), "1.2.1");
    assert_eq!(resolution.warnings.len(), 1, "only tags of the scope are reported");
    assert!(matches!(
        &resolution.warnings[0],
        BoundaryWarning::UnparsableTag { tag, .. } if tag == "app-latest"
    ));
}

#[test]
fn test_clean_resolution_has_no_warnings() {
    let definition = RootDefinition::new("app")
        .with_environment(EnvironmentDefinition::new("production").branches(BranchFilter::only(["main"])));

    let mut repo = MockRepository::new();
    repo.commit();

    let resolver = VersionResolver::new(&definition, &repo, ResolverOptions::default());
    assert!(resolver.get_new_version(None).unwrap().warnings.is_empty());
}

//! Main workflow orchestration logic
//!
//! Loads the configuration, opens the repository and runs the resolver for
//! every requested scope. Each scope is processed on its own: a failure in
//! one scope is recorded in its report and the next scope still runs.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::config::{self, ConfigModel, DEFAULT_CONFIG_FILE};
use crate::domain::RootDefinition;
use crate::error::GitVersionError;
use crate::git::{AncestryStrategy, Git2Repository, Repository};
use crate::resolver::{Resolution, ResolverOptions, TagOutcome, VersionResolver, DEFAULT_REMOTE};

/// Arguments for the versioning workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic,
/// so the workflow can be called programmatically without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// Repository location
    pub path: PathBuf,

    /// Configuration file, relative to `path` unless absolute
    pub config: PathBuf,

    /// Restrict the run to one scope
    pub environment: Option<String>,

    /// Build metadata appended to computed versions
    pub build_number: Option<u64>,

    /// Push created tags
    pub push: bool,

    pub remote: String,

    pub ancestry: AncestryStrategy,

    /// Preview mode - don't create tags or push
    pub dry_run: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        RunArgs {
            path: PathBuf::from("."),
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            environment: None,
            build_number: None,
            push: true,
            remote: DEFAULT_REMOTE.to_string(),
            ancestry: AncestryStrategy::default(),
            dry_run: false,
        }
    }
}

impl RunArgs {
    /// Location of the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.path.join(&self.config)
    }

    fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            auto_push: self.push,
            remote: self.remote.clone(),
            dry_run: self.dry_run,
        }
    }
}

/// Outcome of one scope
#[derive(Debug)]
pub struct ScopeReport {
    pub scope: String,
    pub resolution: std::result::Result<Resolution, GitVersionError>,
    /// `None` when resolution failed and tagging was not attempted
    pub tagging: Option<std::result::Result<TagOutcome, GitVersionError>>,
}

impl ScopeReport {
    pub fn is_success(&self) -> bool {
        self.resolution.is_ok() && !matches!(self.tagging, Some(Err(_)))
    }
}

/// Result of a whole run
#[derive(Debug)]
pub struct RunReport {
    /// A single scope was requested explicitly
    pub single_scope: bool,
    pub scopes: Vec<ScopeReport>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.scopes.iter().any(|s| !s.is_success())
    }
}

/// Run the workflow against the repository found at `args.path`
///
/// Configuration problems abort the run before any scope is processed.
pub fn run(args: &RunArgs) -> Result<RunReport> {
    let config_path = args.config_path();
    let config = config::load_config(&config_path)
        .with_context(|| format!("Cannot load configuration {}", config_path.display()))?;

    let repo = Git2Repository::open(&args.path)
        .with_context(|| format!("Cannot open git repository at {}", args.path.display()))?
        .with_ancestry(args.ancestry);

    run_with_repository(args, &config, &repo)
}

/// Run the workflow with an already loaded configuration and repository
pub fn run_with_repository<R: Repository>(
    args: &RunArgs,
    config: &ConfigModel,
    repo: &R,
) -> Result<RunReport> {
    let definitions: Vec<&RootDefinition> = match &args.environment {
        Some(name) => {
            let definition = config.get(name).ok_or_else(|| {
                anyhow!(
                    "The environment {} is not found in the config (available: {})",
                    name,
                    config.scope_names().join(", ")
                )
            })?;
            vec![definition]
        }
        None => config.definitions().iter().collect(),
    };

    let options = args.resolver_options();
    let scopes = definitions
        .into_iter()
        .map(|definition| process_scope(definition, repo, &options, args.build_number))
        .collect();

    Ok(RunReport {
        single_scope: args.environment.is_some(),
        scopes,
    })
}

fn process_scope<R: Repository>(
    definition: &RootDefinition,
    repo: &R,
    options: &ResolverOptions,
    build_number: Option<u64>,
) -> ScopeReport {
    debug!("processing scope {}", definition.name);
    let resolver = VersionResolver::new(definition, repo, options.clone());

    let resolution = resolver.get_new_version(build_number);
    let tagging = resolution
        .as_ref()
        .ok()
        .map(|resolved| resolver.tag_current_commit(&resolved.version));

    ScopeReport {
        scope: definition.name.clone(),
        resolution,
        tagging,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BranchFilter, EnvironmentDefinition};
    use crate::git::MockRepository;

    fn config() -> ConfigModel {
        ConfigModel::new(vec![
            RootDefinition::new("app").with_environment(
                EnvironmentDefinition::new("production")
                    .auto_tag(true)
                    .branches(BranchFilter::only(["main"])),
            ),
            RootDefinition::new("docs").with_environment(
                EnvironmentDefinition::new("preview")
                    .prerelease(None)
                    .branches(BranchFilter::only(["develop"])),
            ),
        ])
    }

    #[test]
    fn test_default_args() {
        let args = RunArgs::default();
        assert_eq!(args.config_path(), PathBuf::from("./version.yml"));
        assert!(args.push);
        assert_eq!(args.remote, "origin");
        assert_eq!(args.environment, None);
    }

    #[test]
    fn test_failed_scope_does_not_stop_others() {
        let mut repo = MockRepository::new();
        repo.commit();

        let report = run_with_repository(&RunArgs::default(), &config(), &repo).unwrap();
        assert!(!report.single_scope);
        assert_eq!(report.scopes.len(), 2);

        let app = &report.scopes[0];
        assert!(app.is_success());
        assert_eq!(app.resolution.as_ref().unwrap().version.to_string(), "1.0.0");

        let docs = &report.scopes[1];
        assert!(matches!(
            docs.resolution,
            Err(GitVersionError::NoMatchingEnvironment { .. })
        ));
        assert!(docs.tagging.is_none());
        assert!(report.has_failures());
    }

    #[test]
    fn test_single_scope() {
        let mut repo = MockRepository::new();
        repo.commit();
        let args = RunArgs {
            environment: Some("app".to_string()),
            push: false,
            ..RunArgs::default()
        };

        let report = run_with_repository(&args, &config(), &repo).unwrap();
        assert!(report.single_scope);
        assert_eq!(report.scopes.len(), 1);
        assert!(!report.has_failures());
        assert!(matches!(
            report.scopes[0].tagging,
            Some(Ok(TagOutcome::Created { pushed: false, .. }))
        ));
        assert_eq!(repo.created_tags()[0].name, "app-1.0.0");
    }

    #[test]
    fn test_unknown_scope_is_an_error() {
        let repo = MockRepository::new();
        let args = RunArgs {
            environment: Some("missing".to_string()),
            ..RunArgs::default()
        };

        let err = run_with_repository(&args, &config(), &repo).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_tagging_failure_keeps_resolution() {
        let mut repo = MockRepository::new();
        repo.commit();
        repo.fail_pushes();
        let args = RunArgs {
            environment: Some("app".to_string()),
            ..RunArgs::default()
        };

        let report = run_with_repository(&args, &config(), &repo).unwrap();
        let app = &report.scopes[0];
        assert_eq!(app.resolution.as_ref().unwrap().version.to_string(), "1.0.0");
        assert!(matches!(app.tagging, Some(Err(_))));
        assert!(!app.is_success());
    }
}

use crate::boundary::BoundaryWarning;
use crate::domain::{EnvironmentDefinition, RootDefinition, ScopeTag, Version};
use crate::error::{GitVersionError, Result};
use crate::git::Repository;
use git2::Oid;
use tracing::{debug, info, warn};

/// Remote tags are pushed to unless configured otherwise
pub const DEFAULT_REMOTE: &str = "origin";

/// Run-wide switches for tagging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Push created tags to `remote` right away
    pub auto_push: bool,
    pub remote: String,
    /// Report the tag that would be created without touching the repository
    pub dry_run: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions {
            auto_push: true,
            remote: DEFAULT_REMOTE.to_string(),
            dry_run: false,
        }
    }
}

/// Version computed for a scope, with the context it was derived from
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub scope: String,
    pub branch: String,
    pub environment: String,
    pub version: Version,
    /// Latest stable tag of the scope, if any
    pub latest_tag: Option<String>,
    /// The head commit already carries the latest stable tag
    pub already_tagged: bool,
    pub warnings: Vec<BoundaryWarning>,
}

/// What `tag_current_commit` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// The environment does not tag automatically
    AutoTagDisabled,
    /// A tag of the scope already points to the head commit
    AlreadyTagged { tag: String },
    /// Dry run: the tag that would have been created
    Planned { tag: String },
    Created { tag: String, pushed: bool },
}

#[derive(Debug, Clone)]
struct StableTag {
    name: String,
    target: Oid,
    timestamp: i64,
    version: Version,
}

/// Computes versions and tags commits for one scope
pub struct VersionResolver<'a, R: Repository> {
    definition: &'a RootDefinition,
    repo: &'a R,
    options: ResolverOptions,
}

impl<'a, R: Repository> VersionResolver<'a, R> {
    pub fn new(definition: &'a RootDefinition, repo: &'a R, options: ResolverOptions) -> Self {
        VersionResolver {
            definition,
            repo,
            options,
        }
    }

    fn select_environment(
        &self,
        branch: &str,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<&'a EnvironmentDefinition> {
        let selection = self.definition.get_environment(branch);

        if let Some(warning) = selection.warning(&self.definition.name, branch) {
            debug!("{}", warning);
            warnings.push(warning);
        }

        selection.environment().ok_or_else(|| {
            GitVersionError::no_matching_environment(&self.definition.name, branch)
        })
    }

    /// Compute the next version of the scope for the active branch
    ///
    /// # Arguments
    /// * `build_number` - Optional build metadata appended to the version
    ///
    /// # Returns
    /// * `Ok(Resolution)` - The version and the warnings met on the way
    /// * `Err` - If no environment matches the branch or the repository fails
    pub fn get_new_version(&self, build_number: Option<u64>) -> Result<Resolution> {
        let mut warnings = Vec::new();
        let branch = self.repo.active_branch_name()?;
        let env = self.select_environment(&branch, &mut warnings)?;
        debug!(
            "scope {} resolves branch {} with environment {}",
            self.definition.name, branch, env.name
        );

        let latest = self.find_latest_stable_tag(&mut warnings)?;
        let head = self.repo.active_head_commit()?;

        let resolution = |version: Version, already_tagged: bool| Resolution {
            scope: self.definition.name.clone(),
            branch: branch.clone(),
            environment: env.name.clone(),
            version,
            latest_tag: latest.as_ref().map(|t| t.name.clone()),
            already_tagged,
            warnings: warnings.clone(),
        };

        if let Some(tag) = latest.as_ref().filter(|t| t.target == head) {
            debug!("head {} already carries {}", head, tag.name);
            return Ok(resolution(tag.version.clone(), true));
        }

        let baseline = &self.definition.baseline_version;
        let current = match &latest {
            Some(tag) if tag.version >= *baseline => tag.version.clone(),
            Some(tag) => {
                debug!(
                    "baseline {} of {} overrides latest tag {}",
                    baseline, self.definition.name, tag.name
                );
                baseline.clone()
            }
            None => baseline.clone(),
        };

        let build = build_number.map(|n| n.to_string());
        let version = if env.is_prerelease {
            self.prerelease_version(env, &branch, head, latest.as_ref(), current, build)?
        } else {
            stable_version(latest.as_ref(), current, build)?
        };

        info!("{} version on {}: {}", self.definition.name, branch, version);
        Ok(resolution(version, false))
    }

    fn prerelease_version(
        &self,
        env: &EnvironmentDefinition,
        branch: &str,
        head: Oid,
        latest: Option<&StableTag>,
        current: Version,
        build: Option<String>,
    ) -> Result<Version> {
        // a finalized release must not be reused as a prerelease base
        let base = match latest {
            Some(tag) if tag.version.same_release(&current) => current.bump_patch()?,
            _ => current,
        };

        let counter = match latest {
            Some(tag) if tag.target == head => 0,
            _ => self.count_commits_since(head, latest)?,
        };

        Ok(base
            .finalize()
            .with_prerelease(env.prerelease_label(branch, counter))
            .with_build(build))
    }

    fn count_commits_since(&self, head: Oid, tag: Option<&StableTag>) -> Result<usize> {
        let ancestry = self.repo.commit_ancestry(head)?;
        let stop = tag.map(|t| t.target);

        Ok(ancestry
            .iter()
            .take_while(|oid| Some(**oid) != stop)
            .count())
    }

    fn find_latest_stable_tag(
        &self,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<Option<StableTag>> {
        let scope = &self.definition.name;
        let mut stable = Vec::new();

        for tag in self.repo.list_tags()? {
            match ScopeTag::parse(scope, &tag.name) {
                Ok(Some(parsed)) if parsed.version.is_stable() => stable.push(StableTag {
                    name: tag.name,
                    target: tag.target,
                    timestamp: tag.timestamp,
                    version: parsed.version,
                }),
                Ok(_) => {}
                Err(e) => {
                    let warning = BoundaryWarning::UnparsableTag {
                        tag: tag.name,
                        reason: e.to_string(),
                    };
                    debug!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(stable.into_iter().max_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.version.cmp(&b.version))
                .then_with(|| a.name.cmp(&b.name))
        }))
    }

    /// Tag the head commit with `version` when the environment asks for it
    ///
    /// Never tags a commit twice: an existing tag of the scope on the head
    /// commit turns this into a no-op.
    pub fn tag_current_commit(&self, version: &Version) -> Result<TagOutcome> {
        let branch = self.repo.active_branch_name()?;
        let env = self
            .definition
            .get_environment(&branch)
            .environment()
            .ok_or_else(|| GitVersionError::no_matching_environment(&self.definition.name, &branch))?;

        if !env.auto_tag {
            debug!("environment {} does not auto-tag", env.name);
            return Ok(TagOutcome::AutoTagDisabled);
        }

        let head = self.repo.active_head_commit()?;
        let existing = self
            .repo
            .list_tags()?
            .into_iter()
            .find(|t| t.target == head && ScopeTag::belongs_to(&self.definition.name, &t.name));
        if let Some(existing) = existing {
            debug!("{} already tagged with {}", head, existing.name);
            return Ok(TagOutcome::AlreadyTagged { tag: existing.name });
        }

        let tag = ScopeTag::new(&self.definition.name, version.clone());
        let name = tag.name();

        if self.options.dry_run {
            return Ok(TagOutcome::Planned { tag: name });
        }

        self.repo.create_tag(&name, head, &tag.message())?;
        info!("created tag {}", name);

        if !self.options.auto_push {
            return Ok(TagOutcome::Created {
                tag: name,
                pushed: false,
            });
        }

        if let Err(e) = self.repo.push_tag(&self.options.remote, &name) {
            warn!("tag {} was created locally but not pushed", name);
            return Err(e);
        }

        Ok(TagOutcome::Created {
            tag: name,
            pushed: true,
        })
    }
}

fn stable_version(
    latest: Option<&StableTag>,
    current: Version,
    build: Option<String>,
) -> Result<Version> {
    // only patch auto-increments; the environment's bump type is not consulted
    Ok(match latest {
        None => current.with_build(build),
        Some(_) => current.bump_patch()?.with_build(build),
    })
}

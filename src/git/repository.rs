use crate::error::{GitVersionError, Result};
use crate::git::{AncestryStrategy, TagInfo};
use git2::{ErrorCode, ObjectType, Oid, Repository as Git2Repo, Signature, Sort};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

const FALLBACK_SIGNATURE_NAME: &str = "git-versioner";
const FALLBACK_SIGNATURE_EMAIL: &str = "git-versioner@localhost";

/// Wrapper around git2::Repository with our trait interface
///
/// libgit2 handles are not `Sync`; every operation goes through the mutex,
/// which also serializes tag creation and push.
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
    ancestry: AncestryStrategy,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
            ancestry: AncestryStrategy::default(),
        }
    }

    /// Select how commit ancestry is walked
    pub fn with_ancestry(mut self, ancestry: AncestryStrategy) -> Self {
        self.ancestry = ancestry;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Git2Repo>> {
        self.repo
            .lock()
            .map_err(|_| git2::Error::from_str("repository handle poisoned by a previous panic").into())
    }
}

fn signature(repo: &Git2Repo) -> Result<Signature<'static>> {
    match repo.signature() {
        Ok(sig) => Ok(sig.to_owned()),
        Err(e) if e.code() == ErrorCode::NotFound => {
            debug!("no git identity configured, tagging as {}", FALLBACK_SIGNATURE_NAME);
            Ok(Signature::now(
                FALLBACK_SIGNATURE_NAME,
                FALLBACK_SIGNATURE_EMAIL,
            )?)
        }
        Err(e) => Err(e.into()),
    }
}

fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Some(ssh_dir) = dirs::home_dir().map(|home| home.join(".ssh")) {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = ssh_dir.join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });

    callbacks.push_update_reference(|refname, status| match status {
        Some(status) => Err(git2::Error::from_str(&format!(
            "remote rejected {}: {}",
            refname, status
        ))),
        None => Ok(()),
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn active_branch_name(&self) -> Result<String> {
        let repo = self.lock()?;
        let head = repo.head().map_err(|e| match e.code() {
            ErrorCode::UnbornBranch => GitVersionError::branch("Active branch has no commits yet"),
            _ => GitVersionError::branch(format!("Cannot read HEAD: {}", e)),
        })?;

        if !head.is_branch() {
            return Err(GitVersionError::branch(
                "HEAD is detached; check out a branch to compute a version",
            ));
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| GitVersionError::branch("Active branch name is not valid UTF-8"))
    }

    fn active_head_commit(&self) -> Result<Oid> {
        let repo = self.lock()?;
        let commit = repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| GitVersionError::branch(format!("Cannot resolve HEAD commit: {}", e)))?;

        Ok(commit.id())
    }

    fn list_tags(&self) -> Result<Vec<TagInfo>> {
        let repo = self.lock()?;
        let names = repo.tag_names(None)?;
        let mut tags = Vec::with_capacity(names.len());

        for name in names.iter().flatten() {
            let reference = match repo.find_reference(&format!("refs/tags/{}", name)) {
                Ok(reference) => reference,
                Err(e) => {
                    warn!("cannot read tag {}: {}", name, e);
                    continue;
                }
            };

            match reference.peel_to_commit() {
                Ok(commit) => tags.push(TagInfo {
                    name: name.to_string(),
                    target: commit.id(),
                    timestamp: commit.time().seconds(),
                }),
                Err(e) => debug!("skipping tag {} not pointing to a commit: {}", name, e),
            }
        }

        Ok(tags)
    }

    fn commit_ancestry(&self, from: Oid) -> Result<Vec<Oid>> {
        let repo = self.lock()?;
        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(from)?;
        if self.ancestry == AncestryStrategy::FirstParent {
            revwalk.simplify_first_parent()?;
        }

        let commits = revwalk.collect::<std::result::Result<Vec<Oid>, git2::Error>>()?;
        Ok(commits)
    }

    fn create_tag(&self, name: &str, target: Oid, message: &str) -> Result<()> {
        let repo = self.lock()?;
        let object = repo
            .find_object(target, Some(ObjectType::Commit))
            .map_err(|e| GitVersionError::tag(format!("Cannot find commit {}: {}", target, e)))?;
        let tagger = signature(&repo)?;

        repo.tag(name, &object, &tagger, message, false)
            .map_err(|e| GitVersionError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        debug!("created tag {} on {}", name, target);
        Ok(())
    }

    fn push_tag(&self, remote: &str, tag_name: &str) -> Result<()> {
        let repo = self.lock()?;
        let mut remote_handle = repo
            .find_remote(remote)
            .map_err(|e| GitVersionError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(remote_callbacks());

        let refspec = format!("refs/tags/{}:refs/tags/{}", tag_name, tag_name);
        remote_handle
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    GitVersionError::remote(format!("Network error during push: {}", e))
                } else {
                    GitVersionError::remote(format!("Failed to push tag '{}': {}", tag_name, e))
                }
            })?;

        debug!("pushed tag {} to {}", tag_name, remote);
        Ok(())
    }
}

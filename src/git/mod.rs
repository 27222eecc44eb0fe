//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository
//! operations the version resolver needs, allowing for multiple
//! implementations including real Git repositories and mock implementations
//! for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! # Usage
//!
//! Most code should depend on the [Repository] trait rather than concrete
//! implementations to enable easy testing and flexibility.
//!
//! ```rust
//! # use git_versioner::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let head = repo.active_head_commit()?;
//! let history = repo.commit_ancestry(head)?;
//! println!("{} commits reachable from {}", history.len(), head);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// A tag together with the commit it points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    /// The tag name, without the `refs/tags/` prefix
    pub name: String,
    /// The commit the tag resolves to
    pub target: Oid,
    /// Commit time of the target, in seconds since the epoch
    pub timestamp: i64,
}

/// How commit ancestry is walked when counting commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AncestryStrategy {
    /// Follow only the first parent of merge commits
    #[default]
    FirstParent,
    /// Visit every reachable commit
    Full,
}

/// Repository operations consumed by the version resolver
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync`. Tag creation and push mutate the
/// repository and implementations must serialize them.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the appropriate
/// [crate::error::GitVersionError] variants.
pub trait Repository: Send + Sync {
    /// Name of the branch HEAD points to
    ///
    /// # Returns
    /// * `Ok(String)` - Short branch name (e.g., "main")
    /// * `Err` - If HEAD is detached, unborn, or unreadable
    fn active_branch_name(&self) -> Result<String>;

    /// Commit at the tip of the active branch
    fn active_head_commit(&self) -> Result<Oid>;

    /// Every tag of the repository resolved to its commit
    ///
    /// Tags that do not resolve to a commit are left out.
    fn list_tags(&self) -> Result<Vec<TagInfo>>;

    /// Commits reachable from `from`, most recent first, `from` included
    ///
    /// # Example
    /// ```rust
    /// # use git_versioner::git::Repository;
    /// # use git2::Oid;
    /// # fn example<R: Repository>(repo: &R, tag_commit: Oid) -> Result<(), Box<dyn std::error::Error>> {
    /// let head = repo.active_head_commit()?;
    /// let since_tag = repo
    ///     .commit_ancestry(head)?
    ///     .into_iter()
    ///     .take_while(|oid| *oid != tag_commit)
    ///     .count();
    /// println!("{} commits since tag", since_tag);
    /// # Ok(())
    /// # }
    /// ```
    fn commit_ancestry(&self, from: Oid) -> Result<Vec<Oid>>;

    /// Create an annotated tag on `target`
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the tag already exists, the target is not a commit, or Git error occurs
    fn create_tag(&self, name: &str, target: Oid, message: &str) -> Result<()>;

    /// Push a single tag to a remote
    fn push_tag(&self, remote: &str, tag_name: &str) -> Result<()>;
}

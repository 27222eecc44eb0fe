use crate::error::{GitVersionError, Result};
use crate::git::{AncestryStrategy, Repository, TagInfo};
use git2::Oid;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// A tag created through [Repository::create_tag] on the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTag {
    pub name: String,
    pub target: Oid,
    pub message: String,
}

#[derive(Debug, Default)]
struct MockState {
    tags: Vec<TagInfo>,
    created: Vec<CreatedTag>,
    pushed: Vec<(String, String)>,
}

/// In-memory repository for testing without actual git operations
///
/// Commits get deterministic OIDs and increasing timestamps in creation
/// order. Tags created through the trait become visible to `list_tags`.
pub struct MockRepository {
    parents: HashMap<Oid, Vec<Oid>>,
    timestamps: HashMap<Oid, i64>,
    branch: String,
    head: Option<Oid>,
    ancestry: AncestryStrategy,
    fail_push: bool,
    state: Mutex<MockState>,
}

impl MockRepository {
    /// Create a new empty mock repository on branch `main`
    pub fn new() -> Self {
        MockRepository {
            parents: HashMap::new(),
            timestamps: HashMap::new(),
            branch: "main".to_string(),
            head: None,
            ancestry: AncestryStrategy::default(),
            fail_push: false,
            state: Mutex::new(MockState::default()),
        }
    }

    fn next_oid(&self) -> Oid {
        let index = self.parents.len() as u32 + 1;
        let mut bytes = [0u8; 20];
        bytes[16..].copy_from_slice(&index.to_be_bytes());
        Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero())
    }

    /// Add a commit with the given parents and make it the head
    pub fn commit_with_parents(&mut self, parents: &[Oid]) -> Oid {
        let oid = self.next_oid();
        let timestamp = 1_700_000_000 + self.parents.len() as i64 * 60;
        self.parents.insert(oid, parents.to_vec());
        self.timestamps.insert(oid, timestamp);
        self.head = Some(oid);
        oid
    }

    /// Add a commit on top of the current head and make it the head
    pub fn commit(&mut self) -> Oid {
        let parents: Vec<Oid> = self.head.into_iter().collect();
        self.commit_with_parents(&parents)
    }

    /// Add `count` linear commits and return them oldest first
    pub fn commits(&mut self, count: usize) -> Vec<Oid> {
        (0..count).map(|_| self.commit()).collect()
    }

    /// Set the active branch name
    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    pub fn set_ancestry(&mut self, ancestry: AncestryStrategy) {
        self.ancestry = ancestry;
    }

    /// Make every push fail with a remote error
    pub fn fail_pushes(&mut self) {
        self.fail_push = true;
    }

    /// Add a tag pointing to a commit
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        let timestamp = self.timestamps.get(&oid).copied().unwrap_or_default();
        self.state_mut().tags.push(TagInfo {
            name: name.into(),
            target: oid,
            timestamp,
        });
    }

    /// Tags created through the trait, in creation order
    pub fn created_tags(&self) -> Vec<CreatedTag> {
        self.lock().map(|s| s.created.clone()).unwrap_or_default()
    }

    /// `(remote, tag)` pairs pushed through the trait
    pub fn pushed_tags(&self) -> Vec<(String, String)> {
        self.lock().map(|s| s.pushed.clone()).unwrap_or_default()
    }

    fn state_mut(&mut self) -> &mut MockState {
        match self.state.get_mut() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MockState>> {
        self.state
            .lock()
            .map_err(|_| GitVersionError::tag("mock repository state poisoned"))
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn active_branch_name(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn active_head_commit(&self) -> Result<Oid> {
        self.head
            .ok_or_else(|| GitVersionError::branch("Active branch has no commits yet"))
    }

    fn list_tags(&self) -> Result<Vec<TagInfo>> {
        Ok(self.lock()?.tags.clone())
    }

    fn commit_ancestry(&self, from: Oid) -> Result<Vec<Oid>> {
        if !self.parents.contains_key(&from) {
            return Err(GitVersionError::branch(format!("Unknown commit {}", from)));
        }

        let mut visited = Vec::new();
        let mut pending = vec![from];
        while let Some(oid) = pending.pop() {
            if visited.contains(&oid) {
                continue;
            }
            visited.push(oid);

            let parents = self.parents.get(&oid).map(Vec::as_slice).unwrap_or(&[]);
            match self.ancestry {
                AncestryStrategy::FirstParent => pending.extend(parents.first()),
                AncestryStrategy::Full => pending.extend(parents.iter().rev()),
            }
        }

        if self.ancestry == AncestryStrategy::Full {
            // newest first, like a topological revwalk
            visited.sort_by_key(|oid| std::cmp::Reverse(self.timestamps.get(oid).copied()));
        }

        Ok(visited)
    }

    fn create_tag(&self, name: &str, target: Oid, message: &str) -> Result<()> {
        let mut state = self.lock()?;
        if state.tags.iter().any(|t| t.name == name) {
            return Err(GitVersionError::tag(format!("Tag '{}' already exists", name)));
        }

        state.tags.push(TagInfo {
            name: name.to_string(),
            target,
            timestamp: self.timestamps.get(&target).copied().unwrap_or_default(),
        });
        state.created.push(CreatedTag {
            name: name.to_string(),
            target,
            message: message.to_string(),
        });
        Ok(())
    }

    fn push_tag(&self, remote: &str, tag_name: &str) -> Result<()> {
        if self.fail_push {
            return Err(GitVersionError::remote(format!(
                "Failed to push tag '{}': remote '{}' unreachable",
                tag_name, remote
            )));
        }

        self.lock()?
            .pushed
            .push((remote.to_string(), tag_name.to_string()));
        Ok(())
    }
}

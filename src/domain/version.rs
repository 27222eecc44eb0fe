use crate::error::{GitVersionError, Result};
use regex::Regex;
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
///
/// Ordering and equality follow semantic-version precedence: build metadata
/// is carried along for rendering but never compared.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
    pub build: Option<String>,
}

impl Version {
    /// Create a new finalized version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Parse a full semantic version string (e.g. "1.2.3-rc.1+42")
    pub fn parse(input: &str) -> Result<Self> {
        let parsed = semver::Version::parse(input).map_err(|e| {
            GitVersionError::version(format!("Invalid version '{}': {}", input, e))
        })?;
        Ok(Version::from(parsed))
    }

    /// Copy of this version carrying the given prerelease label
    pub fn with_prerelease(&self, label: impl Into<String>) -> Self {
        let label = label.into();
        Version {
            prerelease: (!label.is_empty()).then_some(label),
            ..self.clone()
        }
    }

    /// Copy of this version carrying the given build metadata
    pub fn with_build(&self, build: Option<String>) -> Self {
        Version {
            build: build.filter(|b| !b.is_empty()),
            ..self.clone()
        }
    }

    /// A version without prerelease label is a stable release
    pub fn is_stable(&self) -> bool {
        self.prerelease.is_none()
    }

    /// Strip prerelease label and build metadata
    pub fn finalize(&self) -> Self {
        Version::new(self.major, self.minor, self.patch)
    }

    /// Same major.minor.patch, whatever the labels
    pub fn same_release(&self, other: &Version) -> bool {
        self.major == other.major && self.minor == other.minor && self.patch == other.patch
    }

    /// Bump version according to bump type
    ///
    /// Major, minor and patch bumps drop the prerelease label and build
    /// metadata. A build bump keeps the release and increments the last
    /// numeric identifier of the build metadata.
    ///
    /// # Returns
    /// * `Err` - If the bumped component would overflow
    pub fn bump(&self, bump_type: BumpType) -> Result<Self> {
        let increment = |value: u64, component: &str| {
            value.checked_add(1).ok_or_else(|| {
                GitVersionError::version(format!(
                    "Cannot bump {} of {}: component overflows",
                    component, self
                ))
            })
        };

        Ok(match bump_type {
            BumpType::Major => Version::new(increment(self.major, "major")?, 0, 0),
            BumpType::Minor => Version::new(self.major, increment(self.minor, "minor")?, 0),
            BumpType::Patch => {
                Version::new(self.major, self.minor, increment(self.patch, "patch")?)
            }
            BumpType::Build => Version {
                build: Some(next_build(self.build.as_deref())),
                ..self.clone()
            },
        })
    }

    pub fn bump_patch(&self) -> Result<Self> {
        self.bump(BumpType::Patch)
    }
}

fn next_build(build: Option<&str>) -> String {
    let Some(build) = build else {
        return "build.1".to_string();
    };

    let incremented = Regex::new(r"^(.*?)(\d+)(\D*)$")
        .ok()
        .and_then(|re| re.captures(build))
        .and_then(|caps| {
            let number = caps.get(2)?.as_str().parse::<u64>().ok()?.checked_add(1)?;
            Some(format!("{}{}{}", &caps[1], number, &caps[3]))
        });

    incremented.unwrap_or_else(|| format!("{}.1", build))
}

fn compare_prerelease(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (semver::Prerelease::new(a), semver::Prerelease::new(b)) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            // labels built by hand may not be valid semver
            _ => a.cmp(b),
        },
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| {
                compare_prerelease(self.prerelease.as_deref(), other.prerelease.as_deref())
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl From<semver::Version> for Version {
    fn from(v: semver::Version) -> Self {
        Version {
            major: v.major,
            minor: v.minor,
            patch: v.patch,
            prerelease: (!v.pre.is_empty()).then(|| v.pre.to_string()),
            build: (!v.build.is_empty()).then(|| v.build.to_string()),
        }
    }
}

impl FromStr for Version {
    type Err = GitVersionError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::new(1, 0, 0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

/// Version bump granularity configured on an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Major,
    Minor,
    #[default]
    Patch,
    Build,
}

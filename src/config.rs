use crate::domain::{BranchFilter, BumpType, EnvironmentDefinition, RootDefinition, Version};
use crate::error::{GitVersionError, Result};
use regex::Regex;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, warn};

/// Configuration file looked up when none is given
pub const DEFAULT_CONFIG_FILE: &str = "version.yml";

/// Scope names end up in tag names, so they are restricted to ref-safe characters.
const SCOPE_NAME_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9._-]*$";

/// Loaded configuration: every versioning scope in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigModel {
    definitions: Vec<RootDefinition>,
}

impl ConfigModel {
    pub fn new(definitions: Vec<RootDefinition>) -> Self {
        ConfigModel { definitions }
    }

    /// All scopes in declaration order
    pub fn definitions(&self) -> &[RootDefinition] {
        &self.definitions
    }

    /// Look up a scope by name
    pub fn get(&self, name: &str) -> Option<&RootDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Names of all scopes in declaration order
    pub fn scope_names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw: RawDocument = serde_yaml::from_str(content)?;
        raw.into_model()
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawDocument = toml::from_str(content)?;
        raw.into_model()
    }
}

/// Supported configuration document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension; anything but `.toml` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Loads the configuration model from a file.
///
/// The format follows the file extension: `.toml` files are read as TOML,
/// everything else (`version.yml` by default) as YAML.
///
/// # Arguments
/// * `path` - Path to the configuration file
///
/// # Returns
/// * `Ok(ConfigModel)` - Loaded and validated configuration
/// * `Err` - If the file cannot be read, parsed or validated
pub fn load_config(path: &Path) -> Result<ConfigModel> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GitVersionError::config(format!("Configuration file not found: {}", path.display()))
        } else {
            GitVersionError::Io(e)
        }
    })?;

    let format = ConfigFormat::from_path(path);
    debug!("loading {:?} configuration from {}", format, path.display());

    match format {
        ConfigFormat::Yaml => ConfigModel::from_yaml_str(&content),
        ConfigFormat::Toml => ConfigModel::from_toml_str(&content),
    }
}

/// Map that keeps entries in document order and rejects duplicate keys.
#[derive(Debug)]
struct OrderedMap<T>(Vec<(String, T)>);

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        OrderedMap(Vec::new())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<T> {
            type Value = OrderedMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of names to definitions")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, T)> = Vec::new();
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    if entries.iter().any(|(existing, _)| *existing == key) {
                        return Err(de::Error::custom(format!("duplicate key '{}'", key)));
                    }
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct RawDocument {
    scopes: OrderedMap<Option<RawScope>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawScope {
    version: Option<String>,
    #[serde(default)]
    environments: OrderedMap<Option<RawEnvironment>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawEnvironment {
    #[serde(default)]
    is_prerelease: bool,
    prerelease_tag: Option<String>,
    #[serde(default)]
    auto_tag: bool,
    #[serde(default)]
    bump_type: BumpType,
    branches: Option<RawBranches>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBranches {
    only: Option<Vec<String>>,
    ignore: Option<Vec<String>>,
}

impl RawDocument {
    fn into_model(self) -> Result<ConfigModel> {
        if self.scopes.0.is_empty() {
            return Err(GitVersionError::config("No versioning scope is defined"));
        }

        let name_pattern = Regex::new(SCOPE_NAME_PATTERN)
            .map_err(|e| GitVersionError::config(format!("Invalid scope name pattern: {}", e)))?;

        let definitions = self
            .scopes
            .0
            .into_iter()
            .map(|(name, scope)| {
                if !name_pattern.is_match(&name) || name.contains("..") {
                    return Err(GitVersionError::config(format!(
                        "Scope name '{}' cannot be used as a tag prefix",
                        name
                    )));
                }
                scope.unwrap_or_default().into_definition(name)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ConfigModel::new(definitions))
    }
}

impl RawScope {
    fn into_definition(self, name: String) -> Result<RootDefinition> {
        let baseline_version = match self.version.as_deref() {
            Some(raw) => Version::parse(raw.trim()).map_err(|e| {
                GitVersionError::config(format!("Scope '{}' has an invalid version: {}", name, e))
            })?,
            None => Version::default(),
        };
        if !baseline_version.is_stable() || baseline_version.build.is_some() {
            return Err(GitVersionError::config(format!(
                "Scope '{}' version must be a plain major.minor.patch, got {}",
                name, baseline_version
            )));
        }

        let environments = self
            .environments
            .0
            .into_iter()
            .map(|(env_name, env)| env.unwrap_or_default().into_environment(&name, env_name))
            .collect::<Result<Vec<_>>>()?;

        if environments.is_empty() {
            warn!("scope {} declares no environment; no branch will match it", name);
        }

        Ok(RootDefinition {
            name,
            baseline_version,
            environments,
        })
    }
}

impl RawEnvironment {
    fn into_environment(self, scope: &str, name: String) -> Result<EnvironmentDefinition> {
        let branch_filter = match self.branches {
            None => BranchFilter::None,
            Some(RawBranches {
                only: Some(_),
                ignore: Some(_),
            }) => {
                return Err(GitVersionError::config(format!(
                    "Environment '{}' of '{}' sets both 'only' and 'ignore' branches",
                    name, scope
                )))
            }
            Some(RawBranches {
                only: Some(only), ..
            }) => BranchFilter::Only(only),
            Some(RawBranches {
                ignore: Some(ignore),
                ..
            }) => BranchFilter::Ignore(ignore),
            Some(_) => BranchFilter::None,
        };

        if matches!(self.prerelease_tag.as_deref(), Some(tag) if tag.trim().is_empty()) {
            return Err(GitVersionError::config(format!(
                "Environment '{}' of '{}' has an empty prerelease-tag",
                name, scope
            )));
        }

        if let Some(tag) = self.prerelease_tag.as_deref() {
            if semver::Prerelease::new(&format!("{}.0", tag)).is_err() {
                return Err(GitVersionError::config(format!(
                    "Environment '{}' of '{}' has a prerelease-tag '{}' that is not a valid version label",
                    name, scope, tag
                )));
            }
        }

        if self.prerelease_tag.is_some() && !self.is_prerelease {
            warn!(
                "environment {} of {} sets prerelease-tag but is not a prerelease environment",
                name, scope
            );
        }

        Ok(EnvironmentDefinition {
            name,
            is_prerelease: self.is_prerelease,
            prerelease_tag: self.prerelease_tag,
            auto_tag: self.auto_tag,
            branch_filter,
            bump_type: self.bump_type,
        })
    }
}

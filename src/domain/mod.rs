//! Domain logic - versioning rules independent of git operations

pub mod branch;
pub mod definition;
pub mod environment;
pub mod tag;
pub mod version;

pub use branch::BranchFilter;
pub use definition::{EnvironmentMatch, RootDefinition};
pub use environment::EnvironmentDefinition;
pub use tag::ScopeTag;
pub use version::{BumpType, Version};

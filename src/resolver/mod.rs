//! Version resolution engine: turns a scope definition and the repository
//! state into the next version, and tags commits with it.

pub mod version_resolver;

pub use version_resolver::{
    Resolution, ResolverOptions, TagOutcome, VersionResolver, DEFAULT_REMOTE,
};

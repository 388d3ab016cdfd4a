//! Credential provider adapters.
//!
//! `DirectoryCredentialProvider` reads mounted secret files;
//! `CachedCredentialProvider` optionally fronts it with a TTL cache.

mod cached;
mod directory;

pub use cached::CachedCredentialProvider;
pub use directory::DirectoryCredentialProvider;

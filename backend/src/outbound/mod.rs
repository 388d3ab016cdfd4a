//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **billing**: the remote billing provider over HTTP (reqwest)
//! - **credentials**: the secret backend (mounted files, optional TTL cache)
//! - **persistence**: the PostgreSQL-backed local store using Diesel ORM
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod billing;
pub mod credentials;
pub mod persistence;

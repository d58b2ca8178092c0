//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **assets**: filesystem image storage and post-commit cleanup
//!
//! Adapters convert between domain types and infrastructure representations
//! and contain no game rules.

pub mod assets;
pub mod persistence;

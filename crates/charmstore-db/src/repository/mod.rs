//! Repository pattern implementations for database operations.
//!
//! - [`EntityRepository`](entity::EntityRepository) - Published revisions
//! - [`BaseEntityRepository`](base_entity::BaseEntityRepository) - Per-package records and ACLs

pub mod base_entity;
pub mod entity;

/// Sort direction for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

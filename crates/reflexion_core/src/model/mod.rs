//! Journal domain model.
//!
//! # Responsibility
//! - Define the canonical entry record shared by every capture producer.
//! - Keep mood labels and seed constants in one place.
//!
//! # Invariants
//! - Every entry is identified by a stable `EntryId`.
//! - Entries are never deleted; an id moves from absent to present only.

pub mod entry;
pub mod mood;

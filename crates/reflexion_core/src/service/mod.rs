//! Producer-facing use-case services.
//!
//! # Responsibility
//! - Turn capture outputs into complete entries and hand them to the store.
//! - Keep id/date assignment out of capture and presentation code.

pub mod journal_service;

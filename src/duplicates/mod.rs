//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Fingerprint bucketing with structural verification
//! - Dominance filtering down to maximal groups
//! - The [`DirectoryFinder`] pipeline orchestrator

pub mod dominance;
pub mod finder;
pub mod groups;

pub use dominance::filter_dominated;
pub use finder::{DirectoryFinder, FinderConfig, ScanSummary};
pub use groups::{collect_groups, CollectedGroups, CollisionMismatch, DuplicateGroup, RawGroup};

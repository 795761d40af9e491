//! Persistent output artifacts.
//!
//! Two files under the articles directory carry state out of a run:
//!
//! - [`snapshot`]: `raw-articles.json`, the full-overwrite handoff to the
//!   content-generation step; one run's merged candidate records
//! - [`index`]: `index.json`, the cross-run accumulation of generated
//!   article metadata, capped at the 100 newest entries
//!
//! The snapshot is replaced wholesale every run; only the index carries
//! history, and it is always read-modify-written as one unit.

pub mod index;
pub mod snapshot;

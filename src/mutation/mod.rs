//! Mutation subsystem for csvstore
//!
//! Insert, update and delete. Update and delete never leave a partially
//! modified table visible to this engine: the complete new content is
//! encoded in memory and written with one call. Zero matches leave the
//! file untouched.

mod autofill;
mod engine;

pub use autofill::{
    fill_insert_defaults, touch_updated_at, Stamp, CREATED_AT_COLUMN, ID_COLUMN,
    UPDATED_AT_COLUMN,
};
pub use engine::{apply_update, partition_matches, MutationEngine};

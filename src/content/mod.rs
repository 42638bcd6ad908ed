//! Content rows: the per-video input of a batch.

pub(crate) mod row;
pub(crate) mod table;

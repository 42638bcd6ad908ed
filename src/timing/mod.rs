//! Text-to-time allocation: turns content text into timestamped caption units.

pub(crate) mod allocator;
pub(crate) mod schedule;

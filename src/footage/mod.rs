//! Background footage: clip selection, aspect fitting and duration normalization.

pub(crate) mod fit;
pub(crate) mod normalize;
pub(crate) mod probe;
pub(crate) mod selector;

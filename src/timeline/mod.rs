pub(crate) mod builder;
pub(crate) mod composition;
pub(crate) mod layer;

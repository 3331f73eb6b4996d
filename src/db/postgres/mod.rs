pub(crate) mod catalog;
pub(crate) mod observations;

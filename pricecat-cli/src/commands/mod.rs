pub(crate) mod config;
pub(crate) mod enrich;
pub(crate) mod scan;
pub(crate) mod status;
pub(crate) mod validate;

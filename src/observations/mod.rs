pub mod data_loader;
pub mod error;
pub(crate) mod response;

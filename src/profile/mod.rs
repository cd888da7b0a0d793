pub mod builder;
pub mod error;
pub mod indexer;
pub mod partition;
pub mod quantile;
pub mod window;

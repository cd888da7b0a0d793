use crate::observations::error::ObservationError;
use crate::profile::error::ProfileError;
use crate::render::error::RenderError;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadProfileError {
    #[error(transparent)]
    Observation(#[from] ObservationError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}

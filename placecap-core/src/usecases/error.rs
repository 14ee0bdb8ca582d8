use crate::{entities::Capability, repositories};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Insufficient {0} permissions")]
    PermissionDenied(Capability),
    #[error("Failed to request {0} permissions")]
    PermissionRequestFailed(Capability),
    #[error("The device position could not be determined")]
    PositionQueryFailed,
    #[error("The image could not be captured")]
    ImageCaptureFailed,
    #[error("Invalid position")]
    InvalidPosition,
    #[error("The picker has been unmounted")]
    Unmounted,
    #[error("The title is invalid")]
    Title,
    #[error("Missing image")]
    Image,
    #[error("Missing location")]
    Location,
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}

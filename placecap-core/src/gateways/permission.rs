use super::{GatewayFuture, Result};
use crate::entities::PermissionState;

/// Query/request pair of a single platform permission.
pub trait PermissionGateway {
    fn status(&self) -> PermissionState;

    /// Shows the native permission prompt and resolves to whether
    /// the permission has been granted.
    fn request(&self) -> GatewayFuture<'_, Result<bool>>;
}

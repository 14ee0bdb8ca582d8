use super::{GatewayFuture, Result};
use crate::entities::MapPoint;

pub trait PositioningGateway {
    /// Queries the current device position once.
    fn current_position(&self) -> GatewayFuture<'_, Result<MapPoint>>;
}

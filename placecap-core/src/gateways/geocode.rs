use super::{GatewayFuture, Result};
use crate::entities::MapPoint;

pub trait ReverseGeocodingGateway {
    /// Resolves a human-readable address, `None` if nothing was found.
    fn resolve_address(&self, pos: MapPoint) -> GatewayFuture<'_, Result<Option<String>>>;
}

/// Builds the URL of a static map image centered on a position.
pub trait MapPreview {
    fn preview_url(&self, pos: MapPoint) -> String;
}

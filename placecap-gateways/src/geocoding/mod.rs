//! Reverse geocoding via the [`geocoding`](::geocoding) crate.
//!
//! The providers only offer blocking clients, so every lookup runs on
//! the blocking thread pool of the surrounding tokio runtime.

use ::geocoding::{GeocodingError, Point, Reverse};
use placecap_core::{
    entities::MapPoint,
    gateways::{self, GatewayFuture},
};

mod opencage;
mod openstreetmap;

pub use self::{opencage::OpenCage, openstreetmap::OpenStreetMap};

// The geo crates expect (x, y) = (lng, lat).
fn to_point(pos: MapPoint) -> Point<f64> {
    Point::new(pos.lng(), pos.lat())
}

fn normalize_address(address: Option<String>) -> Option<String> {
    address
        .map(|a| a.trim().to_owned())
        .filter(|a| !a.is_empty())
}

fn spawn_reverse_lookup<P, F>(
    provider_name: &'static str,
    pos: MapPoint,
    new_provider: F,
) -> GatewayFuture<'static, gateways::Result<Option<String>>>
where
    P: Reverse<f64>,
    F: FnOnce() -> Result<P, GeocodingError> + Send + 'static,
{
    Box::pin(async move {
        let lookup = tokio::task::spawn_blocking(move || {
            let provider = new_provider()?;
            provider.reverse(&to_point(pos))
        });
        match lookup.await {
            Ok(Ok(address)) => {
                let address = normalize_address(address);
                log::debug!("Resolved address of {pos} via {provider_name}: {address:?}");
                Ok(address)
            }
            Ok(Err(err)) => Err(gateways::Error::Geocoding(format!(
                "{provider_name}: {err}"
            ))),
            Err(err) => Err(gateways::Error::Other(err.into())),
        }
    })
}

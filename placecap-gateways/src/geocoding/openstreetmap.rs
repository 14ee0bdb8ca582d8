use ::geocoding::Openstreetmap;
use placecap_core::{
    entities::MapPoint,
    gateways::{self, geocode::ReverseGeocodingGateway, GatewayFuture},
};

use super::spawn_reverse_lookup;

/// Reverse geocoding with the public OpenStreetMap Nominatim service.
#[derive(Debug, Clone, Default)]
pub struct OpenStreetMap {
    endpoint: Option<String>,
}

impl OpenStreetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a self-hosted Nominatim instance.
    pub fn with_endpoint(endpoint: String) -> Self {
        Self {
            endpoint: Some(endpoint),
        }
    }
}

impl ReverseGeocodingGateway for OpenStreetMap {
    fn resolve_address(&self, pos: MapPoint) -> GatewayFuture<'_, gateways::Result<Option<String>>> {
        let endpoint = self.endpoint.clone();
        spawn_reverse_lookup("OpenStreetMap", pos, move || {
            Ok(match endpoint {
                Some(endpoint) => Openstreetmap::new_with_endpoint(endpoint),
                None => Openstreetmap::new(),
            })
        })
    }
}

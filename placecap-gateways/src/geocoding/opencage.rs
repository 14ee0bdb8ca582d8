use ::geocoding::Opencage;
use placecap_core::{
    entities::MapPoint,
    gateways::{self, geocode::ReverseGeocodingGateway, GatewayFuture},
};

use super::spawn_reverse_lookup;

/// Reverse geocoding with the [OpenCage](https://opencagedata.com) API.
#[derive(Debug, Clone)]
pub struct OpenCage {
    api_key: String,
}

impl OpenCage {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

impl ReverseGeocodingGateway for OpenCage {
    fn resolve_address(&self, pos: MapPoint) -> GatewayFuture<'_, gateways::Result<Option<String>>> {
        let api_key = self.api_key.clone();
        spawn_reverse_lookup("OpenCage", pos, move || Ok(Opencage::new(api_key)))
    }
}

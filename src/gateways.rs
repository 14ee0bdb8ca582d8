use std::rc::Rc;

use placecap_core::{
    entities::MapPoint,
    gateways::{
        self,
        geocode::{MapPreview, ReverseGeocodingGateway},
        GatewayFuture,
    },
};
use placecap_gateways::{
    geocoding::{OpenCage, OpenStreetMap},
    map_preview::StaticMapPreview,
};

use crate::config;

pub fn reverse_geocoding_gateway(cfg: &config::Geocoding) -> Rc<dyn ReverseGeocodingGateway> {
    match &cfg.gateway {
        Some(config::GeocodingGateway::OpenCage { api_key }) => {
            log::info!("Use OpenCage geocoding gateway");
            Rc::new(OpenCage::new(api_key.clone()))
        }
        Some(config::GeocodingGateway::OpenStreetMap { endpoint }) => {
            log::info!("Use OpenStreetMap geocoding gateway");
            match endpoint {
                Some(endpoint) => Rc::new(OpenStreetMap::with_endpoint(endpoint.clone())),
                None => Rc::new(OpenStreetMap::new()),
            }
        }
        None => {
            log::warn!("No geocoding gateway was configured");
            Rc::new(DummyGeocodingGw)
        }
    }
}

pub fn map_preview(cfg: &config::MapPreview) -> Rc<dyn MapPreview> {
    let config::MapPreview {
        base_url,
        api_key,
        zoom,
        width,
        height,
    } = cfg;
    Rc::new(StaticMapPreview {
        base_url: base_url.clone(),
        api_key: api_key.clone(),
        zoom: *zoom,
        width: *width,
        height: *height,
    })
}

struct DummyGeocodingGw;

impl ReverseGeocodingGateway for DummyGeocodingGw {
    fn resolve_address(&self, pos: MapPoint) -> GatewayFuture<'_, gateways::Result<Option<String>>> {
        log::debug!("Cannot resolve the address of {pos}: no geocoding gateway");
        Box::pin(async { Ok(None) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn unconfigured_geocoding_resolves_nothing() {
        let gw = reverse_geocoding_gateway(&config::Geocoding { gateway: None });
        let pos = MapPoint::from_lat_lng_deg(52.52, 13.405);
        assert_eq!(None, block_on(gw.resolve_address(pos)).unwrap());
    }

    #[test]
    fn map_preview_from_config() {
        let cfg = config::MapPreview {
            base_url: "https://tiles.example/static".parse().unwrap(),
            api_key: None,
            zoom: 10,
            width: 300,
            height: 150,
        };
        let url = map_preview(&cfg).preview_url(MapPoint::from_lat_lng_deg(1.5, 2.5));
        assert!(url.starts_with("https://tiles.example/static?"));
        assert!(url.contains("zoom=10"));
        assert!(url.contains("size=300x150"));
    }
}

use placecap_core::{entities::MapPoint, gateways::geocode::MapPreview};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Static map images with a single marker at the picked position.
#[derive(Debug, Clone)]
pub struct StaticMapPreview {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
}

impl StaticMapPreview {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            zoom: 14,
            width: 400,
            height: 200,
        }
    }
}

impl Default for StaticMapPreview {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_BASE_URL).expect("Default map preview URL"))
    }
}

impl MapPreview for StaticMapPreview {
    fn preview_url(&self, pos: MapPoint) -> String {
        let center = format!("{},{}", pos.lat(), pos.lng());
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("center", &center)
                .append_pair("zoom", &self.zoom.to_string())
                .append_pair("size", &format!("{}x{}", self.width, self.height))
                .append_pair("maptype", "roadmap")
                .append_pair("markers", &format!("color:red|label:S|{center}"));
            if let Some(key) = &self.api_key {
                query.append_pair("key", key);
            }
        }
        url.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_url_with_key() {
        let preview = StaticMapPreview {
            api_key: Some("secret".into()),
            ..Default::default()
        };
        let url = preview.preview_url(MapPoint::from_lat_lng_deg(48.858, 2.294));
        assert_eq!(
            "https://maps.googleapis.com/maps/api/staticmap?center=48.858%2C2.294&zoom=14&size=400x200&maptype=roadmap&markers=color%3Ared%7Clabel%3AS%7C48.858%2C2.294&key=secret",
            url
        );
    }

    #[test]
    fn preview_url_keeps_existing_query() {
        let preview = StaticMapPreview {
            zoom: 10,
            width: 600,
            height: 300,
            ..StaticMapPreview::new(Url::parse("https://tiles.example/static?style=light").unwrap())
        };
        let url = Url::parse(&preview.preview_url(MapPoint::from_lat_lng_deg(1.5, -2.5))).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(("style".into(), "light".into()), pairs[0]);
        assert!(pairs.contains(&("center".into(), "1.5,-2.5".into())));
        assert!(pairs.contains(&("size".into(), "600x300".into())));
        assert!(pairs.contains(&("zoom".into(), "10".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "key"));
    }
}

use anyhow::{anyhow, Result};
use placecap_core::entities::PermissionState;
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use url::Url;

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "placecap.toml";

const ENV_NAME_OPENCAGE_API_KEY: &str = "OPENCAGE_API_KEY";
const ENV_NAME_STORE_DIR: &str = "PLACECAP_STORE_DIR";

pub struct Config {
    pub geocoding: Geocoding,
    pub map_preview: MapPreview,
    pub store: Store,
    pub permissions: Permissions,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::debug!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let mut raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::debug!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        if let Ok(api_key) = env::var(ENV_NAME_OPENCAGE_API_KEY) {
            let mut gateway = raw_config.gateway.unwrap_or_default();
            gateway.opencage = Some(raw::OpenCage {
                api_key: Some(api_key),
            });
            raw_config.gateway = Some(gateway);
        }
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(dir) = env::var(ENV_NAME_STORE_DIR) {
            cfg.store.dir = dir.into();
        }
        Ok(cfg)
    }
}

pub struct Geocoding {
    pub gateway: Option<GeocodingGateway>,
}

pub enum GeocodingGateway {
    OpenCage { api_key: String },
    OpenStreetMap { endpoint: Option<String> },
}

pub struct MapPreview {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
}

pub struct Store {
    /// File system directory of the JSON place files.
    pub dir: PathBuf,
}

pub struct Permissions {
    pub location: PermissionState,
    pub camera: PermissionState,
}

fn parse_permission_state(name: &str, state: &str) -> Result<PermissionState> {
    state
        .parse()
        .map_err(|_| anyhow!("Invalid {name} permission state '{state}'"))
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            geocoding,
            gateway,
            map_preview,
            store,
            permissions,
        } = from;

        let geo_gateway = match geocoding.and_then(|g| g.gateway) {
            Some(gw_name) => {
                let gateway = gateway.unwrap_or_default();
                let gw = match gw_name {
                    raw::GeocodingGateway::Opencage => {
                        let api_key = gateway
                            .opencage
                            .and_then(|oc| oc.api_key)
                            .ok_or_else(|| anyhow!("Missing 'opencage' gateway configuration"))?;
                        GeocodingGateway::OpenCage { api_key }
                    }
                    raw::GeocodingGateway::Openstreetmap => {
                        let raw::OpenStreetMap { endpoint } =
                            gateway.openstreetmap.unwrap_or_default();
                        GeocodingGateway::OpenStreetMap { endpoint }
                    }
                };
                Some(gw)
            }
            None => None,
        };
        let geocoding = Geocoding {
            gateway: geo_gateway,
        };

        let raw::MapPreview {
            base_url,
            api_key,
            zoom,
            width,
            height,
        } = map_preview.unwrap_or_default();
        if width == 0 || height == 0 {
            return Err(anyhow!("Invalid map preview size {width}x{height}"));
        }
        let map_preview = MapPreview {
            base_url: base_url.parse()?,
            api_key,
            zoom,
            width,
            height,
        };

        let raw::Store { dir } = store.unwrap_or_default();
        let store = Store { dir };

        let raw::Permissions { location, camera } = permissions.unwrap_or_default();
        let permissions = Permissions {
            location: parse_permission_state("location", &location)?,
            camera: parse_permission_state("camera", &camera)?,
        };

        Ok(Self {
            geocoding,
            map_preview,
            store,
            permissions,
        })
    }
}

use jfs::Store;
use placecap_core::{
    entities::{Id, MapPoint, Place},
    repositories::{Error as RepoError, PlaceRepo},
};
use serde::{Deserialize, Serialize};
use std::{
    io::{self, ErrorKind},
    path::Path,
};

/// Places stored as one JSON file per place.
pub struct JsonPlaceStore {
    json_store: Store,
}

impl JsonPlaceStore {
    pub fn try_new<P: AsRef<Path>>(directory: P) -> io::Result<Self> {
        let json_store = Store::new(directory)?;
        Ok(Self { json_store })
    }
    pub fn path(&self) -> &Path {
        self.json_store.path()
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct JsonPlace {
    title: String,
    image_uri: String,
    address: String,
    location: JsonLocation,
}

#[derive(Debug, Deserialize, Serialize)]
struct JsonLocation {
    lat: f64,
    lng: f64,
}

impl From<&Place> for JsonPlace {
    fn from(from: &Place) -> Self {
        let Place {
            id: _,
            title,
            image_uri,
            address,
            location,
        } = from;
        Self {
            title: title.clone(),
            image_uri: image_uri.clone(),
            address: address.clone(),
            location: JsonLocation {
                lat: location.lat(),
                lng: location.lng(),
            },
        }
    }
}

impl JsonPlace {
    fn into_place(self, id: &str) -> Place {
        let Self {
            title,
            image_uri,
            address,
            location: JsonLocation { lat, lng },
        } = self;
        Place {
            id: id.into(),
            title,
            image_uri,
            address,
            location: MapPoint::from_lat_lng_deg(lat, lng),
        }
    }
}

fn repo_error(err: io::Error) -> RepoError {
    if err.kind() == ErrorKind::NotFound {
        RepoError::NotFound
    } else {
        RepoError::Io(err)
    }
}

// Ids become file names.
fn valid_id(id: &str) -> Result<&str, RepoError> {
    if Id::from(id).is_valid() {
        Ok(id)
    } else {
        Err(RepoError::InvalidId(id.to_owned()))
    }
}

impl PlaceRepo for JsonPlaceStore {
    fn create_place(&self, place: Place) -> Result<(), RepoError> {
        let id = valid_id(place.id.as_str())?;
        match self.json_store.get::<JsonPlace>(id) {
            Ok(_) => return Err(RepoError::AlreadyExists),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(RepoError::Io(err)),
        }
        self.json_store
            .save_with_id(&JsonPlace::from(&place), id)
            .map_err(repo_error)?;
        log::debug!("Saved place {id} in {}", self.path().display());
        Ok(())
    }

    fn get_place(&self, id: &str) -> Result<Place, RepoError> {
        let id = valid_id(id)?;
        let place = self.json_store.get::<JsonPlace>(id).map_err(repo_error)?;
        Ok(place.into_place(id))
    }

    fn all_places(&self) -> Result<Vec<Place>, RepoError> {
        let places = self
            .json_store
            .all::<JsonPlace>()
            .map_err(repo_error)?
            .into_iter()
            .map(|(id, place)| place.into_place(&id))
            .collect();
        Ok(places)
    }
}

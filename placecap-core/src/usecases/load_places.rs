use super::prelude::*;
use crate::gateways::navigation::MapNavigator;

pub fn load_place<R: PlaceRepo>(repo: &R, id: &str) -> Result<Place> {
    Ok(repo.get_place(id)?)
}

pub fn load_places<R: PlaceRepo>(repo: &R) -> Result<Vec<Place>> {
    let mut places = repo.all_places()?;
    places.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(places)
}

/// Shows a stored place on the map without allowing to pick another position.
pub fn show_on_map(navigator: &dyn MapNavigator, place: &Place) {
    navigator.open_map(MapParams {
        initial: Some(place.location),
        read_only: true,
    });
}

use super::prelude::*;

/// Input of the place form.
#[derive(Debug, Clone, Default)]
pub struct NewPlace {
    pub title: String,
    pub image_uri: Option<String>,
    pub location: Option<PickedLocation>,
}

pub fn create_new_place<R>(repo: &R, new_place: NewPlace) -> Result<Place>
where
    R: PlaceRepo,
{
    let NewPlace {
        title,
        image_uri,
        location,
    } = new_place;
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::Title);
    }
    let image_uri = image_uri
        .filter(|uri| !uri.trim().is_empty())
        .ok_or(Error::Image)?;
    let PickedLocation { pos, address } = location.ok_or(Error::Location)?;
    if !pos.is_valid() {
        return Err(Error::InvalidPosition);
    }
    if address.is_none() {
        log::info!("Creating place '{title}' without a resolved address");
    }
    let place = Place {
        id: Id::new(),
        title: title.to_owned(),
        image_uri,
        address: address.unwrap_or_default(),
        location: pos,
    };
    repo.create_place(place.clone())?;
    log::info!("Created place {}", place.id);
    Ok(place)
}

use crate::{geo::*, id::*};

/// A captured place as it is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: Id,
    pub title: String,
    pub image_uri: String,
    pub address: String,
    pub location: MapPoint,
}

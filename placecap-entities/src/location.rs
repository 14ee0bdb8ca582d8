use crate::geo::*;

/// A coordinate picked by the user plus its (possibly pending) address.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedLocation {
    pub pos: MapPoint,
    pub address: Option<String>,
}

impl PickedLocation {
    pub const fn new(pos: MapPoint) -> Self {
        Self { pos, address: None }
    }

    pub fn with_address(pos: MapPoint, address: impl Into<String>) -> Self {
        Self {
            pos,
            address: Some(address.into()),
        }
    }

    pub const fn lat(&self) -> f64 {
        self.pos.lat()
    }

    pub const fn lng(&self) -> f64 {
        self.pos.lng()
    }

    pub fn is_resolved(&self) -> bool {
        self.address.is_some()
    }
}

impl From<MapPoint> for PickedLocation {
    fn from(pos: MapPoint) -> Self {
        Self::new(pos)
    }
}

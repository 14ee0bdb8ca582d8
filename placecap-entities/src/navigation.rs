//! Parameters exchanged with the map-selection screen.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::geo::*;

static LAST_RETURN_EVENT_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a single return from the map-selection screen.
///
/// Every return gets a fresh id, so a consumer can tell a new pick
/// apart from the same parameters observed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReturnEventId(u64);

impl ReturnEventId {
    pub fn next() -> Self {
        Self(LAST_RETURN_EVENT_ID.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub const fn to_u64(self) -> u64 {
        self.0
    }
}

/// Parameters for opening the map-selection screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MapParams {
    pub initial: Option<MapPoint>,
    /// Only show the location, picking is disabled.
    pub read_only: bool,
}

/// Return payload of the map-selection screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapReturnParams {
    pub event: ReturnEventId,
    pub picked: MapPoint,
}

impl MapReturnParams {
    pub fn new(picked: MapPoint) -> Self {
        Self {
            event: ReturnEventId::next(),
            picked,
        }
    }
}

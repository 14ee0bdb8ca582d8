use crate::entities::MapParams;

/// Navigation to the map-selection screen.
///
/// The map screen does not return a value. Once the user confirmed a
/// position the host hands a `MapReturnParams` to the screen that
/// regains focus.
pub trait MapNavigator {
    fn open_map(&self, params: MapParams);
}

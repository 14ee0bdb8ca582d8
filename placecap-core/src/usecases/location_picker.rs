//! Location picking.
//!
//! Two producers feed a single current pick: a one-shot query of the device
//! position and a round trip to the map-selection screen. Whatever pick is
//! current gets reverse geocoded and handed to the owning form. A pick is
//! identified by a [`PickSeq`]; an address lookup only reaches the form if
//! its pick is still current when the lookup completes.

use std::{cell::RefCell, fmt, rc::Rc};

use futures::task::{LocalSpawn, LocalSpawnExt};

use super::{prelude::*, PermissionGate};
use crate::gateways::{
    alert::AlertGateway,
    geocode::{MapPreview, ReverseGeocodingGateway},
    navigation::MapNavigator,
    permission::PermissionGateway,
    position::PositioningGateway,
};

const POSITION_UNAVAILABLE_TITLE: &str = "Location unavailable";
const POSITION_UNAVAILABLE_MESSAGE: &str =
    "Your current location could not be determined. Please try again.";

/// Callback of the owning form.
pub type PickLocationHandler = Rc<dyn Fn(PickedLocation)>;

/// Version of a pick, increasing with every accepted coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PickSeq(u64);

impl fmt::Display for PickSeq {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickSource {
    Device,
    Map,
}

impl fmt::Display for PickSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Device => f.write_str("device"),
            Self::Map => f.write_str("map"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Empty,
    Map(String),
}

impl Preview {
    pub const EMPTY_TEXT: &'static str = "No location picked yet.";
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Empty => f.write_str(Self::EMPTY_TEXT),
            Self::Map(url) => f.write_str(url),
        }
    }
}

/// Platform services a [`LocationPicker`] is wired to.
#[derive(Clone)]
pub struct LocationServices {
    pub permissions: Rc<dyn PermissionGateway>,
    pub alerts: Rc<dyn AlertGateway>,
    pub positioning: Rc<dyn PositioningGateway>,
    pub geocoding: Rc<dyn ReverseGeocodingGateway>,
    pub navigator: Rc<dyn MapNavigator>,
    pub map_preview: Rc<dyn MapPreview>,
    /// Runs the address lookups on the event loop.
    pub spawner: Rc<dyn LocalSpawn>,
}

struct CurrentPick {
    seq: PickSeq,
    location: PickedLocation,
}

#[derive(Default)]
struct PickerState {
    current: Option<CurrentPick>,
    last_seq: u64,
    consumed_map_return: Option<ReturnEventId>,
    unmounted: bool,
}

pub struct LocationPicker {
    gate: PermissionGate,
    services: LocationServices,
    state: Rc<RefCell<PickerState>>,
    on_pick: PickLocationHandler,
}

impl LocationPicker {
    pub fn new<F>(services: LocationServices, on_pick: F) -> Self
    where
        F: Fn(PickedLocation) + 'static,
    {
        let gate = PermissionGate::new(
            Capability::Location,
            Rc::clone(&services.permissions),
            Rc::clone(&services.alerts),
        );
        Self {
            gate,
            services,
            state: Default::default(),
            on_pick: Rc::new(on_pick),
        }
    }

    pub fn current(&self) -> Option<PickedLocation> {
        self.state
            .borrow()
            .current
            .as_ref()
            .map(|pick| pick.location.clone())
    }

    pub fn current_seq(&self) -> Option<PickSeq> {
        self.state.borrow().current.as_ref().map(|pick| pick.seq)
    }

    pub fn preview(&self) -> Preview {
        match self.current() {
            Some(location) => Preview::Map(self.services.map_preview.preview_url(location.pos)),
            None => Preview::Empty,
        }
    }

    pub fn is_mounted(&self) -> bool {
        !self.state.borrow().unmounted
    }

    /// Picks the current device position.
    ///
    /// Permission and positioning failures have already been reported
    /// to the user when this returns an error.
    pub async fn locate_user(&self) -> Result<PickSeq> {
        self.gate.check().await?;
        let pos = match self.services.positioning.current_position().await {
            Ok(pos) => pos,
            Err(err) => {
                log::warn!("Failed to query the device position: {err}");
                if self.is_mounted() {
                    self.services
                        .alerts
                        .alert(POSITION_UNAVAILABLE_TITLE, POSITION_UNAVAILABLE_MESSAGE);
                }
                return Err(Error::PositionQueryFailed);
            }
        };
        self.accept(pos, PickSource::Device)
    }

    /// Opens the map-selection screen.
    ///
    /// The picked coordinate arrives later through [`LocationPicker::on_screen_focus`].
    pub fn pick_on_map(&self) {
        let params = MapParams {
            initial: self.current().map(|location| location.pos),
            read_only: false,
        };
        self.services.navigator.open_map(params);
    }

    /// Must be called whenever the hosting screen is rendered or regains focus.
    ///
    /// Return parameters of the map screen are consumed once. Observing the
    /// same (or an older) return event again has no effect.
    pub fn on_screen_focus(
        &self,
        focused: bool,
        params: Option<&MapReturnParams>,
    ) -> Option<PickSeq> {
        if !focused {
            return None;
        }
        let params = params?;
        {
            let mut state = self.state.borrow_mut();
            if state.unmounted {
                return None;
            }
            if let Some(consumed) = state.consumed_map_return {
                if params.event <= consumed {
                    log::trace!(
                        "Map return {} has already been consumed",
                        params.event.to_u64()
                    );
                    return None;
                }
            }
            state.consumed_map_return = Some(params.event);
        }
        self.accept(params.picked, PickSource::Map).ok()
    }

    /// Stops all further effects of pending lookups.
    pub fn unmount(&self) {
        let mut state = self.state.borrow_mut();
        if !state.unmounted {
            state.unmounted = true;
            state.current = None;
        }
    }

    fn accept(&self, pos: MapPoint, source: PickSource) -> Result<PickSeq> {
        if !pos.is_valid() {
            log::warn!("Ignoring invalid {source} position {pos}");
            return Err(Error::InvalidPosition);
        }
        let seq = {
            let mut state = self.state.borrow_mut();
            if state.unmounted {
                log::debug!("Ignoring {source} position {pos} of an unmounted picker");
                return Err(Error::Unmounted);
            }
            state.last_seq += 1;
            let seq = PickSeq(state.last_seq);
            let previous = state.current.replace(CurrentPick {
                seq,
                location: PickedLocation::new(pos),
            });
            if let Some(previous) = previous {
                log::debug!("Pick {seq} supersedes pick {}", previous.seq);
            }
            seq
        };
        log::debug!("Picked {source} position {pos} as {seq}");
        self.resolve_address(seq, pos);
        Ok(seq)
    }

    fn resolve_address(&self, seq: PickSeq, pos: MapPoint) {
        let geocoding = Rc::clone(&self.services.geocoding);
        let state = Rc::clone(&self.state);
        let on_pick = Rc::clone(&self.on_pick);
        let lookup = async move {
            let address = match geocoding.resolve_address(pos).await {
                Ok(Some(address)) => Some(address),
                Ok(None) => {
                    log::warn!("No address found for {pos}");
                    None
                }
                Err(err) => {
                    log::warn!("Failed to resolve the address of {pos}: {err}");
                    None
                }
            };
            deliver(&state, &*on_pick, seq, address);
        };
        if let Err(err) = self.services.spawner.spawn_local(lookup) {
            log::error!("Unable to resolve the address of pick {seq}: {err}");
            deliver(&self.state, &*self.on_pick, seq, None);
        }
    }
}

impl Drop for LocationPicker {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn deliver(
    state: &RefCell<PickerState>,
    on_pick: &dyn Fn(PickedLocation),
    seq: PickSeq,
    address: Option<String>,
) {
    let location = {
        let mut state = state.borrow_mut();
        if state.unmounted {
            log::debug!("Discarding the address of pick {seq}: picker unmounted");
            return;
        }
        match state.current.as_mut() {
            Some(current) if current.seq == seq => {
                current.location.address = address;
                current.location.clone()
            }
            _ => {
                log::debug!("Discarding the stale address of pick {seq}");
                return;
            }
        }
    };
    on_pick(location);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gateways, usecases::tests::*};
    use futures::{executor::LocalPool, task::noop_waker};
    use std::{future::Future, task::Context};

    const BERLIN: MapPoint = MapPoint::from_lat_lng_deg(52.52, 13.405);
    const PARIS: MapPoint = MapPoint::from_lat_lng_deg(48.858, 2.294);
    const ROME: MapPoint = MapPoint::from_lat_lng_deg(41.89, 12.492);

    struct Fixture {
        pool: LocalPool,
        permissions: Rc<FakePermissions>,
        alerts: Rc<RecordingAlerts>,
        positioning: Rc<FakePositioning>,
        geocoder: Rc<ControlledGeocoder>,
        navigator: Rc<RecordingNavigator>,
        picked: Rc<RefCell<Vec<PickedLocation>>>,
    }

    impl Fixture {
        fn new(permission: PermissionState, positioning: FakePositioning) -> Self {
            init_logging();
            Self {
                pool: LocalPool::new(),
                permissions: Rc::new(FakePermissions::new(permission)),
                alerts: Rc::new(RecordingAlerts::default()),
                positioning: Rc::new(positioning),
                geocoder: Rc::new(ControlledGeocoder::default()),
                navigator: Rc::new(RecordingNavigator::default()),
                picked: Default::default(),
            }
        }

        fn services(&self) -> LocationServices {
            LocationServices {
                permissions: self.permissions.clone(),
                alerts: self.alerts.clone(),
                positioning: self.positioning.clone(),
                geocoding: self.geocoder.clone(),
                navigator: self.navigator.clone(),
                map_preview: Rc::new(FakeMapPreview),
                spawner: Rc::new(self.pool.spawner()),
            }
        }

        fn picker(&self) -> LocationPicker {
            self.picker_with(self.services())
        }

        fn picker_with(&self, services: LocationServices) -> LocationPicker {
            let picked = Rc::clone(&self.picked);
            LocationPicker::new(services, move |location| {
                picked.borrow_mut().push(location)
            })
        }

        /// Lookups only start once the pool polls the spawned tasks.
        fn pending_lookups(&mut self) -> usize {
            self.pool.run_until_stalled();
            self.geocoder.pending_count()
        }

        fn complete(&mut self, pos: MapPoint, result: gateways::Result<Option<String>>) {
            self.pool.run_until_stalled();
            self.geocoder.complete(pos, result);
        }

        fn resolve(&mut self, pos: MapPoint, address: &str) {
            self.pool.run_until_stalled();
            self.geocoder.resolve(pos, address);
        }

        fn picked(&self) -> Vec<PickedLocation> {
            self.picked.borrow().clone()
        }
    }

    #[test]
    fn locate_user_after_granting_permission() {
        let mut fx = Fixture::new(PermissionState::Undetermined, FakePositioning::at(BERLIN));
        let picker = fx.picker();

        let seq = fx.pool.run_until(picker.locate_user()).unwrap();
        assert_eq!(Some(seq), picker.current_seq());
        assert_eq!(1, fx.permissions.request_count());
        assert_eq!(1, fx.positioning.query_count());
        assert!(fx.picked().is_empty());

        fx.resolve(BERLIN, "Berlin, Germany");
        fx.pool.run_until_stalled();
        fx.pool.run_until_stalled();

        let expected = PickedLocation::with_address(BERLIN, "Berlin, Germany");
        assert_eq!(vec![expected.clone()], fx.picked());
        assert_eq!(52.52, fx.picked()[0].lat());
        assert_eq!(13.405, fx.picked()[0].lng());
        assert_eq!(Some(expected), picker.current());
        assert_eq!(1, fx.geocoder.lookup_count());
    }

    #[test]
    fn locate_user_without_permission() {
        let mut fx = Fixture::new(PermissionState::Denied, FakePositioning::at(BERLIN));
        let picker = fx.picker();

        let res = fx.pool.run_until(picker.locate_user());
        assert!(matches!(res, Err(Error::PermissionDenied(Capability::Location))));
        assert_eq!(1, fx.alerts.len());
        assert_eq!(0, fx.positioning.query_count());
        assert_eq!(None, picker.current());
        fx.pool.run_until_stalled();
        assert_eq!(0, fx.geocoder.lookup_count());
        assert!(fx.picked().is_empty());
    }

    #[test]
    fn locate_user_when_the_user_declines() {
        let mut fx = Fixture::new(PermissionState::Undetermined, FakePositioning::at(BERLIN));
        fx.permissions = Rc::new(
            FakePermissions::new(PermissionState::Undetermined).answer_requests_with(Ok(false)),
        );
        let picker = fx.picker();

        assert!(fx.pool.run_until(picker.locate_user()).is_err());
        assert_eq!(0, fx.positioning.query_count());
        assert!(fx.alerts.is_empty());
    }

    #[test]
    fn failed_position_query_keeps_the_current_pick() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::unavailable());
        let picker = fx.picker();

        let params = MapReturnParams::new(PARIS);
        assert!(picker.on_screen_focus(true, Some(&params)).is_some());
        fx.resolve(PARIS, "Paris, France");
        fx.pool.run_until_stalled();
        assert_eq!(1, fx.picked().len());

        let res = fx.pool.run_until(picker.locate_user());
        assert!(matches!(res, Err(Error::PositionQueryFailed)));
        fx.pool.run_until_stalled();

        assert_eq!(
            Some(PickedLocation::with_address(PARIS, "Paris, France")),
            picker.current()
        );
        assert_eq!(1, fx.picked().len());
        assert_eq!(1, fx.geocoder.lookup_count());
        assert_eq!(
            Some((
                POSITION_UNAVAILABLE_TITLE.to_owned(),
                POSITION_UNAVAILABLE_MESSAGE.to_owned()
            )),
            fx.alerts.last()
        );
    }

    #[test]
    fn failed_position_query_without_previous_pick() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::unavailable());
        let picker = fx.picker();
        assert!(fx.pool.run_until(picker.locate_user()).is_err());
        fx.pool.run_until_stalled();
        assert_eq!(None, picker.current());
        assert!(fx.picked().is_empty());
        assert_eq!(0, fx.geocoder.lookup_count());
    }

    #[test]
    fn pick_on_map_and_rerender() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::unavailable());
        let picker = fx.picker();

        picker.pick_on_map();
        assert_eq!(vec![MapParams::default()], fx.navigator.opened());

        // The screen renders before the map returns.
        assert_eq!(None, picker.on_screen_focus(true, None));

        let params = MapReturnParams::new(PARIS);
        assert!(picker.on_screen_focus(true, Some(&params)).is_some());
        fx.resolve(PARIS, "Paris, France");
        fx.pool.run_until_stalled();
        assert_eq!(
            vec![PickedLocation::with_address(PARIS, "Paris, France")],
            fx.picked()
        );

        // Unrelated re-renders and focus changes carry the same params.
        assert_eq!(None, picker.on_screen_focus(true, Some(&params)));
        assert_eq!(None, picker.on_screen_focus(false, Some(&params)));
        assert_eq!(None, picker.on_screen_focus(true, Some(&params)));
        fx.pool.run_until_stalled();

        assert_eq!(1, fx.picked().len());
        assert_eq!(1, fx.geocoder.lookup_count());
        assert_eq!(0, fx.pending_lookups());
    }

    #[test]
    fn map_return_is_only_consumed_while_focused() {
        let fx = Fixture::new(PermissionState::Granted, FakePositioning::unavailable());
        let picker = fx.picker();
        let params = MapReturnParams::new(PARIS);
        assert_eq!(None, picker.on_screen_focus(false, Some(&params)));
        assert_eq!(None, picker.current());
        assert!(picker.on_screen_focus(true, Some(&params)).is_some());
        assert_eq!(Some(PickedLocation::new(PARIS)), picker.current());
    }

    #[test]
    fn older_map_return_is_ignored() {
        let fx = Fixture::new(PermissionState::Granted, FakePositioning::unavailable());
        let picker = fx.picker();
        let older = MapReturnParams::new(ROME);
        let newer = MapReturnParams::new(PARIS);
        assert!(picker.on_screen_focus(true, Some(&newer)).is_some());
        assert_eq!(None, picker.on_screen_focus(true, Some(&older)));
        assert_eq!(PARIS, picker.current().unwrap().pos);
    }

    #[test]
    fn picking_the_same_spot_on_the_map_twice() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::unavailable());
        let picker = fx.picker();

        let first = MapReturnParams::new(PARIS);
        let second = MapReturnParams::new(PARIS);
        let first_seq = picker.on_screen_focus(true, Some(&first)).unwrap();
        let second_seq = picker.on_screen_focus(true, Some(&second)).unwrap();
        assert!(second_seq > first_seq);

        fx.resolve(PARIS, "Paris, France");
        fx.resolve(PARIS, "Paris, France");
        fx.pool.run_until_stalled();
        assert_eq!(1, fx.picked().len());
    }

    #[test]
    fn latest_pick_wins_when_the_older_lookup_completes_last() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::at(BERLIN));
        let picker = fx.picker();

        fx.pool.run_until(picker.locate_user()).unwrap();
        let params = MapReturnParams::new(PARIS);
        let latest = picker.on_screen_focus(true, Some(&params)).unwrap();
        assert_eq!(2, fx.pending_lookups());

        fx.resolve(PARIS, "Paris, France");
        fx.pool.run_until_stalled();
        fx.resolve(BERLIN, "Berlin, Germany");
        fx.pool.run_until_stalled();

        assert_eq!(
            vec![PickedLocation::with_address(PARIS, "Paris, France")],
            fx.picked()
        );
        assert_eq!(Some(latest), picker.current_seq());
        assert_eq!(
            Some(PickedLocation::with_address(PARIS, "Paris, France")),
            picker.current()
        );
    }

    #[test]
    fn latest_pick_wins_when_the_older_lookup_completes_first() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::at(BERLIN));
        let picker = fx.picker();

        let params = MapReturnParams::new(PARIS);
        picker.on_screen_focus(true, Some(&params)).unwrap();
        fx.pool.run_until(picker.locate_user()).unwrap();

        fx.resolve(PARIS, "Paris, France");
        fx.pool.run_until_stalled();
        assert!(fx.picked().is_empty());

        fx.resolve(BERLIN, "Berlin, Germany");
        fx.pool.run_until_stalled();
        assert_eq!(
            vec![PickedLocation::with_address(BERLIN, "Berlin, Germany")],
            fx.picked()
        );
    }

    #[test]
    fn new_pick_discards_the_resolved_address() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::at(BERLIN));
        let picker = fx.picker();

        fx.pool.run_until(picker.locate_user()).unwrap();
        fx.resolve(BERLIN, "Berlin, Germany");
        fx.pool.run_until_stalled();
        assert!(picker.current().unwrap().is_resolved());

        fx.positioning.move_to(ROME);
        fx.pool.run_until(picker.locate_user()).unwrap();
        assert_eq!(Some(PickedLocation::new(ROME)), picker.current());

        fx.resolve(ROME, "Rome, Italy");
        fx.pool.run_until_stalled();
        assert_eq!(2, fx.picked().len());
        assert_eq!(Some("Rome, Italy".to_owned()), fx.picked()[1].address);
    }

    #[test]
    fn failed_lookup_still_delivers_the_coordinate() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::at(BERLIN));
        let picker = fx.picker();

        fx.pool.run_until(picker.locate_user()).unwrap();
        fx.complete(
            BERLIN,
            Err(gateways::Error::Geocoding("service unavailable".into())),
        );
        fx.pool.run_until_stalled();
        assert_eq!(vec![PickedLocation::new(BERLIN)], fx.picked());
    }

    #[test]
    fn unknown_address_still_delivers_the_coordinate() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::unavailable());
        let picker = fx.picker();
        let params = MapReturnParams::new(ROME);
        picker.on_screen_focus(true, Some(&params)).unwrap();
        fx.complete(ROME, Ok(None));
        fx.pool.run_until_stalled();
        assert_eq!(vec![PickedLocation::new(ROME)], fx.picked());
    }

    #[test]
    fn invalid_map_position_is_rejected() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::unavailable());
        let picker = fx.picker();
        let params = MapReturnParams::new(MapPoint::from_lat_lng_deg(95.0, 2.0));
        assert_eq!(None, picker.on_screen_focus(true, Some(&params)));
        fx.pool.run_until_stalled();
        assert_eq!(None, picker.current());
        assert_eq!(0, fx.geocoder.lookup_count());
    }

    #[test]
    fn dropped_picker_does_not_call_back() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::at(BERLIN));
        let picker = fx.picker();
        fx.pool.run_until(picker.locate_user()).unwrap();
        drop(picker);

        fx.resolve(BERLIN, "Berlin, Germany");
        fx.pool.run_until_stalled();
        assert!(fx.picked().is_empty());
    }

    #[test]
    fn unmounted_picker_ignores_new_positions() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::at(BERLIN));
        let picker = fx.picker();
        picker.unmount();
        assert!(!picker.is_mounted());

        let params = MapReturnParams::new(PARIS);
        assert_eq!(None, picker.on_screen_focus(true, Some(&params)));
        assert!(matches!(
            fx.pool.run_until(picker.locate_user()),
            Err(Error::Unmounted)
        ));
        fx.pool.run_until_stalled();
        assert_eq!(0, fx.geocoder.lookup_count());
        assert!(fx.picked().is_empty());
    }

    #[test]
    fn pick_on_map_starts_at_the_current_pick() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::at(BERLIN));
        let picker = fx.picker();
        fx.pool.run_until(picker.locate_user()).unwrap();
        picker.pick_on_map();
        assert_eq!(
            vec![MapParams {
                initial: Some(BERLIN),
                read_only: false,
            }],
            fx.navigator.opened()
        );
    }

    #[test]
    fn preview_of_the_current_pick() {
        let fx = Fixture::new(PermissionState::Granted, FakePositioning::unavailable());
        let picker = fx.picker();
        assert_eq!(Preview::Empty, picker.preview());
        assert_eq!("No location picked yet.", picker.preview().to_string());
        let params = MapReturnParams::new(PARIS);
        picker.on_screen_focus(true, Some(&params));
        assert_eq!(
            Preview::Map("https://maps.example/static?center=48.858,2.294".into()),
            picker.preview()
        );
    }

    #[test]
    fn end_to_end_with_static_geocoder() {
        let mut fx = Fixture::new(PermissionState::Undetermined, FakePositioning::at(BERLIN));
        let picked = Rc::clone(&fx.picked);
        let services = LocationServices {
            permissions: fx.permissions.clone(),
            alerts: fx.alerts.clone(),
            positioning: fx.positioning.clone(),
            geocoding: Rc::new(StaticGeocoder::default().with(BERLIN, "Berlin, Germany")),
            navigator: fx.navigator.clone(),
            map_preview: Rc::new(FakeMapPreview),
            spawner: Rc::new(fx.pool.spawner()),
        };
        let picker = LocationPicker::new(services, move |location| {
            picked.borrow_mut().push(location)
        });
        fx.pool.run_until(picker.locate_user()).unwrap();
        fx.pool.run_until_stalled();
        assert_eq!(
            vec![PickedLocation::with_address(BERLIN, "Berlin, Germany")],
            fx.picked()
        );
    }

    #[test]
    fn unmount_while_querying_the_position() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::unavailable());
        let positioning = Rc::new(ControlledPositioning::default());
        let picker = fx.picker_with(LocationServices {
            positioning: positioning.clone(),
            ..fx.services()
        });

        let mut locate = Box::pin(picker.locate_user());
        let waker = noop_waker();
        assert!(locate
            .as_mut()
            .poll(&mut Context::from_waker(&waker))
            .is_pending());
        assert_eq!(1, positioning.pending_count());

        picker.unmount();
        positioning.complete(Ok(BERLIN));
        let res = fx.pool.run_until(locate);
        assert!(matches!(res, Err(Error::Unmounted)));

        fx.pool.run_until_stalled();
        assert_eq!(None, picker.current());
        assert_eq!(0, fx.geocoder.lookup_count());
        assert!(fx.picked().is_empty());
        assert!(fx.alerts.is_empty());
    }

    #[test]
    fn position_failure_after_unmount_is_not_alerted() {
        let mut fx = Fixture::new(PermissionState::Granted, FakePositioning::unavailable());
        let positioning = Rc::new(ControlledPositioning::default());
        let picker = fx.picker_with(LocationServices {
            positioning: positioning.clone(),
            ..fx.services()
        });

        let mut locate = Box::pin(picker.locate_user());
        let waker = noop_waker();
        assert!(locate
            .as_mut()
            .poll(&mut Context::from_waker(&waker))
            .is_pending());

        picker.unmount();
        positioning.complete(Err(gateways::Error::Position("timeout".into())));
        let res = fx.pool.run_until(locate);
        assert!(matches!(res, Err(Error::PositionQueryFailed)));
        assert!(fx.alerts.is_empty());
    }
}

//! Console stand-ins for the platform services of a mobile device.

use std::{
    cell::{Cell, RefCell},
    io::{self, BufRead, Write},
    path::PathBuf,
};

use futures::{
    future::LocalFutureObj,
    task::{LocalSpawn, SpawnError},
};
use placecap_core::{
    entities::*,
    gateways::{
        self,
        alert::AlertGateway,
        camera::{CameraGateway, CameraOptions},
        navigation::MapNavigator,
        permission::PermissionGateway,
        position::PositioningGateway,
        GatewayFuture,
    },
};

/// Asks for permissions on the terminal.
pub struct ConsolePermissions {
    capability: Capability,
    state: Cell<PermissionState>,
}

impl ConsolePermissions {
    pub fn new(capability: Capability, state: PermissionState) -> Self {
        Self {
            capability,
            state: Cell::new(state),
        }
    }
}

impl PermissionGateway for ConsolePermissions {
    fn status(&self) -> PermissionState {
        self.state.get()
    }

    fn request(&self) -> GatewayFuture<'_, gateways::Result<bool>> {
        let question = format!("Allow access to the {}? [y/N] ", self.capability);
        Box::pin(async move {
            let answer = tokio::task::spawn_blocking(move || prompt(&question))
                .await
                .map_err(|err| gateways::Error::PermissionRequest(err.to_string()))?
                .map_err(|err| gateways::Error::PermissionRequest(err.to_string()))?;
            let granted = matches!(answer.trim(), "y" | "Y" | "yes");
            self.state.set(if granted {
                PermissionState::Granted
            } else {
                PermissionState::Denied
            });
            Ok(granted)
        })
    }
}

fn prompt(question: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    stderr.write_all(question.as_bytes())?;
    stderr.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer)
}

pub struct ConsoleAlerts;

impl AlertGateway for ConsoleAlerts {
    fn alert(&self, title: &str, message: &str) {
        eprintln!("{title}\n{message}");
    }
}

/// Reports a fixed position, if any.
pub struct SimulatedPositioning {
    pos: Option<MapPoint>,
}

impl SimulatedPositioning {
    pub const fn new(pos: Option<MapPoint>) -> Self {
        Self { pos }
    }
}

impl PositioningGateway for SimulatedPositioning {
    fn current_position(&self) -> GatewayFuture<'_, gateways::Result<MapPoint>> {
        let pos = self
            .pos
            .ok_or_else(|| gateways::Error::Position("no position fix".into()));
        Box::pin(async move { pos })
    }
}

/// Map-selection screen where the user always taps the same coordinate.
pub struct ScriptedMapScreen {
    tapped: Option<MapPoint>,
    return_params: RefCell<Option<MapReturnParams>>,
}

impl ScriptedMapScreen {
    pub const fn new(tapped: Option<MapPoint>) -> Self {
        Self {
            tapped,
            return_params: RefCell::new(None),
        }
    }

    /// Parameters the hosting screen receives after the map screen closed.
    pub fn take_return_params(&self) -> Option<MapReturnParams> {
        self.return_params.borrow_mut().take()
    }
}

impl MapNavigator for ScriptedMapScreen {
    fn open_map(&self, params: MapParams) {
        match params.initial {
            Some(pos) => println!("Map centered at {pos}"),
            None => println!("Map opened"),
        }
        if params.read_only {
            return;
        }
        if let Some(tapped) = self.tapped {
            log::debug!("Tapped {tapped} on the map");
            *self.return_params.borrow_mut() = Some(MapReturnParams::new(tapped));
        }
    }
}

/// Takes the image from an existing file.
pub struct FileCamera {
    path: Option<PathBuf>,
}

impl FileCamera {
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl CameraGateway for FileCamera {
    fn launch_camera(
        &self,
        options: CameraOptions,
    ) -> GatewayFuture<'_, gateways::Result<Option<String>>> {
        log::debug!("Launch camera with {options:?}");
        let res = match &self.path {
            None => Ok(None),
            Some(path) => path
                .canonicalize()
                .map(|path| Some(format!("file://{}", path.display())))
                .map_err(|err| gateways::Error::Camera(format!("{}: {err}", path.display()))),
        };
        Box::pin(async move { res })
    }
}

/// Spawns onto the [`tokio::task::LocalSet`] of the current thread.
pub struct LocalSetSpawner;

impl LocalSpawn for LocalSetSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        tokio::task::spawn_local(future);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    const PARIS: MapPoint = MapPoint::from_lat_lng_deg(48.858, 2.294);

    #[test]
    fn scripted_map_screen_returns_the_tapped_position_once() {
        let screen = ScriptedMapScreen::new(Some(PARIS));
        screen.open_map(MapParams::default());
        let params = screen.take_return_params().unwrap();
        assert_eq!(PARIS, params.picked);
        assert!(screen.take_return_params().is_none());
    }

    #[test]
    fn read_only_map_screen_returns_nothing() {
        let screen = ScriptedMapScreen::new(Some(PARIS));
        screen.open_map(MapParams {
            initial: Some(PARIS),
            read_only: true,
        });
        assert!(screen.take_return_params().is_none());
    }

    #[test]
    fn simulated_positioning_without_fix() {
        let positioning = SimulatedPositioning::new(None);
        assert!(block_on(positioning.current_position()).is_err());
        let positioning = SimulatedPositioning::new(Some(PARIS));
        assert_eq!(PARIS, block_on(positioning.current_position()).unwrap());
    }

    #[test]
    fn camera_without_image_is_cancelled() {
        let camera = FileCamera::new(None);
        let res = block_on(camera.launch_camera(CameraOptions::default())).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn camera_with_missing_file() {
        let camera = FileCamera::new(Some("does/not/exist.jpg".into()));
        let res = block_on(camera.launch_camera(CameraOptions::default()));
        assert!(matches!(res, Err(gateways::Error::Camera(_))));
    }

    #[test]
    fn camera_with_existing_file() {
        let camera = FileCamera::new(Some("Cargo.toml".into()));
        let uri = block_on(camera.launch_camera(CameraOptions::default()))
            .unwrap()
            .unwrap();
        assert!(uri.starts_with("file://"));
        assert!(uri.ends_with("Cargo.toml"));
    }

    #[test]
    fn granted_permissions_are_reported() {
        let permissions = ConsolePermissions::new(Capability::Camera, PermissionState::Granted);
        assert_eq!(PermissionState::Granted, permissions.status());
    }
}

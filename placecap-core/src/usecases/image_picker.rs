use std::{cell::RefCell, rc::Rc};

use super::{prelude::*, PermissionGate};
use crate::gateways::camera::{CameraGateway, CameraOptions};

pub type TakeImageHandler = Rc<dyn Fn(&str)>;

/// Captures a single image of a place with the device camera.
pub struct ImagePicker {
    gate: PermissionGate,
    camera: Rc<dyn CameraGateway>,
    options: CameraOptions,
    picked_image: RefCell<Option<String>>,
    on_take_image: TakeImageHandler,
}

impl ImagePicker {
    pub fn new<F>(gate: PermissionGate, camera: Rc<dyn CameraGateway>, on_take_image: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        debug_assert_eq!(Capability::Camera, gate.capability());
        Self {
            gate,
            camera,
            options: CameraOptions::default(),
            picked_image: RefCell::new(None),
            on_take_image: Rc::new(on_take_image),
        }
    }

    pub fn picked_image(&self) -> Option<String> {
        self.picked_image.borrow().clone()
    }

    /// Resolves to `None` if the user cancelled the capture.
    pub async fn take_image(&self) -> Result<Option<String>> {
        self.gate.check().await?;
        let uri = match self.camera.launch_camera(self.options).await {
            Ok(Some(uri)) => uri,
            Ok(None) => {
                log::debug!("Image capture cancelled");
                return Ok(None);
            }
            Err(err) => {
                log::warn!("Failed to capture an image: {err}");
                return Err(Error::ImageCaptureFailed);
            }
        };
        *self.picked_image.borrow_mut() = Some(uri.clone());
        (self.on_take_image)(&uri);
        Ok(Some(uri))
    }
}

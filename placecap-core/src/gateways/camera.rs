use super::{GatewayFuture, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOptions {
    pub allows_editing: bool,
    /// Crop aspect ratio as (width, height).
    pub aspect: (u16, u16),
    /// Compression quality between 0.0 and 1.0.
    pub quality: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            allows_editing: true,
            aspect: (16, 9),
            quality: 0.5,
        }
    }
}

pub trait CameraGateway {
    /// Launches the camera once.
    ///
    /// Resolves to the URI of the captured image or `None`
    /// if the user cancelled the capture.
    fn launch_camera(&self, options: CameraOptions) -> GatewayFuture<'_, Result<Option<String>>>;
}

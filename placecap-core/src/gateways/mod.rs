//! Ports to the platform and network services the usecases depend on.
//!
//! All asynchronous gateways return boxed local futures: the usecases run on a
//! single-threaded event loop and never require `Send`.

use std::{future::Future, pin::Pin};

use thiserror::Error;

pub mod alert;
pub mod camera;
pub mod geocode;
pub mod navigation;
pub mod permission;
pub mod position;

/// Object-safe boxed future returned by the asynchronous gateways.
pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Permission request failed: {0}")]
    PermissionRequest(String),
    #[error("Position unavailable: {0}")]
    Position(String),
    #[error("Reverse geocoding failed: {0}")]
    Geocoding(String),
    #[error("Camera failed: {0}")]
    Camera(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

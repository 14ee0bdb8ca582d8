use std::rc::Rc;

use super::prelude::*;
use crate::gateways::{alert::AlertGateway, permission::PermissionGateway};

/// Alert shown when a permission has been denied before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeniedNotice {
    pub title: String,
    pub message: String,
}

impl DeniedNotice {
    pub fn for_capability(capability: Capability) -> Self {
        Self {
            title: "Insufficient Permissions!".into(),
            message: format!("You need to grant {capability} permissions to use this app!"),
        }
    }
}

/// Turns the permission state of one capability into a decision.
///
/// The gate keeps no state of its own: every call reads the current
/// permission state from the platform.
#[derive(Clone)]
pub struct PermissionGate {
    capability: Capability,
    permissions: Rc<dyn PermissionGateway>,
    alerts: Rc<dyn AlertGateway>,
    denied_notice: DeniedNotice,
}

impl PermissionGate {
    pub fn new(
        capability: Capability,
        permissions: Rc<dyn PermissionGateway>,
        alerts: Rc<dyn AlertGateway>,
    ) -> Self {
        Self {
            capability,
            permissions,
            alerts,
            denied_notice: DeniedNotice::for_capability(capability),
        }
    }

    pub fn with_denied_notice(mut self, denied_notice: DeniedNotice) -> Self {
        self.denied_notice = denied_notice;
        self
    }

    pub const fn capability(&self) -> Capability {
        self.capability
    }

    /// Like [`PermissionGate::verify`] but tells why access is not possible.
    pub async fn check(&self) -> Result<()> {
        let capability = self.capability;
        match self.permissions.status() {
            PermissionState::Granted => Ok(()),
            PermissionState::Undetermined => match self.permissions.request().await {
                Ok(true) => {
                    log::info!("The user granted {capability} permissions");
                    Ok(())
                }
                Ok(false) => {
                    log::info!("The user declined {capability} permissions");
                    Err(Error::PermissionDenied(capability))
                }
                Err(err) => {
                    log::warn!("Failed to request {capability} permissions: {err}");
                    Err(Error::PermissionRequestFailed(capability))
                }
            },
            PermissionState::Denied => {
                let DeniedNotice { title, message } = &self.denied_notice;
                self.alerts.alert(title, message);
                Err(Error::PermissionDenied(capability))
            }
        }
    }

    pub async fn verify(&self) -> bool {
        self.check().await.is_ok()
    }
}

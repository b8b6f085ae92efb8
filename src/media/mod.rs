//! Camera and microphone acquisition
//!
//! The session controller only talks to the [`MediaAccess`] trait; the
//! bundled [`CaptureDevices`] implementation probes the default cpal input
//! device for the microphone and a configured V4L device node for the
//! camera. Whatever holds the devices must release them on every exit path,
//! including drop.

use async_trait::async_trait;
use cpal::traits::HostTrait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::Settings;
use crate::PrepifyError;

/// Current device-permission state.
///
/// Moves from `false` to `true` only through a successful acquisition and
/// regresses to `false` on any device error or release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPermissions {
    pub camera: bool,
    pub microphone: bool,
}

impl MediaPermissions {
    pub fn granted(&self) -> bool {
        self.camera && self.microphone
    }

    pub fn all_granted() -> Self {
        Self {
            camera: true,
            microphone: true,
        }
    }
}

/// Exclusive holder of the camera and microphone for one session.
#[async_trait]
pub trait MediaAccess: Send {
    /// Acquire both devices. Failure regresses all permissions to denied.
    async fn acquire(&mut self) -> crate::Result<MediaPermissions>;

    fn permissions(&self) -> MediaPermissions;

    /// Release held devices. Safe to call repeatedly.
    fn release(&mut self);
}

/// Probes the host's capture devices.
pub struct CaptureDevices {
    camera_device: PathBuf,
    permissions: MediaPermissions,
    held: bool,
}

impl CaptureDevices {
    pub fn new(settings: &Settings) -> Self {
        Self {
            camera_device: settings.session.camera_device.clone(),
            permissions: MediaPermissions::default(),
            held: false,
        }
    }
}

#[async_trait]
impl MediaAccess for CaptureDevices {
    async fn acquire(&mut self) -> crate::Result<MediaPermissions> {
        let microphone = cpal::default_host().default_input_device().is_some();
        let camera = self.camera_device.exists();

        if !(microphone && camera) {
            self.permissions = MediaPermissions::default();
            self.held = false;

            let mut missing = Vec::new();
            if !camera {
                missing.push(format!("camera ({})", self.camera_device.display()));
            }
            if !microphone {
                missing.push("microphone (no input device)".to_string());
            }
            return Err(PrepifyError::DeviceUnavailable(missing.join(", ")));
        }

        self.permissions = MediaPermissions::all_granted();
        self.held = true;
        tracing::info!("Camera and microphone acquired");
        Ok(self.permissions)
    }

    fn permissions(&self) -> MediaPermissions {
        self.permissions
    }

    fn release(&mut self) {
        if self.held {
            self.held = false;
            self.permissions = MediaPermissions::default();
            tracing::debug!("Capture devices released");
        }
    }
}

impl Drop for CaptureDevices {
    fn drop(&mut self) {
        self.release();
    }
}

use std::sync::Mutex;

use crate::client::ProtectBackend;
use crate::error::{ProtectError, ProtectResult};
use crate::model::{Liveview, Preset, PtzCamera, Viewport};

/// In-memory backend that records every call it receives.
#[derive(Default)]
pub struct FakeBackend {
    pub viewports: Vec<Viewport>,
    pub liveviews: Vec<Liveview>,
    pub cameras: Vec<PtzCamera>,
    pub fail_with: Option<String>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record<T>(&self, call: String, value: T) -> ProtectResult<T> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        match &self.fail_with {
            Some(message) => Err(ProtectError::remote(message.clone())),
            None => Ok(value),
        }
    }
}

pub fn viewport(id: &str, name: &str, liveview: &str) -> Viewport {
    Viewport {
        id: id.to_string(),
        name: name.to_string(),
        current_liveview_id: liveview.to_string(),
    }
}

pub fn liveview(id: &str, name: &str) -> Liveview {
    Liveview {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn camera(id: &str, name: &str) -> PtzCamera {
    PtzCamera {
        id: id.to_string(),
        name: name.to_string(),
        model_key: "camera".to_string(),
        active_patrol_slot: None,
    }
}

impl ProtectBackend for FakeBackend {
    async fn list_viewports(&self) -> ProtectResult<Vec<Viewport>> {
        self.record("list_viewports".to_string(), self.viewports.clone())
    }

    async fn list_liveviews(&self) -> ProtectResult<Vec<Liveview>> {
        self.record("list_liveviews".to_string(), self.liveviews.clone())
    }

    async fn list_ptz_cameras(&self) -> ProtectResult<Vec<PtzCamera>> {
        self.record("list_ptz_cameras".to_string(), self.cameras.clone())
    }

    async fn switch_viewport(&self, viewport_id: &str, liveview_id: &str) -> ProtectResult<()> {
        self.record(format!("switch_viewport {viewport_id} {liveview_id}"), ())
    }

    async fn move_to_preset(&self, camera_id: &str, preset: Preset) -> ProtectResult<()> {
        self.record(format!("move_to_preset {camera_id} {}", preset.value()), ())
    }
}

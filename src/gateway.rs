use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::{AppCommand, AppEvent};
use crate::client::ProtectBackend;
use crate::error::ProtectError;
use crate::model::Preset;

/// Launches backend calls as detached tasks.
///
/// Each task performs exactly one backend call and sends exactly one
/// [`AppEvent`] into the loop's queue. Tasks are never cancelled and are
/// not ordered relative to each other.
pub struct RemoteGateway<B> {
    backend: Arc<B>,
    events: UnboundedSender<AppEvent>,
}

impl<B: ProtectBackend> RemoteGateway<B> {
    pub fn new(backend: Arc<B>, events: UnboundedSender<AppEvent>) -> Self {
        Self { backend, events }
    }

    /// Starts whatever remote work `command` names, if any.
    pub fn launch(&self, command: AppCommand) -> Result<Option<JoinHandle<()>>, ProtectError> {
        let handle = match command {
            AppCommand::None => return Ok(None),
            AppCommand::ListViewports => self.list_viewports(),
            AppCommand::ListPtzCameras => self.list_ptz_cameras(),
            AppCommand::ListLiveviews => self.list_liveviews(),
            AppCommand::SwitchViewport {
                viewport_id,
                viewport_name,
                liveview_id,
                liveview_name,
            } => self.switch_viewport(viewport_id, viewport_name, liveview_id, liveview_name),
            AppCommand::MoveToPreset {
                camera_id,
                camera_name,
                preset,
            } => self.move_to_preset(camera_id, camera_name, preset)?,
        };
        Ok(Some(handle))
    }

    pub fn list_viewports(&self) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        self.spawn("list-viewports", async move {
            AppEvent::ViewportsLoaded(backend.list_viewports().await)
        })
    }

    pub fn list_liveviews(&self) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        self.spawn("list-liveviews", async move {
            AppEvent::LiveviewsLoaded(backend.list_liveviews().await)
        })
    }

    pub fn list_ptz_cameras(&self) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        self.spawn("list-ptz-cameras", async move {
            AppEvent::CamerasLoaded(backend.list_ptz_cameras().await)
        })
    }

    pub fn switch_viewport(
        &self,
        viewport_id: String,
        viewport_name: String,
        liveview_id: String,
        liveview_name: String,
    ) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        self.spawn("switch-viewport", async move {
            let result = backend
                .switch_viewport(&viewport_id, &liveview_id)
                .await
                .map(|()| format!("✓ Switched {viewport_name} to {liveview_name}"));
            AppEvent::OperationCompleted(result)
        })
    }

    /// Rejects presets outside `-1..=9` before any task is spawned.
    pub fn move_to_preset(
        &self,
        camera_id: String,
        camera_name: String,
        preset: i32,
    ) -> Result<JoinHandle<()>, ProtectError> {
        let preset = Preset::new(preset)?;
        let backend = Arc::clone(&self.backend);
        Ok(self.spawn("move-to-preset", async move {
            let result = backend
                .move_to_preset(&camera_id, preset)
                .await
                .map(|()| format!("✓ Moved {camera_name} to {preset}"));
            AppEvent::OperationCompleted(result)
        }))
    }

    fn spawn<F>(&self, operation: &'static str, task: F) -> JoinHandle<()>
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        debug!("launching {operation}");
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = task.await;
            if events.send(event).is_err() {
                warn!("dropping {operation} completion, event loop has stopped");
            }
        })
    }
}

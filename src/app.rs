use crate::error::ProtectResult;
use crate::input::Action;
use crate::model::{Liveview, Preset, PtzCamera, Viewport};
use std::fmt::Display;

/// Number of fixed entries on the main menu.
pub const MAIN_MENU_LEN: usize = 2;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Screen {
    MainMenu,
    Viewports,
    Cameras,
    Liveviews,
    Presets,
}

/// A remote operation the event loop should launch after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    None,
    ListViewports,
    ListPtzCameras,
    ListLiveviews,
    SwitchViewport {
        viewport_id: String,
        viewport_name: String,
        liveview_id: String,
        liveview_name: String,
    },
    MoveToPreset {
        camera_id: String,
        camera_name: String,
        preset: i32,
    },
}

/// Everything the state machine reacts to, input and completions alike.
#[derive(Debug)]
pub enum AppEvent {
    Input(Action),
    ViewportsLoaded(ProtectResult<Vec<Viewport>>),
    CamerasLoaded(ProtectResult<Vec<PtzCamera>>),
    LiveviewsLoaded(ProtectResult<Vec<Liveview>>),
    /// Outcome of a mutating call; `Ok` carries the operator-facing message.
    OperationCompleted(ProtectResult<String>),
}

pub struct App {
    quitting: bool,
    screen: Screen,
    cursor: usize,
    viewports: Vec<Viewport>,
    cameras: Vec<PtzCamera>,
    liveviews: Vec<Liveview>,
    selected_viewport: Option<Viewport>,
    selected_camera: Option<PtzCamera>,
    message: Option<String>,
    error: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            quitting: false,
            screen: Screen::MainMenu,
            cursor: 0,
            viewports: Vec::new(),
            cameras: Vec::new(),
            liveviews: Vec::new(),
            selected_viewport: None,
            selected_camera: None,
            message: None,
            error: None,
        }
    }

    pub fn quitting(&self) -> bool {
        self.quitting
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }

    pub fn cameras(&self) -> &[PtzCamera] {
        &self.cameras
    }

    pub fn liveviews(&self) -> &[Liveview] {
        &self.liveviews
    }

    pub fn selected_viewport(&self) -> Option<&Viewport> {
        self.selected_viewport.as_ref()
    }

    pub fn selected_camera(&self) -> Option<&PtzCamera> {
        self.selected_camera.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Length of whatever list the current screen shows.
    pub fn visible_len(&self) -> usize {
        match self.screen {
            Screen::MainMenu => MAIN_MENU_LEN,
            Screen::Viewports => self.viewports.len(),
            Screen::Cameras => self.cameras.len(),
            Screen::Liveviews => self.liveviews.len(),
            Screen::Presets => Preset::MENU_LEN,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> AppCommand {
        if self.quitting {
            return AppCommand::None;
        }

        match event {
            AppEvent::Input(action) => self.apply_action(action),
            AppEvent::ViewportsLoaded(Ok(viewports)) => {
                self.viewports = viewports;
                self.enter_screen(Screen::Viewports);
                AppCommand::None
            }
            AppEvent::CamerasLoaded(Ok(cameras)) => {
                self.cameras = cameras;
                self.enter_screen(Screen::Cameras);
                AppCommand::None
            }
            AppEvent::LiveviewsLoaded(Ok(liveviews)) => {
                self.liveviews = liveviews;
                self.enter_screen(Screen::Liveviews);
                AppCommand::None
            }
            AppEvent::OperationCompleted(Ok(message)) => {
                self.set_message(message);
                AppCommand::None
            }
            AppEvent::ViewportsLoaded(Err(error))
            | AppEvent::CamerasLoaded(Err(error))
            | AppEvent::LiveviewsLoaded(Err(error))
            | AppEvent::OperationCompleted(Err(error)) => {
                self.report_error(error);
                AppCommand::None
            }
        }
    }

    pub fn apply_action(&mut self, action: Action) -> AppCommand {
        if self.quitting {
            return AppCommand::None;
        }

        match action {
            Action::Quit => self.quitting = true,
            Action::Back => self.go_back(),
            Action::Up => self.cursor = self.cursor.saturating_sub(1),
            Action::Down => {
                if self.cursor + 1 < self.visible_len() {
                    self.cursor += 1;
                }
            }
            Action::Select => return self.select(),
        }
        AppCommand::None
    }

    /// Records a failure without touching the screen or selection.
    pub fn report_error(&mut self, error: impl Display) {
        self.error = Some(error.to_string());
        self.message = None;
    }

    fn set_message(&mut self, message: String) {
        self.message = Some(message);
        self.error = None;
    }

    fn enter_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.cursor = 0;
        self.message = None;
        self.error = None;
    }

    fn go_back(&mut self) {
        match self.screen {
            Screen::MainMenu => self.quitting = true,
            Screen::Viewports | Screen::Cameras => self.enter_screen(Screen::MainMenu),
            Screen::Liveviews => {
                self.selected_viewport = None;
                self.enter_screen(Screen::Viewports);
            }
            Screen::Presets => {
                self.selected_camera = None;
                self.enter_screen(Screen::Cameras);
            }
        }
    }

    fn select(&mut self) -> AppCommand {
        match self.screen {
            Screen::MainMenu => match self.cursor {
                0 => AppCommand::ListViewports,
                1 => AppCommand::ListPtzCameras,
                _ => AppCommand::None,
            },
            Screen::Viewports => match self.viewports.get(self.cursor) {
                Some(viewport) => {
                    self.selected_viewport = Some(viewport.clone());
                    AppCommand::ListLiveviews
                }
                None => AppCommand::None,
            },
            Screen::Cameras => {
                if let Some(camera) = self.cameras.get(self.cursor) {
                    self.selected_camera = Some(camera.clone());
                    self.enter_screen(Screen::Presets);
                }
                AppCommand::None
            }
            Screen::Liveviews => {
                match (self.selected_viewport.as_ref(), self.liveviews.get(self.cursor)) {
                    (Some(viewport), Some(liveview)) => AppCommand::SwitchViewport {
                        viewport_id: viewport.id.clone(),
                        viewport_name: viewport.name.clone(),
                        liveview_id: liveview.id.clone(),
                        liveview_name: liveview.name.clone(),
                    },
                    _ => AppCommand::None,
                }
            }
            Screen::Presets => {
                match (self.selected_camera.as_ref(), Preset::from_menu_index(self.cursor)) {
                    (Some(camera), Some(preset)) => AppCommand::MoveToPreset {
                        camera_id: camera.id.clone(),
                        camera_name: camera.name.clone(),
                        preset: preset.value(),
                    },
                    _ => AppCommand::None,
                }
            }
        }
    }
}

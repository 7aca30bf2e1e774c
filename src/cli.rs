use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "protect", version, about = "UniFi Protect View Switcher")]
pub struct CliArgs {
    /// UniFi Protect URL
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// API token for authentication
    #[arg(short = 't', long)]
    pub token: Option<String>,

    /// Log level (none, debug, info, warn, error)
    #[arg(short = 'l', long)]
    pub log_level: Option<String>,

    /// Launch interactive TUI mode
    #[arg(short = 'i', long)]
    pub tui: bool,

    /// Viewport name or ID to switch
    #[arg(short = 'p', long)]
    pub port: Option<String>,

    /// Liveview name or ID to switch to
    #[arg(short = 'v', long)]
    pub view: Option<String>,

    /// PTZ camera name or ID
    #[arg(short = 'c', long)]
    pub camera: Option<String>,

    /// PTZ preset slot (-1 for home, 0-9 for presets)
    #[arg(short = 'P', long, allow_negative_numbers = true)]
    pub preset: Option<i32>,

    /// List resources (viewports, liveviews, cameras)
    #[arg(short = 'L', long)]
    pub list: Option<String>,

    /// Show IDs in list output
    #[arg(long)]
    pub show_ids: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List and switch between viewports
    Viewport {
        #[command(subcommand)]
        action: SwitchCommand,
    },
    /// List liveviews and assign them to viewports
    Liveview {
        #[command(subcommand)]
        action: SwitchCommand,
    },
    /// List PTZ cameras and move them to preset positions
    Camera {
        #[command(subcommand)]
        action: CameraCommand,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SwitchCommand {
    /// List all available entries
    List {
        /// Show IDs in addition to names
        #[arg(long)]
        show_ids: bool,
    },
    /// Switch a viewport to a specific liveview
    Switch {
        /// Viewport name or ID
        viewport: String,
        /// Liveview name or ID
        liveview: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CameraCommand {
    /// List all PTZ cameras
    List {
        /// Show camera IDs alongside names
        #[arg(long)]
        show_ids: bool,
    },
    /// Move a PTZ camera to a preset position (-1 is home, 0-9 are slots)
    Goto {
        /// Camera name or ID
        camera: String,
        #[arg(allow_negative_numbers = true)]
        preset: i32,
    },
}

/// What a single invocation should do, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Tui,
    List { kind: String, show_ids: bool },
    Switch { port: String, view: String },
    Camera { camera: String, preset: Option<i32> },
    Help,
}

impl CliArgs {
    /// A subcommand takes over the whole invocation; otherwise flags decide.
    pub fn mode(&self) -> Mode {
        let given = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        if let Some(command) = &self.command {
            return command.mode();
        }
        if self.tui {
            return Mode::Tui;
        }
        if let Some(kind) = given(&self.list) {
            return Mode::List {
                kind,
                show_ids: self.show_ids,
            };
        }
        if let (Some(port), Some(view)) = (given(&self.port), given(&self.view)) {
            return Mode::Switch { port, view };
        }
        if let Some(camera) = given(&self.camera) {
            return Mode::Camera {
                camera,
                preset: self.preset,
            };
        }
        Mode::Help
    }
}

impl Command {
    fn mode(&self) -> Mode {
        let list = |kind: &str, show_ids: bool| Mode::List {
            kind: kind.to_string(),
            show_ids,
        };
        match self {
            Command::Viewport {
                action: SwitchCommand::List { show_ids },
            } => list("viewports", *show_ids),
            Command::Liveview {
                action: SwitchCommand::List { show_ids },
            } => list("liveviews", *show_ids),
            Command::Viewport {
                action: SwitchCommand::Switch { viewport, liveview },
            }
            | Command::Liveview {
                action: SwitchCommand::Switch { viewport, liveview },
            } => Mode::Switch {
                port: viewport.clone(),
                view: liveview.clone(),
            },
            Command::Camera {
                action: CameraCommand::List { show_ids },
            } => list("cameras", *show_ids),
            Command::Camera {
                action: CameraCommand::Goto { camera, preset },
            } => Mode::Camera {
                camera: camera.clone(),
                preset: Some(*preset),
            },
        }
    }
}

use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, Screen};
use crate::model::Preset;

const ACCENT: Color = Color::Indexed(170);
const MUTED: Color = Color::Indexed(241);
const SUCCESS: Color = Color::Indexed(120);
const ERROR: Color = Color::Indexed(196);

const MAIN_MENU_ENTRIES: [&str; 2] = ["Manage Viewports", "Control PTZ Cameras"];

pub fn render(frame: &mut Frame, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED))
        .title(Span::styled(" protect ", Style::default().fg(ACCENT)));
    frame.render_widget(
        Paragraph::new(frame_text(app))
            .block(block)
            .wrap(Wrap { trim: false }),
        frame.area(),
    );
}

/// Builds the full frame for the current state. Pure: reads `app` only.
pub fn frame_text(app: &App) -> Text<'static> {
    if app.quitting() {
        return Text::from("Goodbye!");
    }

    let mut lines = match app.screen() {
        Screen::MainMenu => main_menu_lines(app),
        Screen::Viewports => list_lines(
            "Viewports".to_string(),
            app.viewports().iter().map(|vp| vp.name.clone()).collect(),
            "No viewports found",
            app.cursor(),
            "↑/↓: navigate • enter: select liveview • esc: back • q: quit",
        ),
        Screen::Cameras => list_lines(
            "PTZ Cameras".to_string(),
            app.cameras().iter().map(|cam| cam.name.clone()).collect(),
            "No cameras found",
            app.cursor(),
            "↑/↓: navigate • enter: select preset • esc: back • q: quit",
        ),
        Screen::Liveviews => list_lines(
            titled_for("Select Liveview", app.selected_viewport().map(|vp| vp.name.as_str())),
            app.liveviews().iter().map(|lv| lv.name.clone()).collect(),
            "No liveviews found",
            app.cursor(),
            "↑/↓: navigate • enter: switch • esc: back • q: quit",
        ),
        Screen::Presets => list_lines(
            titled_for("Select Preset", app.selected_camera().map(|cam| cam.name.as_str())),
            Preset::all().map(Preset::menu_label).collect(),
            "",
            app.cursor(),
            "↑/↓: navigate • enter: move • esc: back • q: quit",
        ),
    };

    // error wins if both are somehow set
    if let Some(error) = app.error() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Error: {error}"),
            Style::default().fg(ERROR),
        )));
    } else if let Some(message) = app.message() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(SUCCESS),
        )));
    }

    Text::from(lines)
}

fn main_menu_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![
        title_line("UniFi Protect Control".to_string()),
        Line::default(),
        Line::from("Select an option:"),
        Line::default(),
    ];
    lines.extend(
        MAIN_MENU_ENTRIES
            .iter()
            .enumerate()
            .map(|(idx, entry)| entry_line(entry, idx == app.cursor())),
    );
    lines.push(Line::default());
    lines.push(help_line("↑/↓: navigate • enter: select • q: quit"));
    lines
}

fn list_lines(
    title: String,
    entries: Vec<String>,
    empty: &str,
    cursor: usize,
    help: &str,
) -> Vec<Line<'static>> {
    let mut lines = vec![title_line(title), Line::default()];
    if entries.is_empty() {
        lines.push(Line::from(empty.to_string()));
    } else {
        lines.extend(
            entries
                .iter()
                .enumerate()
                .map(|(idx, entry)| entry_line(entry, idx == cursor)),
        );
    }
    lines.push(Line::default());
    lines.push(help_line(help));
    lines
}

fn titled_for(prefix: &str, target: Option<&str>) -> String {
    match target {
        Some(name) => format!("{prefix} for {name}"),
        None => prefix.to_string(),
    }
}

fn title_line(title: String) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))
}

fn entry_line(label: &str, selected: bool) -> Line<'static> {
    if selected {
        Line::from(Span::styled(
            format!("  > {label}"),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(format!("    {label}"))
    }
}

fn help_line(help: &str) -> Line<'static> {
    Line::from(Span::styled(help.to_string(), Style::default().fg(MUTED)))
}

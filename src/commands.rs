use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write;
use std::str::FromStr;
use tracing::info;

use crate::client::ProtectBackend;
use crate::model::Preset;
use crate::resolve::resolve;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Viewports,
    Liveviews,
    Cameras,
}

impl FromStr for ListKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "viewports" => Ok(Self::Viewports),
            "liveviews" | "views" => Ok(Self::Liveviews),
            "cameras" => Ok(Self::Cameras),
            other => anyhow::bail!(
                "invalid list type: {other} (use 'viewports', 'liveviews', or 'cameras')"
            ),
        }
    }
}

pub async fn list<B: ProtectBackend, W: Write>(
    backend: &B,
    kind: ListKind,
    show_ids: bool,
    out: &mut W,
) -> Result<()> {
    match kind {
        ListKind::Viewports => list_viewports(backend, show_ids, out).await,
        ListKind::Liveviews => list_liveviews(backend, show_ids, out).await,
        ListKind::Cameras => list_cameras(backend, show_ids, out).await,
    }
}

async fn list_viewports<B: ProtectBackend, W: Write>(
    backend: &B,
    show_ids: bool,
    out: &mut W,
) -> Result<()> {
    let viewports = backend.list_viewports().await?;
    if viewports.is_empty() {
        writeln!(out, "No viewports found")?;
        return Ok(());
    }

    let names = backend
        .list_liveviews()
        .await?
        .into_iter()
        .map(|lv| (lv.id, lv.name))
        .collect::<HashMap<_, _>>();

    let rows = viewports
        .iter()
        .map(|vp| {
            let current = names
                .get(&vp.current_liveview_id)
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or_else(|| vp.current_liveview_id.clone());
            if show_ids {
                vec![
                    vp.name.clone(),
                    current,
                    vp.id.clone(),
                    vp.current_liveview_id.clone(),
                ]
            } else {
                vec![vp.name.clone(), current]
            }
        })
        .collect::<Vec<_>>();

    let headers: &[&str] = if show_ids {
        &["NAME", "CURRENT LIVEVIEW", "ID", "LIVEVIEW ID"]
    } else {
        &["NAME", "CURRENT LIVEVIEW"]
    };
    out.write_all(render_table(headers, &rows).as_bytes())?;
    info!(count = viewports.len(), "listed viewports");
    Ok(())
}

async fn list_liveviews<B: ProtectBackend, W: Write>(
    backend: &B,
    show_ids: bool,
    out: &mut W,
) -> Result<()> {
    let liveviews = backend.list_liveviews().await?;
    if liveviews.is_empty() {
        writeln!(out, "No liveviews found")?;
        return Ok(());
    }

    let (headers, rows): (&[&str], Vec<Vec<String>>) = if show_ids {
        (
            &["NAME", "ID"],
            liveviews
                .iter()
                .map(|lv| vec![lv.name.clone(), lv.id.clone()])
                .collect(),
        )
    } else {
        (
            &["NAME"],
            liveviews.iter().map(|lv| vec![lv.name.clone()]).collect(),
        )
    };
    out.write_all(render_table(headers, &rows).as_bytes())?;
    info!(count = liveviews.len(), "listed liveviews");
    Ok(())
}

async fn list_cameras<B: ProtectBackend, W: Write>(
    backend: &B,
    show_ids: bool,
    out: &mut W,
) -> Result<()> {
    let cameras = backend.list_ptz_cameras().await?;
    if cameras.is_empty() {
        writeln!(out, "No PTZ cameras found")?;
        return Ok(());
    }

    let (headers, rows): (&[&str], Vec<Vec<String>>) = if show_ids {
        (
            &["ID", "NAME"],
            cameras
                .iter()
                .map(|cam| vec![cam.id.clone(), cam.name.clone()])
                .collect(),
        )
    } else {
        (
            &["NAME"],
            cameras.iter().map(|cam| vec![cam.name.clone()]).collect(),
        )
    };
    out.write_all(render_table(headers, &rows).as_bytes())?;
    info!(count = cameras.len(), "listed PTZ cameras");
    Ok(())
}

/// Resolves both sides by name or ID, then points the viewport at the liveview.
/// The confirmation echoes the identifiers as given.
pub async fn switch_viewport<B: ProtectBackend, W: Write>(
    backend: &B,
    viewport: &str,
    liveview: &str,
    out: &mut W,
) -> Result<()> {
    let viewports = backend.list_viewports().await?;
    let target = resolve(&viewports, viewport, "viewport")?;

    let liveviews = backend.list_liveviews().await?;
    let view = resolve(&liveviews, liveview, "liveview")?;

    backend.switch_viewport(&target.id, &view.id).await?;
    info!(viewport = %target.name, liveview = %view.name, "switched viewport");
    writeln!(
        out,
        "Successfully switched viewport {viewport} to liveview {liveview}"
    )?;
    Ok(())
}

pub async fn move_camera<B: ProtectBackend, W: Write>(
    backend: &B,
    camera: &str,
    preset: Option<i32>,
    out: &mut W,
) -> Result<()> {
    let preset = preset.context("--preset flag is required when using --camera")?;
    let preset = Preset::new(preset)?;

    let cameras = backend.list_ptz_cameras().await?;
    let target = resolve(&cameras, camera, "camera")?;

    backend.move_to_preset(&target.id, preset).await?;
    info!(camera = %target.name, preset = preset.value(), "moved PTZ camera");
    writeln!(out, "Successfully moved camera '{}' to {preset}", target.name)?;
    Ok(())
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths = column_widths(headers, rows);
    let header = headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();

    let mut out = String::new();
    let _ = writeln!(out, "{}", format_row(&header, &widths));
    let _ = writeln!(out, "{}", format_separator(&widths));
    for row in rows {
        let _ = writeln!(out, "{}", format_row(row, &widths));
    }
    out
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            if idx >= widths.len() {
                widths.push(len);
            } else {
                widths[idx] = widths[idx].max(len);
            }
        }
    }
    widths
}

fn format_row(row: &[String], widths: &[usize]) -> String {
    let mut out = String::new();
    for (idx, cell) in row.iter().enumerate() {
        if idx > 0 {
            out.push_str("  ");
        }
        let width = widths.get(idx).copied().unwrap_or(0);
        let _ = write!(out, "{cell:<width$}");
    }
    out.trim_end().to_string()
}

fn format_separator(widths: &[usize]) -> String {
    widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::{ListKind, list, move_camera, switch_viewport};
    use crate::error::ProtectError;
    use crate::testing::{FakeBackend, camera, liveview, viewport};

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).expect("utf8 output")
    }

    fn backend() -> FakeBackend {
        FakeBackend {
            viewports: vec![
                viewport("vp1", "Front", "lv1"),
                viewport("vp2", "Back", "lv-gone"),
            ],
            liveviews: vec![liveview("lv1", "Wide"), liveview("lv2", "Doors")],
            cameras: vec![camera("cam1", "Tower"), camera("cam2", "Gate")],
            ..FakeBackend::default()
        }
    }

    #[test]
    fn list_kind_accepts_views_alias() {
        assert_eq!("viewports".parse::<ListKind>().expect("kind"), ListKind::Viewports);
        assert_eq!("views".parse::<ListKind>().expect("kind"), ListKind::Liveviews);
        assert_eq!("liveviews".parse::<ListKind>().expect("kind"), ListKind::Liveviews);
        assert_eq!("cameras".parse::<ListKind>().expect("kind"), ListKind::Cameras);

        let err = "nvrs".parse::<ListKind>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid list type: nvrs (use 'viewports', 'liveviews', or 'cameras')"
        );
    }

    #[tokio::test]
    async fn viewports_table_shows_liveview_names_with_id_fallback() {
        let mut out = Vec::new();
        list(&backend(), ListKind::Viewports, false, &mut out)
            .await
            .expect("list");
        assert_eq!(
            output(out),
            "NAME   CURRENT LIVEVIEW\n\
             -----  ----------------\n\
             Front  Wide\n\
             Back   lv-gone\n"
        );
    }

    #[tokio::test]
    async fn viewports_table_with_ids() {
        let mut out = Vec::new();
        list(&backend(), ListKind::Viewports, true, &mut out)
            .await
            .expect("list");
        let text = output(out);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("NAME   CURRENT LIVEVIEW  ID   LIVEVIEW ID")
        );
        assert!(text.contains("Front  Wide              vp1  lv1"));
    }

    #[tokio::test]
    async fn cameras_table_puts_id_first() {
        let mut out = Vec::new();
        list(&backend(), ListKind::Cameras, true, &mut out)
            .await
            .expect("list");
        assert_eq!(
            output(out),
            "ID    NAME\n----  -----\ncam1  Tower\ncam2  Gate\n"
        );
    }

    #[tokio::test]
    async fn empty_lists_print_a_notice() {
        let empty = FakeBackend::default();
        for (kind, notice) in [
            (ListKind::Viewports, "No viewports found\n"),
            (ListKind::Liveviews, "No liveviews found\n"),
            (ListKind::Cameras, "No PTZ cameras found\n"),
        ] {
            let mut out = Vec::new();
            list(&empty, kind, false, &mut out).await.expect("list");
            assert_eq!(output(out), notice);
        }
    }

    #[tokio::test]
    async fn switch_resolves_names_and_echoes_identifiers() {
        let backend = backend();
        let mut out = Vec::new();
        switch_viewport(&backend, "Back", "lv2", &mut out)
            .await
            .expect("switch");
        assert_eq!(
            output(out),
            "Successfully switched viewport Back to liveview lv2\n"
        );
        assert_eq!(
            backend.calls(),
            vec!["list_viewports", "list_liveviews", "switch_viewport vp2 lv2"]
        );
    }

    #[tokio::test]
    async fn switch_by_ids_echoes_ids() {
        let backend = backend();
        let mut out = Vec::new();
        switch_viewport(&backend, "vp2", "lv1", &mut out)
            .await
            .expect("switch");
        assert_eq!(
            output(out),
            "Successfully switched viewport vp2 to liveview lv1\n"
        );
        assert!(backend.calls().contains(&"switch_viewport vp2 lv1".to_string()));
    }

    #[tokio::test]
    async fn switch_to_unknown_liveview_fails_without_patch() {
        let backend = backend();
        let mut out = Vec::new();
        let err = switch_viewport(&backend, "Front", "Nope", &mut out)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProtectError>(),
            Some(&ProtectError::not_found("liveview", "Nope"))
        );
        assert!(out.is_empty());
        assert!(!backend.calls().iter().any(|call| call.starts_with("switch_viewport")));
    }

    #[tokio::test]
    async fn move_camera_home_uses_home_label() {
        let backend = backend();
        let mut out = Vec::new();
        move_camera(&backend, "cam2", Some(-1), &mut out)
            .await
            .expect("move");
        assert_eq!(
            output(out),
            "Successfully moved camera 'Gate' to home position\n"
        );
        assert_eq!(
            backend.calls(),
            vec!["list_ptz_cameras", "move_to_preset cam2 -1"]
        );
    }

    #[tokio::test]
    async fn move_camera_validates_before_any_call() {
        let backend = backend();
        let mut out = Vec::new();

        let err = move_camera(&backend, "Tower", None, &mut out)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "--preset flag is required when using --camera"
        );

        let err = move_camera(&backend, "Tower", Some(10), &mut out)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProtectError>(),
            Some(&ProtectError::InvalidPreset(10))
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn backend_failure_propagates() {
        let mut out = Vec::new();
        let err = list(&FakeBackend::failing("boom"), ListKind::Cameras, false, &mut out)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}

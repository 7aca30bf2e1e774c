use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::error::{ProtectError, ProtectResult};
use crate::model::{Liveview, Preset, PtzCamera, Viewport};

const API_PREFIX: &str = "/proxy/protect/integration/v1";
const API_KEY_HEADER: &str = "X-API-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The backend operations the navigation core depends on.
///
/// Every call fails with a single opaque [`ProtectError::Remote`] on transport
/// failure or any non-2xx response.
pub trait ProtectBackend: Send + Sync + 'static {
    fn list_viewports(&self) -> impl Future<Output = ProtectResult<Vec<Viewport>>> + Send;

    fn list_liveviews(&self) -> impl Future<Output = ProtectResult<Vec<Liveview>>> + Send;

    /// Returns every camera; no filtering on [`PtzCamera::has_ptz`].
    fn list_ptz_cameras(&self) -> impl Future<Output = ProtectResult<Vec<PtzCamera>>> + Send;

    fn switch_viewport(
        &self,
        viewport_id: &str,
        liveview_id: &str,
    ) -> impl Future<Output = ProtectResult<()>> + Send;

    fn move_to_preset(
        &self,
        camera_id: &str,
        preset: Preset,
    ) -> impl Future<Output = ProtectResult<()>> + Send;
}

#[derive(Clone)]
pub struct ProtectClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl ProtectClient {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("protect")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_token: api_token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ProtectResult<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!("request method={method} url={url}");

        let mut builder = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_token);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|error| ProtectError::remote(format!("request failed: {error}")))?;
        let status = response.status();
        let text = response.text().await.map_err(|error| {
            ProtectError::remote(format!("failed to read response body: {error}"))
        })?;

        if !status.is_success() {
            error!("request failed status={} body={text}", status.as_u16());
            return Err(status_error(status, &text));
        }

        debug!("response status={} bytes={}", status.as_u16(), text.len());
        Ok(text)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str, what: &str) -> ProtectResult<Vec<T>> {
        let body = self
            .request::<()>(Method::GET, path, None)
            .await
            .map_err(|error| ProtectError::remote(format!("failed to list {what}: {error}")))?;
        serde_json::from_str(&body).map_err(|error| {
            ProtectError::remote(format!("failed to decode {what}: {error}"))
        })
    }
}

impl ProtectBackend for ProtectClient {
    async fn list_viewports(&self) -> ProtectResult<Vec<Viewport>> {
        debug!("fetching viewports");
        self.get_list(&format!("{API_PREFIX}/viewers"), "viewports")
            .await
    }

    async fn list_liveviews(&self) -> ProtectResult<Vec<Liveview>> {
        debug!("fetching liveviews");
        self.get_list(&format!("{API_PREFIX}/liveviews"), "liveviews")
            .await
    }

    async fn list_ptz_cameras(&self) -> ProtectResult<Vec<PtzCamera>> {
        debug!("fetching PTZ cameras");
        let cameras: Vec<PtzCamera> = self
            .get_list(&format!("{API_PREFIX}/cameras"), "PTZ cameras")
            .await?;
        debug!(
            "cameras total={} ptz_capable={}",
            cameras.len(),
            cameras.iter().filter(|camera| camera.has_ptz()).count()
        );
        Ok(cameras)
    }

    async fn switch_viewport(&self, viewport_id: &str, liveview_id: &str) -> ProtectResult<()> {
        info!("switching viewport viewport_id={viewport_id} liveview_id={liveview_id}");
        let body = json!({ "liveview": liveview_id });
        self.request(
            Method::PATCH,
            &format!("{API_PREFIX}/viewers/{viewport_id}"),
            Some(&body),
        )
        .await
        .map(|_| ())
        .map_err(|error| ProtectError::remote(format!("failed to switch viewport: {error}")))
    }

    async fn move_to_preset(&self, camera_id: &str, preset: Preset) -> ProtectResult<()> {
        info!(
            "moving PTZ camera camera_id={camera_id} preset={}",
            preset.value()
        );
        self.request::<()>(
            Method::POST,
            &format!("{API_PREFIX}/cameras/{camera_id}/ptz/goto/{}", preset.value()),
            None,
        )
        .await
        .map(|_| ())
        .map_err(|error| {
            ProtectError::remote(format!("failed to move PTZ camera to preset: {error}"))
        })
    }
}

fn status_error(status: StatusCode, body: &str) -> ProtectError {
    ProtectError::remote(format!(
        "request failed with status {}: {body}",
        status.as_u16()
    ))
}

#[cfg(test)]
mod tests {
    use super::{ProtectBackend, ProtectClient};
    use crate::error::ProtectError;
    use crate::model::Preset;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, patch, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<String>>>;

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}")
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("x-api-key")
            .and_then(|value| value.to_str().ok())
            == Some("test-token")
    }

    fn protect_router(calls: Calls) -> Router {
        Router::new()
            .route(
                "/proxy/protect/integration/v1/viewers",
                get(|headers: HeaderMap| async move {
                    if !authorized(&headers) {
                        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "no key"})));
                    }
                    (
                        StatusCode::OK,
                        Json(json!([
                            {"id": "vp1", "name": "Viewport 1", "liveview": "lv1"},
                            {"id": "vp2", "name": "Viewport 2", "liveview": "lv2"}
                        ])),
                    )
                }),
            )
            .route(
                "/proxy/protect/integration/v1/liveviews",
                get(|| async {
                    Json(json!([
                        {"id": "lv1", "name": "Wide"},
                        {"id": "lv2", "name": "Close"}
                    ]))
                }),
            )
            .route(
                "/proxy/protect/integration/v1/cameras",
                get(|| async {
                    Json(json!([
                        {"id": "cam1", "name": "Tower", "modelKey": "camera", "activePatrolSlot": null},
                        {"id": "cam2", "name": "Door", "modelKey": "camera"}
                    ]))
                }),
            )
            .route(
                "/proxy/protect/integration/v1/viewers/:id",
                patch(
                    |State(calls): State<Calls>,
                     Path(id): Path<String>,
                     Json(body): Json<Value>| async move {
                        let liveview = body["liveview"].as_str().unwrap_or_default().to_string();
                        calls
                            .lock()
                            .expect("calls lock")
                            .push(format!("PATCH {id} {liveview}"));
                        StatusCode::OK
                    },
                ),
            )
            .route(
                "/proxy/protect/integration/v1/cameras/:id/ptz/goto/:slot",
                post(
                    |State(calls): State<Calls>, Path((id, slot)): Path<(String, i32)>| async move {
                        calls
                            .lock()
                            .expect("calls lock")
                            .push(format!("POST {id} {slot}"));
                        StatusCode::NO_CONTENT
                    },
                ),
            )
            .with_state(calls)
    }

    async fn client_with_calls() -> (ProtectClient, Calls) {
        let calls = Calls::default();
        let base = spawn_server(protect_router(calls.clone())).await;
        let client = ProtectClient::new(base, "test-token").expect("client");
        (client, calls)
    }

    #[tokio::test]
    async fn lists_viewports_with_api_key() {
        let (client, _) = client_with_calls().await;
        let viewports = client.list_viewports().await.expect("viewports");
        assert_eq!(viewports.len(), 2);
        assert_eq!(viewports[0].id, "vp1");
        assert_eq!(viewports[0].name, "Viewport 1");
        assert_eq!(viewports[1].current_liveview_id, "lv2");
    }

    #[tokio::test]
    async fn missing_api_key_surfaces_status_and_body() {
        let (client, _) = client_with_calls().await;
        let client = ProtectClient::new(client.base_url(), "wrong").expect("client");
        let err = client.list_viewports().await.unwrap_err();
        let ProtectError::Remote(message) = err else {
            panic!("expected remote error, got {err:?}");
        };
        assert!(message.contains("status 401"), "{message}");
        assert!(message.contains("no key"), "{message}");
    }

    #[tokio::test]
    async fn lists_liveviews_and_unfiltered_cameras() {
        let (client, _) = client_with_calls().await;
        let liveviews = client.list_liveviews().await.expect("liveviews");
        assert_eq!(liveviews[1].name, "Close");

        let cameras = client.list_ptz_cameras().await.expect("cameras");
        assert_eq!(cameras.len(), 2);
        assert_eq!(cameras[0].active_patrol_slot, Some(None));
        assert_eq!(cameras[1].active_patrol_slot, None);
    }

    #[tokio::test]
    async fn switch_viewport_patches_liveview() {
        let (client, calls) = client_with_calls().await;
        client
            .switch_viewport("vp1", "lv2")
            .await
            .expect("switch viewport");
        assert_eq!(*calls.lock().expect("calls lock"), vec!["PATCH vp1 lv2"]);
    }

    #[tokio::test]
    async fn move_to_preset_posts_home_slot() {
        let (client, calls) = client_with_calls().await;
        client
            .move_to_preset("cam1", Preset::HOME)
            .await
            .expect("move to preset");
        assert_eq!(*calls.lock().expect("calls lock"), vec!["POST cam1 -1"]);
    }

    #[tokio::test]
    async fn unreachable_backend_is_remote_error() {
        let client = ProtectClient::new("http://127.0.0.1:1", "test-token").expect("client");
        let err = client.list_liveviews().await.unwrap_err();
        assert!(matches!(err, ProtectError::Remote(_)));
    }

    #[tokio::test]
    async fn undecodable_body_is_remote_error() {
        let base = spawn_server(Router::new().route(
            "/proxy/protect/integration/v1/liveviews",
            get(|| async { "not json" }),
        ))
        .await;
        let client = ProtectClient::new(base, "test-token").expect("client");
        let err = client.list_liveviews().await.unwrap_err();
        assert!(err.to_string().starts_with("failed to decode liveviews"));
    }
}

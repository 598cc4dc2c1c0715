//! In-memory stand-in for the panel HTTP API.
//!
//! # Design
//! Serves the client-API Minecraft player endpoints and the application-API
//! location endpoints under `/api`, guarded by a single bearer token. Failures
//! use the panel's `{"errors":[{code,status,detail}]}` document so clients see
//! the same error shape they would in production.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

/// Live state of one game server.
#[derive(Debug, Clone, Default)]
pub struct McServer {
    pub online: BTreeSet<String>,
    pub whitelist_enabled: bool,
    pub whitelist: BTreeSet<String>,
    pub ops: BTreeSet<String>,
    pub bans: BTreeMap<String, Option<String>>,
    pub ip_bans: BTreeMap<String, Option<String>>,
    pub whispers: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub id: u64,
    pub short: String,
    pub long: String,
}

#[derive(Debug, Default)]
struct Panel {
    servers: HashMap<String, McServer>,
    locations: BTreeMap<u64, Location>,
    next_location_id: u64,
}

#[derive(Clone)]
struct AppState {
    api_key: Arc<str>,
    panel: Arc<RwLock<Panel>>,
}

/// Builder for a mock panel with a fixed API key and a set of servers.
#[derive(Debug)]
pub struct MockPanel {
    api_key: String,
    panel: Panel,
}

impl MockPanel {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            panel: Panel {
                next_location_id: 1,
                ..Panel::default()
            },
        }
    }

    /// Registers a server whose listed players are online.
    pub fn with_server(mut self, id: &str, online: &[&str]) -> Self {
        let server = McServer {
            online: online.iter().map(|p| p.to_string()).collect(),
            ..McServer::default()
        };
        self.panel.servers.insert(id.to_string(), server);
        self
    }

    pub fn router(self) -> Router {
        let state = AppState {
            api_key: Arc::from(self.api_key),
            panel: Arc::new(RwLock::new(self.panel)),
        };
        let players = "/client/servers/{server}/mc-players";
        let api = Router::new()
            .route("/client/servers/{server}/minecraft-software", get(software))
            .route(players, get(list_players))
            .route(&format!("{players}/whitelist/status"), post(set_whitelist_status))
            .route(
                &format!("{players}/whitelist"),
                put(add_to_whitelist).delete(remove_from_whitelist),
            )
            .route(&format!("{players}/op"), put(op).delete(deop))
            .route(&format!("{players}/ban"), put(ban).delete(unban))
            .route(&format!("{players}/ban-ip"), put(ban_ip).delete(unban_ip))
            .route(&format!("{players}/ban-ip-player"), put(ban_ip_player))
            .route(&format!("{players}/kick"), post(kick))
            .route(&format!("{players}/clear"), post(clear_inventory))
            .route(&format!("{players}/wipe"), post(wipe))
            .route(&format!("{players}/whisper"), post(whisper))
            .route(&format!("{players}/kill"), post(kill))
            .route("/application/locations", get(list_locations).post(create_location))
            .route(
                "/application/locations/{id}",
                get(get_location).patch(edit_location).delete(delete_location),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
            .with_state(state);
        Router::new().nest("/api", api)
    }

    pub async fn serve(self, listener: TcpListener) -> Result<(), std::io::Error> {
        axum::serve(listener, self.router()).await
    }
}

/// Error document in the panel's format.
#[derive(Debug)]
pub struct PanelFailure {
    status: StatusCode,
    code: &'static str,
    detail: String,
}

impl PanelFailure {
    fn new(status: StatusCode, code: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            code,
            detail: detail.into(),
        }
    }

    fn not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "NotFoundHttpException",
            "The requested resource could not be found on the server.",
        )
    }

    fn validation(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "ValidationException", detail)
    }
}

impl IntoResponse for PanelFailure {
    fn into_response(self) -> Response {
        let body = json!({
            "errors": [{
                "code": self.code,
                "status": self.status.as_u16().to_string(),
                "detail": self.detail,
            }]
        });
        (self.status, Json(body)).into_response()
    }
}

type Reply = Result<(StatusCode, Json<Value>), PanelFailure>;
type Empty = Result<StatusCode, PanelFailure>;

async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, PanelFailure> {
    let expected = format!("Bearer {}", state.api_key);
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if presented != Some(expected.as_str()) {
        return Err(PanelFailure::new(
            StatusCode::UNAUTHORIZED,
            "AuthenticationException",
            "Unauthenticated.",
        ));
    }
    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
pub struct PlayerBody {
    pub username: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IpBody {
    pub ip: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WhisperBody {
    pub username: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct WhitelistStatusBody {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewLocation {
    pub shortcode: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationChanges {
    pub shortcode: Option<String>,
    pub description: Option<String>,
}

fn server_mut<'a>(panel: &'a mut Panel, id: &str) -> Result<&'a mut McServer, PanelFailure> {
    panel.servers.get_mut(id).ok_or_else(PanelFailure::not_found)
}

fn required(field: &str, value: &str) -> Result<(), PanelFailure> {
    if value.trim().is_empty() {
        return Err(PanelFailure::validation(format!("The {field} field is required.")));
    }
    Ok(())
}

fn must_be_online(server: &McServer, username: &str) -> Result<(), PanelFailure> {
    if !server.online.contains(username) {
        return Err(PanelFailure::validation(format!("Player {username} is not online.")));
    }
    Ok(())
}

fn location_document(location: &Location) -> Value {
    json!({"object": "location", "attributes": location})
}

// --- client API: minecraft ---

async fn software(State(state): State<AppState>, Path(server): Path<String>) -> Reply {
    let panel = state.panel.read().await;
    panel.servers.get(&server).ok_or_else(PanelFailure::not_found)?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "object": "minecraft_software",
            "attributes": {"software": "paper", "version": "1.21.1"}
        })),
    ))
}

async fn list_players(State(state): State<AppState>, Path(server): Path<String>) -> Reply {
    let panel = state.panel.read().await;
    let s = panel.servers.get(&server).ok_or_else(PanelFailure::not_found)?;
    let bans: Vec<Value> = s
        .bans
        .iter()
        .map(|(username, reason)| json!({"username": username, "reason": reason}))
        .collect();
    let ip_bans: Vec<Value> = s
        .ip_bans
        .iter()
        .map(|(ip, reason)| json!({"ip": ip, "reason": reason}))
        .collect();
    Ok((
        StatusCode::OK,
        Json(json!({
            "online": s.online,
            "whitelist": {"enabled": s.whitelist_enabled, "players": s.whitelist},
            "ops": s.ops,
            "bans": bans,
            "ip_bans": ip_bans,
        })),
    ))
}

async fn set_whitelist_status(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<WhitelistStatusBody>,
) -> Empty {
    let mut panel = state.panel.write().await;
    server_mut(&mut panel, &server)?.whitelist_enabled = body.enabled;
    debug!(server = %server, enabled = body.enabled, "whitelist status changed");
    Ok(StatusCode::NO_CONTENT)
}

async fn add_to_whitelist(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<PlayerBody>,
) -> Reply {
    required("username", &body.username)?;
    let mut panel = state.panel.write().await;
    server_mut(&mut panel, &server)?
        .whitelist
        .insert(body.username.clone());
    Ok((
        StatusCode::CREATED,
        Json(json!({"username": body.username, "whitelisted": true})),
    ))
}

async fn remove_from_whitelist(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<PlayerBody>,
) -> Empty {
    required("username", &body.username)?;
    let mut panel = state.panel.write().await;
    server_mut(&mut panel, &server)?.whitelist.remove(&body.username);
    Ok(StatusCode::NO_CONTENT)
}

async fn op(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<PlayerBody>,
) -> Reply {
    required("username", &body.username)?;
    let mut panel = state.panel.write().await;
    server_mut(&mut panel, &server)?.ops.insert(body.username.clone());
    Ok((
        StatusCode::CREATED,
        Json(json!({"username": body.username, "op": true})),
    ))
}

async fn deop(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<PlayerBody>,
) -> Empty {
    required("username", &body.username)?;
    let mut panel = state.panel.write().await;
    server_mut(&mut panel, &server)?.ops.remove(&body.username);
    Ok(StatusCode::NO_CONTENT)
}

async fn ban(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<PlayerBody>,
) -> Reply {
    required("username", &body.username)?;
    let mut panel = state.panel.write().await;
    let s = server_mut(&mut panel, &server)?;
    s.online.remove(&body.username);
    s.bans.insert(body.username.clone(), body.reason);
    debug!(server = %server, username = %body.username, "player banned");
    Ok((
        StatusCode::CREATED,
        Json(json!({"username": body.username, "banned": true})),
    ))
}

async fn unban(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<PlayerBody>,
) -> Empty {
    required("username", &body.username)?;
    let mut panel = state.panel.write().await;
    let s = server_mut(&mut panel, &server)?;
    if s.bans.remove(&body.username).is_none() {
        return Err(PanelFailure::validation(format!(
            "Player {} is not banned.",
            body.username
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn ban_ip(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<IpBody>,
) -> Reply {
    required("ip", &body.ip)?;
    let mut panel = state.panel.write().await;
    server_mut(&mut panel, &server)?
        .ip_bans
        .insert(body.ip.clone(), body.reason);
    Ok((
        StatusCode::CREATED,
        Json(json!({"ip": body.ip, "banned": true})),
    ))
}

async fn ban_ip_player(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<PlayerBody>,
) -> Reply {
    required("username", &body.username)?;
    let mut panel = state.panel.write().await;
    let s = server_mut(&mut panel, &server)?;
    must_be_online(s, &body.username)?;
    s.online.remove(&body.username);
    Ok((
        StatusCode::CREATED,
        Json(json!({"username": body.username, "ip_banned": true})),
    ))
}

async fn unban_ip(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<IpBody>,
) -> Empty {
    required("ip", &body.ip)?;
    let mut panel = state.panel.write().await;
    server_mut(&mut panel, &server)?.ip_bans.remove(&body.ip);
    Ok(StatusCode::NO_CONTENT)
}

async fn kick(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<PlayerBody>,
) -> Empty {
    let mut panel = state.panel.write().await;
    let s = server_mut(&mut panel, &server)?;
    must_be_online(s, &body.username)?;
    s.online.remove(&body.username);
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_inventory(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<PlayerBody>,
) -> Empty {
    let mut panel = state.panel.write().await;
    must_be_online(server_mut(&mut panel, &server)?, &body.username)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn wipe(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<PlayerBody>,
) -> Empty {
    required("username", &body.username)?;
    let mut panel = state.panel.write().await;
    let s = server_mut(&mut panel, &server)?;
    s.whitelist.remove(&body.username);
    s.ops.remove(&body.username);
    Ok(StatusCode::NO_CONTENT)
}

async fn whisper(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<WhisperBody>,
) -> Empty {
    required("message", &body.message)?;
    let mut panel = state.panel.write().await;
    let s = server_mut(&mut panel, &server)?;
    must_be_online(s, &body.username)?;
    s.whispers.push((body.username, body.message));
    Ok(StatusCode::NO_CONTENT)
}

async fn kill(
    State(state): State<AppState>,
    Path(server): Path<String>,
    Json(body): Json<PlayerBody>,
) -> Empty {
    let mut panel = state.panel.write().await;
    must_be_online(server_mut(&mut panel, &server)?, &body.username)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- application API: locations ---

async fn list_locations(State(state): State<AppState>) -> Reply {
    let panel = state.panel.read().await;
    let data: Vec<Value> = panel.locations.values().map(location_document).collect();
    let total = data.len();
    Ok((
        StatusCode::OK,
        Json(json!({
            "object": "list",
            "data": data,
            "meta": {"pagination": {"total": total, "count": total, "current_page": 1, "total_pages": 1}},
        })),
    ))
}

async fn create_location(State(state): State<AppState>, Json(body): Json<NewLocation>) -> Reply {
    required("shortcode", &body.shortcode)?;
    let mut panel = state.panel.write().await;
    let id = panel.next_location_id;
    panel.next_location_id += 1;
    let location = Location {
        id,
        short: body.shortcode,
        long: body.description,
    };
    let document = location_document(&location);
    panel.locations.insert(id, location);
    Ok((StatusCode::CREATED, Json(document)))
}

async fn get_location(State(state): State<AppState>, Path(id): Path<u64>) -> Reply {
    let panel = state.panel.read().await;
    let location = panel.locations.get(&id).ok_or_else(PanelFailure::not_found)?;
    Ok((StatusCode::OK, Json(location_document(location))))
}

async fn edit_location(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<LocationChanges>,
) -> Reply {
    let mut panel = state.panel.write().await;
    let location = panel.locations.get_mut(&id).ok_or_else(PanelFailure::not_found)?;
    if let Some(short) = body.shortcode {
        location.short = short;
    }
    if let Some(long) = body.description {
        location.long = long;
    }
    Ok((StatusCode::OK, Json(location_document(location))))
}

async fn delete_location(State(state): State<AppState>, Path(id): Path<u64>) -> Empty {
    let mut panel = state.panel.write().await;
    panel
        .locations
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(PanelFailure::not_found)
}

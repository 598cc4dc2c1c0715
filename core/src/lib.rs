//! Blocking client for a game-server management panel's HTTP API.
//!
//! # Overview
//! Every resource call (ban a player, list locations, suspend a server)
//! becomes a `RequestSpec` handed to one shared `Dispatcher`, which builds
//! the URL and headers, performs a single round-trip through a `Transport`,
//! and normalizes the outcome into JSON or a `PanelError`.
//!
//! # Design
//! - `Dispatcher` holds only read-only state (base URL, API key, transport)
//!   and is safe to share between threads.
//! - Building requests and parsing responses are pure functions; I/O lives
//!   behind the `Transport` trait (`UreqTransport` by default).
//! - Resource catalogs are thin borrowers of the dispatcher with no logic
//!   beyond path and payload formatting.
//! - No retries, caching or pagination happen here.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod resources;
pub mod transport;
pub mod types;

pub use client::PanelClient;
pub use config::{ApiKey, ConfigError, PanelConfig};
pub use dispatch::{Dispatcher, RequestSpec};
pub use error::{PanelError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, UnsupportedMethod};
pub use resources::{ListOptions, Locations, MinecraftPlayers, MinecraftSoftware, ServerRef, Servers};
pub use transport::{Transport, UreqTransport, DEFAULT_BODY_LIMIT};
pub use types::{
    BuildLimits, CreateLocation, EditLocation, FeatureLimits, IpBan, IpTarget, PlayerSanction,
    PlayerTarget, ServerBuild, ServerDetails, TransferServer, Whisper, WhitelistStatus,
};

//! Entry point bundling one dispatcher with the resource catalogs.
//!
//! # Design
//! `PanelClient` owns the `Dispatcher`; the catalogs it hands out only borrow
//! it, so creating one per call is free and no catalog carries state of its own.

use crate::config::{ConfigError, PanelConfig};
use crate::dispatch::Dispatcher;
use crate::resources::{Locations, MinecraftPlayers, MinecraftSoftware, Servers};
use crate::transport::{Transport, UreqTransport};

#[derive(Debug)]
pub struct PanelClient<T = UreqTransport> {
    dispatcher: Dispatcher<T>,
}

impl PanelClient<UreqTransport> {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(config),
        }
    }

    /// Builds a client from `PANEL_URL` / `PANEL_API_KEY` (see `PanelConfig::from_env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(&PanelConfig::from_env()?))
    }
}

impl<T: Transport> PanelClient<T> {
    pub fn with_transport(config: &PanelConfig, transport: T) -> Self {
        Self {
            dispatcher: Dispatcher::with_transport(config, transport),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    pub fn minecraft_players(&self) -> MinecraftPlayers<'_, T> {
        MinecraftPlayers::new(&self.dispatcher)
    }

    pub fn minecraft_software(&self) -> MinecraftSoftware<'_, T> {
        MinecraftSoftware::new(&self.dispatcher)
    }

    pub fn locations(&self) -> Locations<'_, T> {
        Locations::new(&self.dispatcher)
    }

    pub fn servers(&self) -> Servers<'_, T> {
        Servers::new(&self.dispatcher)
    }
}

//! Application API: server lifecycle and server databases.

use std::fmt;

use serde_json::Value;

use crate::dispatch::{Dispatcher, RequestSpec};
use crate::error::PanelError;
use crate::http::HttpMethod;
use crate::resources::ListOptions;
use crate::transport::Transport;
use crate::types::{ServerBuild, ServerDetails, TransferServer};

const SERVERS: &str = "application/servers";

/// How to look a server up: by panel id or by the id an external billing
/// system assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerRef {
    Id(u64),
    External(String),
}

impl fmt::Display for ServerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerRef::Id(id) => write!(f, "{id}"),
            ServerRef::External(id) => write!(f, "external/{id}"),
        }
    }
}

pub struct Servers<'a, T> {
    dispatcher: &'a Dispatcher<T>,
}

impl<'a, T: Transport> Servers<'a, T> {
    pub fn new(dispatcher: &'a Dispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// GET application/servers
    pub fn list(&self, options: &ListOptions) -> Result<Value, PanelError> {
        self.dispatcher
            .dispatch(&options.apply(RequestSpec::get(SERVERS)))
    }

    /// GET application/servers/{id} or application/servers/external/{external_id}
    pub fn get(&self, server: &ServerRef, options: &ListOptions) -> Result<Value, PanelError> {
        if let ServerRef::External(id) = server {
            if id.is_empty() {
                return Err(PanelError::BadRequest("external server id is empty".to_string()));
            }
        }
        let spec = RequestSpec::get(format!("{SERVERS}/{server}"));
        self.dispatcher.dispatch(&options.apply(spec))
    }

    pub fn suspend(&self, server_id: u64) -> Result<Value, PanelError> {
        self.action(server_id, "suspend")
    }

    pub fn unsuspend(&self, server_id: u64) -> Result<Value, PanelError> {
        self.action(server_id, "unsuspend")
    }

    pub fn reinstall(&self, server_id: u64) -> Result<Value, PanelError> {
        self.action(server_id, "reinstall")
    }

    pub fn rebuild(&self, server_id: u64) -> Result<Value, PanelError> {
        self.action(server_id, "rebuild")
    }

    /// POST application/servers/{id}/transfer
    pub fn transfer(&self, server_id: u64, transfer: &TransferServer) -> Result<Value, PanelError> {
        let spec = RequestSpec::new(HttpMethod::Post, format!("{SERVERS}/{server_id}/transfer"))
            .with_payload(transfer)?;
        self.dispatcher.dispatch(&spec)
    }

    /// PATCH application/servers/{id}/details
    pub fn update_details(&self, server_id: u64, details: &ServerDetails) -> Result<Value, PanelError> {
        let spec = RequestSpec::new(HttpMethod::Patch, format!("{SERVERS}/{server_id}/details"))
            .with_payload(details)?;
        self.dispatcher.dispatch(&spec)
    }

    /// Changes limits and allocations. Unset fields are left as they are.
    ///
    /// PATCH application/servers/{id}/build
    pub fn update_build(&self, server_id: u64, build: &ServerBuild) -> Result<Value, PanelError> {
        let spec = RequestSpec::new(HttpMethod::Patch, format!("{SERVERS}/{server_id}/build"))
            .with_payload(build)?;
        self.dispatcher.dispatch(&spec)
    }

    /// Deletes from panel and daemon. With `force`, the panel carries on even
    /// if the daemon reports an error.
    pub fn delete(&self, server_id: u64, force: bool) -> Result<Value, PanelError> {
        let mut endpoint = format!("{SERVERS}/{server_id}");
        if force {
            endpoint.push_str("/force");
        }
        self.dispatcher
            .dispatch(&RequestSpec::new(HttpMethod::Delete, endpoint))
    }

    /// GET application/servers/{id}/databases
    pub fn list_databases(&self, server_id: u64, options: &ListOptions) -> Result<Value, PanelError> {
        let spec = RequestSpec::get(format!("{SERVERS}/{server_id}/databases"));
        self.dispatcher.dispatch(&options.apply(spec))
    }

    /// GET application/servers/{id}/databases/{database_id}
    pub fn get_database(
        &self,
        server_id: u64,
        database_id: u64,
        options: &ListOptions,
    ) -> Result<Value, PanelError> {
        let spec = RequestSpec::get(format!("{SERVERS}/{server_id}/databases/{database_id}"));
        self.dispatcher.dispatch(&options.apply(spec))
    }

    /// POST application/servers/{id}/databases
    pub fn create_database(&self, server_id: u64) -> Result<Value, PanelError> {
        self.action(server_id, "databases")
    }

    /// DELETE application/servers/{id}/databases/{database_id}
    pub fn delete_database(&self, server_id: u64, database_id: u64) -> Result<Value, PanelError> {
        self.dispatcher.dispatch(&RequestSpec::new(
            HttpMethod::Delete,
            format!("{SERVERS}/{server_id}/databases/{database_id}"),
        ))
    }

    /// POST application/servers/{id}/databases/{database_id}/reset-password
    pub fn reset_database_password(&self, server_id: u64, database_id: u64) -> Result<Value, PanelError> {
        self.action(server_id, &format!("databases/{database_id}/reset-password"))
    }

    // Body-less POST to a sub-resource of one server.
    fn action(&self, server_id: u64, suffix: &str) -> Result<Value, PanelError> {
        self.dispatcher.dispatch(&RequestSpec::new(
            HttpMethod::Post,
            format!("{SERVERS}/{server_id}/{suffix}"),
        ))
    }
}

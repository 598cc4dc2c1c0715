//! Resource catalogs layered on the dispatcher.
//!
//! Each catalog borrows a `Dispatcher` and only formats endpoint paths and
//! payloads; status handling and decoding stay in `dispatch`.

pub mod locations;
pub mod minecraft;
pub mod servers;

pub use locations::Locations;
pub use minecraft::{MinecraftPlayers, MinecraftSoftware};
pub use servers::{ServerRef, Servers};

use crate::dispatch::RequestSpec;

/// Relationship includes and extra query parameters for list and detail
/// endpoints of the application API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    includes: Vec<String>,
    params: Vec<(String, String)>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a relationship to `include=`, e.g. `nodes` or `allocations`.
    pub fn include(mut self, relation: impl Into<String>) -> Self {
        self.includes.push(relation.into());
        self
    }

    /// Adds a raw query parameter, e.g. `per_page=100`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub(crate) fn apply(&self, mut spec: RequestSpec) -> RequestSpec {
        if !self.includes.is_empty() {
            spec = spec.with_query("include", self.includes.join(","));
        }
        spec.with_query_pairs(self.params.iter().cloned())
    }
}

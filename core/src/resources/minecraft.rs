//! Minecraft player administration and software info for client-API servers.
//!
//! Server ids are the short identifiers shown in the panel (`abc123`), not
//! numeric application ids.

use serde_json::Value;

use crate::dispatch::{Dispatcher, RequestSpec};
use crate::error::PanelError;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{IpBan, IpTarget, PlayerSanction, PlayerTarget, Whisper, WhitelistStatus};

pub struct MinecraftSoftware<'a, T> {
    dispatcher: &'a Dispatcher<T>,
}

impl<'a, T: Transport> MinecraftSoftware<'a, T> {
    pub fn new(dispatcher: &'a Dispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// GET client/servers/{server_id}/minecraft-software
    pub fn get(&self, server_id: &str) -> Result<Value, PanelError> {
        self.dispatcher.dispatch(&RequestSpec::get(format!(
            "client/servers/{server_id}/minecraft-software"
        )))
    }
}

pub struct MinecraftPlayers<'a, T> {
    dispatcher: &'a Dispatcher<T>,
}

impl<'a, T: Transport> MinecraftPlayers<'a, T> {
    pub fn new(dispatcher: &'a Dispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// GET client/servers/{server_id}/mc-players
    pub fn list(&self, server_id: &str) -> Result<Value, PanelError> {
        self.dispatcher
            .dispatch(&RequestSpec::get(players_path(server_id, "")))
    }

    /// POST .../mc-players/whitelist/status
    pub fn set_whitelist_status(&self, server_id: &str, enabled: bool) -> Result<Value, PanelError> {
        self.send(
            HttpMethod::Post,
            server_id,
            "/whitelist/status",
            &WhitelistStatus { enabled },
        )
    }

    /// PUT .../mc-players/whitelist
    pub fn add_to_whitelist(&self, server_id: &str, username: &str) -> Result<Value, PanelError> {
        self.send(HttpMethod::Put, server_id, "/whitelist", &target(username))
    }

    /// DELETE .../mc-players/whitelist
    pub fn remove_from_whitelist(&self, server_id: &str, username: &str) -> Result<Value, PanelError> {
        self.send(HttpMethod::Delete, server_id, "/whitelist", &target(username))
    }

    /// PUT .../mc-players/op
    pub fn op(&self, server_id: &str, username: &str) -> Result<Value, PanelError> {
        self.send(HttpMethod::Put, server_id, "/op", &target(username))
    }

    /// DELETE .../mc-players/op
    pub fn deop(&self, server_id: &str, username: &str) -> Result<Value, PanelError> {
        self.send(HttpMethod::Delete, server_id, "/op", &target(username))
    }

    /// PUT .../mc-players/ban
    pub fn ban(&self, server_id: &str, username: &str, reason: Option<&str>) -> Result<Value, PanelError> {
        self.send(HttpMethod::Put, server_id, "/ban", &sanction(username, reason))
    }

    /// DELETE .../mc-players/ban
    pub fn unban(&self, server_id: &str, username: &str) -> Result<Value, PanelError> {
        self.send(HttpMethod::Delete, server_id, "/ban", &target(username))
    }

    /// PUT .../mc-players/ban-ip
    pub fn ban_ip(&self, server_id: &str, ip: &str, reason: Option<&str>) -> Result<Value, PanelError> {
        let payload = IpBan {
            ip: ip.to_string(),
            reason: non_empty(reason),
        };
        self.send(HttpMethod::Put, server_id, "/ban-ip", &payload)
    }

    /// Bans whatever address `username` is connected from.
    ///
    /// PUT .../mc-players/ban-ip-player
    pub fn ban_ip_player(
        &self,
        server_id: &str,
        username: &str,
        reason: Option<&str>,
    ) -> Result<Value, PanelError> {
        self.send(HttpMethod::Put, server_id, "/ban-ip-player", &sanction(username, reason))
    }

    /// DELETE .../mc-players/ban-ip
    pub fn unban_ip(&self, server_id: &str, ip: &str) -> Result<Value, PanelError> {
        let payload = IpTarget { ip: ip.to_string() };
        self.send(HttpMethod::Delete, server_id, "/ban-ip", &payload)
    }

    /// POST .../mc-players/kick
    pub fn kick(&self, server_id: &str, username: &str, reason: Option<&str>) -> Result<Value, PanelError> {
        self.send(HttpMethod::Post, server_id, "/kick", &sanction(username, reason))
    }

    /// POST .../mc-players/clear
    pub fn clear_inventory(&self, server_id: &str, username: &str) -> Result<Value, PanelError> {
        self.send(HttpMethod::Post, server_id, "/clear", &target(username))
    }

    /// POST .../mc-players/wipe
    pub fn wipe_player_data(&self, server_id: &str, username: &str) -> Result<Value, PanelError> {
        self.send(HttpMethod::Post, server_id, "/wipe", &target(username))
    }

    /// POST .../mc-players/whisper
    pub fn whisper(&self, server_id: &str, username: &str, message: &str) -> Result<Value, PanelError> {
        let payload = Whisper {
            username: username.to_string(),
            message: message.to_string(),
        };
        self.send(HttpMethod::Post, server_id, "/whisper", &payload)
    }

    /// POST .../mc-players/kill
    pub fn kill(&self, server_id: &str, username: &str) -> Result<Value, PanelError> {
        self.send(HttpMethod::Post, server_id, "/kill", &target(username))
    }

    fn send<B: serde::Serialize>(
        &self,
        method: HttpMethod,
        server_id: &str,
        suffix: &str,
        payload: &B,
    ) -> Result<Value, PanelError> {
        let spec = RequestSpec::new(method, players_path(server_id, suffix)).with_payload(payload)?;
        self.dispatcher.dispatch(&spec)
    }
}

fn players_path(server_id: &str, suffix: &str) -> String {
    format!("client/servers/{server_id}/mc-players{suffix}")
}

fn target(username: &str) -> PlayerTarget {
    PlayerTarget {
        username: username.to_string(),
    }
}

fn sanction(username: &str, reason: Option<&str>) -> PlayerSanction {
    PlayerSanction {
        username: username.to_string(),
        reason: non_empty(reason),
    }
}

// An empty reason is treated as no reason at all.
fn non_empty(reason: Option<&str>) -> Option<String> {
    reason.filter(|r| !r.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::{body_of, dispatcher, RecordingTransport};
    use serde_json::json;

    const BASE: &str = "https://panel.example.com/api/client/servers/abc123/mc-players";

    #[test]
    fn software_info_is_a_plain_get() {
        let d = dispatcher(RecordingTransport::default().respond(200, r#"{"software":"paper"}"#));
        let value = MinecraftSoftware::new(&d).get("abc123").unwrap();
        assert_eq!(value["software"], "paper");
        let sent = d.transport().last();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(
            sent.url,
            "https://panel.example.com/api/client/servers/abc123/minecraft-software"
        );
        assert!(sent.body.is_none());
    }

    #[test]
    fn list_players_has_no_body() {
        let d = dispatcher(RecordingTransport::default().respond(200, r#"{"online":[]}"#));
        MinecraftPlayers::new(&d).list("abc123").unwrap();
        let sent = d.transport().last();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.url, BASE);
        assert!(sent.body.is_none());
    }

    #[test]
    fn whitelist_status_posts_flag() {
        let d = dispatcher(RecordingTransport::default());
        let value = MinecraftPlayers::new(&d)
            .set_whitelist_status("abc123", true)
            .unwrap();
        assert_eq!(value, json!({}));
        let sent = d.transport().last();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.url, format!("{BASE}/whitelist/status"));
        assert_eq!(body_of(&sent), json!({"enabled": true}));
    }

    #[test]
    fn removal_endpoints_send_delete_with_body() {
        let d = dispatcher(RecordingTransport::default());
        let players = MinecraftPlayers::new(&d);
        players.remove_from_whitelist("abc123", "alex").unwrap();
        players.deop("abc123", "alex").unwrap();
        players.unban("abc123", "alex").unwrap();
        players.unban_ip("abc123", "10.0.0.7").unwrap();

        let sent = d.transport().sent();
        let expected = [
            ("/whitelist", json!({"username": "alex"})),
            ("/op", json!({"username": "alex"})),
            ("/ban", json!({"username": "alex"})),
            ("/ban-ip", json!({"ip": "10.0.0.7"})),
        ];
        assert_eq!(sent.len(), expected.len());
        for (req, (suffix, body)) in sent.iter().zip(expected) {
            assert_eq!(req.method, HttpMethod::Delete);
            assert_eq!(req.url, format!("{BASE}{suffix}"));
            assert_eq!(body_of(req), body);
        }
    }

    #[test]
    fn grants_use_put() {
        let d = dispatcher(RecordingTransport::default());
        let players = MinecraftPlayers::new(&d);
        players.add_to_whitelist("abc123", "steve").unwrap();
        players.op("abc123", "steve").unwrap();
        let sent = d.transport().sent();
        assert_eq!(sent[0].method, HttpMethod::Put);
        assert_eq!(sent[0].url, format!("{BASE}/whitelist"));
        assert_eq!(sent[1].method, HttpMethod::Put);
        assert_eq!(sent[1].url, format!("{BASE}/op"));
    }

    #[test]
    fn ban_includes_reason_only_when_given() {
        let d = dispatcher(RecordingTransport::default());
        let players = MinecraftPlayers::new(&d);
        players.ban("abc123", "steve", Some("griefing")).unwrap();
        players.ban("abc123", "steve", None).unwrap();
        players.ban("abc123", "steve", Some("")).unwrap();

        let sent = d.transport().sent();
        assert_eq!(sent[0].url, format!("{BASE}/ban"));
        assert_eq!(body_of(&sent[0]), json!({"username": "steve", "reason": "griefing"}));
        assert_eq!(body_of(&sent[1]), json!({"username": "steve"}));
        assert_eq!(body_of(&sent[2]), json!({"username": "steve"}));
    }

    #[test]
    fn ip_bans() {
        let d = dispatcher(RecordingTransport::default());
        let players = MinecraftPlayers::new(&d);
        players.ban_ip("abc123", "10.0.0.7", Some("bots")).unwrap();
        players.ban_ip_player("abc123", "steve", None).unwrap();

        let sent = d.transport().sent();
        assert_eq!(sent[0].method, HttpMethod::Put);
        assert_eq!(sent[0].url, format!("{BASE}/ban-ip"));
        assert_eq!(body_of(&sent[0]), json!({"ip": "10.0.0.7", "reason": "bots"}));
        assert_eq!(sent[1].url, format!("{BASE}/ban-ip-player"));
        assert_eq!(body_of(&sent[1]), json!({"username": "steve"}));
    }

    #[test]
    fn player_actions_post_to_their_endpoints() {
        let d = dispatcher(RecordingTransport::default());
        let players = MinecraftPlayers::new(&d);
        players.kick("abc123", "steve", Some("afk")).unwrap();
        players.clear_inventory("abc123", "steve").unwrap();
        players.wipe_player_data("abc123", "steve").unwrap();
        players.whisper("abc123", "steve", "hello").unwrap();
        players.kill("abc123", "steve").unwrap();

        let sent = d.transport().sent();
        let suffixes: Vec<&str> = sent
            .iter()
            .map(|r| r.url.strip_prefix(BASE).unwrap())
            .collect();
        assert_eq!(suffixes, ["/kick", "/clear", "/wipe", "/whisper", "/kill"]);
        assert!(sent.iter().all(|r| r.method == HttpMethod::Post));
        assert_eq!(body_of(&sent[0]), json!({"username": "steve", "reason": "afk"}));
        assert_eq!(body_of(&sent[3]), json!({"username": "steve", "message": "hello"}));
    }

    #[test]
    fn panel_rejection_surfaces_unchanged() {
        let d = dispatcher(
            RecordingTransport::default().respond(404, r#"{"error":"server not found"}"#),
        );
        let err = MinecraftPlayers::new(&d)
            .ban("missing", "steve", None)
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

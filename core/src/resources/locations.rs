//! Application API: node locations.

use serde_json::Value;

use crate::dispatch::{Dispatcher, RequestSpec};
use crate::error::PanelError;
use crate::http::HttpMethod;
use crate::resources::ListOptions;
use crate::transport::Transport;
use crate::types::{CreateLocation, EditLocation};

const LOCATIONS: &str = "application/locations";

pub struct Locations<'a, T> {
    dispatcher: &'a Dispatcher<T>,
}

impl<'a, T: Transport> Locations<'a, T> {
    pub fn new(dispatcher: &'a Dispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// GET application/locations
    pub fn list(&self, options: &ListOptions) -> Result<Value, PanelError> {
        self.dispatcher
            .dispatch(&options.apply(RequestSpec::get(LOCATIONS)))
    }

    /// GET application/locations/{id}
    pub fn get(&self, location_id: u64, options: &ListOptions) -> Result<Value, PanelError> {
        let spec = RequestSpec::get(format!("{LOCATIONS}/{location_id}"));
        self.dispatcher.dispatch(&options.apply(spec))
    }

    /// POST application/locations
    pub fn create(&self, shortcode: &str, description: &str) -> Result<Value, PanelError> {
        let payload = CreateLocation {
            shortcode: shortcode.to_string(),
            description: description.to_string(),
        };
        let spec = RequestSpec::new(HttpMethod::Post, LOCATIONS).with_payload(&payload)?;
        self.dispatcher.dispatch(&spec)
    }

    /// Changes the shortcode, the description, or both.
    ///
    /// PATCH application/locations/{id}
    pub fn edit(&self, location_id: u64, changes: &EditLocation) -> Result<Value, PanelError> {
        if changes.is_empty() {
            return Err(PanelError::BadRequest(
                "edit_location needs a shortcode or a description".to_string(),
            ));
        }
        let spec = RequestSpec::new(HttpMethod::Patch, format!("{LOCATIONS}/{location_id}"))
            .with_payload(changes)?;
        self.dispatcher.dispatch(&spec)
    }

    /// DELETE application/locations/{id}
    pub fn delete(&self, location_id: u64) -> Result<Value, PanelError> {
        self.dispatcher.dispatch(&RequestSpec::new(
            HttpMethod::Delete,
            format!("{LOCATIONS}/{location_id}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::{body_of, dispatcher, RecordingTransport};
    use serde_json::json;

    #[test]
    fn list_passes_includes_through() {
        let d = dispatcher(RecordingTransport::default().respond(200, r#"{"object":"list","data":[]}"#));
        let value = Locations::new(&d)
            .list(&ListOptions::new().include("nodes").param("per_page", "300"))
            .unwrap();
        assert_eq!(value["object"], "list");
        assert_eq!(
            d.transport().last().url,
            "https://panel.example.com/api/application/locations?include=nodes&per_page=300"
        );
    }

    #[test]
    fn create_posts_shortcode_and_description() {
        let d = dispatcher(RecordingTransport::default().respond(201, r#"{"attributes":{"id":4}}"#));
        let value = Locations::new(&d).create("eu.fra", "Frankfurt").unwrap();
        assert_eq!(value["attributes"]["id"], 4);
        let sent = d.transport().last();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(body_of(&sent), json!({"shortcode": "eu.fra", "description": "Frankfurt"}));
    }

    #[test]
    fn edit_patches_present_fields() {
        let d = dispatcher(RecordingTransport::default().respond(200, "{}"));
        let changes = EditLocation {
            shortcode: Some("eu.fra2".to_string()),
            description: None,
        };
        Locations::new(&d).edit(4, &changes).unwrap();
        let sent = d.transport().last();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.url, "https://panel.example.com/api/application/locations/4");
        assert_eq!(body_of(&sent), json!({"shortcode": "eu.fra2"}));
    }

    #[test]
    fn edit_without_changes_is_rejected_locally() {
        let d = dispatcher(RecordingTransport::default());
        let err = Locations::new(&d)
            .edit(4, &EditLocation::default())
            .unwrap_err();
        assert!(matches!(err, PanelError::BadRequest(_)));
        assert!(d.transport().sent().is_empty());
    }

    #[test]
    fn edit_with_only_blank_fields_is_rejected_locally() {
        let d = dispatcher(RecordingTransport::default());
        let changes = EditLocation {
            shortcode: Some(String::new()),
            ..Default::default()
        };
        let err = Locations::new(&d).edit(1, &changes).unwrap_err();
        assert!(matches!(err, PanelError::BadRequest(_)));
        assert!(d.transport().sent().is_empty());
    }

    #[test]
    fn edit_drops_blank_field_next_to_real_change() {
        let d = dispatcher(RecordingTransport::default().respond(200, "{}"));
        let changes = EditLocation {
            shortcode: Some(String::new()),
            description: Some("Frankfurt DC2".to_string()),
        };
        Locations::new(&d).edit(4, &changes).unwrap();
        assert_eq!(body_of(&d.transport().last()), json!({"description": "Frankfurt DC2"}));
    }

    #[test]
    fn delete_has_no_body() {
        let d = dispatcher(RecordingTransport::default());
        Locations::new(&d).delete(4).unwrap();
        let sent = d.transport().last();
        assert_eq!(sent.method, HttpMethod::Delete);
        assert!(sent.body.is_none());
    }
}

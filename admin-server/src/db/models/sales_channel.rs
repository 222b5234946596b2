//! Sales Channel Model

use super::serde_helpers::{self, parse_record_id};
use super::user::USER_TABLE;
use crate::utils::time::to_rfc3339;
use crate::utils::validation::{MAX_DOMAIN_LEN, MAX_NAME_LEN, check_required_text, is_fqdn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use shared::{FieldErrors, SalesChannelType};
use surrealdb::RecordId;

pub const SALES_CHANNEL_TABLE: &str = "sales_channel";

/// Free-form integration blobs, stored as-is
pub const BLOB_FIELDS: [&str; 5] = ["siteData", "emailTemplates", "easyShip", "facebook", "sendGrid"];

/// Sales channel record as stored in the `sales_channel` table
///
/// `type` is a reserved word in SurrealQL, so the kind is stored as
/// `channel_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesChannel {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    pub domain: String,
    pub name: String,
    pub channel_type: SalesChannelType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_templates: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easy_ship: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_grid: Option<Value>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Client view of a sales channel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesChannelView {
    pub id: String,
    pub owner: String,
    pub domain: String,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: SalesChannelType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_templates: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub easy_ship: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_grid: Option<Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl SalesChannel {
    pub fn view(&self) -> SalesChannelView {
        SalesChannelView {
            id: self.id.to_string(),
            owner: self.owner.to_string(),
            domain: self.domain.clone(),
            name: self.name.clone(),
            channel_type: self.channel_type,
            site_data: self.site_data.clone(),
            email_templates: self.email_templates.clone(),
            easy_ship: self.easy_ship.clone(),
            facebook: self.facebook.clone(),
            send_grid: self.send_grid.clone(),
            created_at: to_rfc3339(self.created_at),
            updated_at: to_rfc3339(self.updated_at),
        }
    }

    pub fn is_owned_by(&self, user: &RecordId) -> bool {
        &self.owner == user
    }

    /// The editable part of the record in wire form
    pub fn editable_json(&self) -> Value {
        let mut doc = json!({
            "owner": self.owner.to_string(),
            "domain": self.domain,
            "name": self.name,
            "type": self.channel_type,
        });
        let blobs = [
            &self.site_data,
            &self.email_templates,
            &self.easy_ship,
            &self.facebook,
            &self.send_grid,
        ];
        for (field, value) in BLOB_FIELDS.iter().zip(blobs) {
            if let Some(value) = value {
                doc[*field] = value.clone();
            }
        }
        doc
    }
}

/// A validated sales channel document
#[derive(Debug, Clone)]
pub struct SalesChannelDraft {
    pub owner: RecordId,
    pub domain: String,
    pub name: String,
    pub channel_type: SalesChannelType,
    pub site_data: Option<Value>,
    pub email_templates: Option<Value>,
    pub easy_ship: Option<Value>,
    pub facebook: Option<Value>,
    pub send_grid: Option<Value>,
}

impl SalesChannelDraft {
    pub fn from_json(doc: &Value) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let owner = match doc.get("owner").and_then(Value::as_str) {
            Some(raw) => {
                let parsed = parse_record_id(USER_TABLE, raw);
                if parsed.is_none() {
                    errors.add("owner", "owner is not a valid user id");
                }
                parsed
            }
            None => {
                errors.add("owner", "owner is required");
                None
            }
        };

        let domain = doc
            .get("domain")
            .and_then(Value::as_str)
            .map(|d| d.trim().trim_end_matches('.').to_lowercase())
            .unwrap_or_default();
        check_required_text(&mut errors, "domain", &domain, MAX_DOMAIN_LEN);
        if !domain.is_empty() && !is_fqdn(&domain) {
            errors.add("domain", "domain must be a fully-qualified domain name");
        }

        let name = doc
            .get("name")
            .and_then(Value::as_str)
            .map(|n| n.trim().to_string())
            .unwrap_or_default();
        check_required_text(&mut errors, "name", &name, MAX_NAME_LEN);

        let channel_type = match doc.get("type").and_then(Value::as_str) {
            Some(raw) => match raw.parse::<SalesChannelType>() {
                Ok(t) => Some(t),
                Err(message) => {
                    errors.add("type", message);
                    None
                }
            },
            None => {
                errors.add("type", "type is required");
                None
            }
        };

        let mut blobs: Map<String, Value> = Map::new();
        for field in BLOB_FIELDS {
            match doc.get(field) {
                None | Some(Value::Null) => {}
                Some(value @ Value::Object(_)) | Some(value @ Value::Array(_)) => {
                    blobs.insert(field.to_string(), value.clone());
                }
                Some(_) => errors.add(field, format!("{field} must be an object")),
            }
        }

        errors.into_result()?;

        let (Some(owner), Some(channel_type)) = (owner, channel_type) else {
            let mut errors = FieldErrors::new();
            errors.add("owner", "owner is required");
            return Err(errors);
        };

        Ok(Self {
            owner,
            domain,
            name,
            channel_type,
            site_data: blobs.remove("siteData"),
            email_templates: blobs.remove("emailTemplates"),
            easy_ship: blobs.remove("easyShip"),
            facebook: blobs.remove("facebook"),
            send_grid: blobs.remove("sendGrid"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Value {
        json!({
            "owner": "user:admin1",
            "domain": " Shop.Example.COM ",
            "name": "Shop",
            "type": "ecommerce",
            "siteData": { "title": "Shop" }
        })
    }

    #[test]
    fn test_draft_normalizes_domain() {
        let draft = SalesChannelDraft::from_json(&doc()).unwrap();
        assert_eq!(draft.domain, "shop.example.com");
        assert_eq!(draft.owner.table(), "user");
        assert_eq!(draft.channel_type, SalesChannelType::Ecommerce);
        assert_eq!(draft.site_data, Some(json!({ "title": "Shop" })));
        assert!(draft.facebook.is_none());
    }

    #[test]
    fn test_draft_rejects_bad_values() {
        let errors = SalesChannelDraft::from_json(&json!({
            "owner": "sales_channel:x",
            "domain": "localhost",
            "type": "marketplace",
            "easyShip": "yes"
        }))
        .unwrap_err();
        assert!(errors.contains("owner"));
        assert!(errors.contains("domain"));
        assert!(errors.contains("name"));
        assert!(errors.contains("type"));
        assert!(errors.contains("easyShip"));
    }

    #[test]
    fn test_view_uses_type_key() {
        let channel = SalesChannel {
            id: RecordId::from_table_key(SALES_CHANNEL_TABLE, "s1"),
            owner: RecordId::from_table_key(USER_TABLE, "u1"),
            domain: "shop.example.com".into(),
            name: "Shop".into(),
            channel_type: SalesChannelType::Ecommerce,
            site_data: None,
            email_templates: None,
            easy_ship: None,
            facebook: None,
            send_grid: Some(json!({ "apiKey": "k" })),
            created_at: 0,
            updated_at: 0,
        };
        let view = serde_json::to_value(channel.view()).unwrap();
        assert_eq!(view["type"], "ecommerce");
        assert_eq!(view["owner"], "user:u1");
        assert_eq!(view["sendGrid"]["apiKey"], "k");
        assert!(view.get("siteData").is_none());

        let editable = channel.editable_json();
        assert_eq!(editable["type"], "ecommerce");
        assert_eq!(editable["sendGrid"]["apiKey"], "k");
    }
}

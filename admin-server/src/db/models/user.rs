//! User Model

use super::serde_helpers::{self, parse_record_id};
use crate::utils::time::to_rfc3339;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, check_optional_text,
    check_password, check_required_text, is_valid_email, normalize_email,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use shared::{FieldErrors, Role};
use surrealdb::RecordId;

pub const USER_TABLE: &str = "user";

/// User ID type
pub type UserId = RecordId;

/// User record as stored in the `user` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(with = "serde_helpers::record_id")]
    pub id: UserId,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub hash_pass: String,
    pub role: Role,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub services: Services,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub sales_channel: Option<RecordId>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Personal data, stored and exchanged in camelCase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delivery: Vec<DeliveryAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<BillingAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Linked third-party identities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Services {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

/// Client-safe projection of a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub created_at: String,
    pub role: Role,
    pub profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_channel: Option<String>,
}

impl User {
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.to_string(),
            email: self.email.clone(),
            created_at: to_rfc3339(self.created_at),
            role: self.role,
            profile: self.profile.clone(),
            sales_channel: self.sales_channel.as_ref().map(ToString::to_string),
        }
    }

    /// The editable part of the record in wire form, used as the base of a
    /// deep-merge update
    pub fn editable_json(&self) -> Value {
        let mut doc = json!({
            "email": self.email,
            "role": self.role,
            "profile": self.profile,
            "services": self.services,
        });
        if let Some(channel) = &self.sales_channel {
            doc["salesChannel"] = Value::String(channel.to_string());
        }
        doc
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

/// Gravatar identicon URL for an email address
pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!("https://gravatar.com/avatar/{}?d=identicon", hex::encode(digest))
}

/// Replace an absent or gravatar-hosted picture with the email's identicon
pub fn apply_gravatar(profile: &mut Profile, email: &str) {
    let keep = profile
        .picture
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty() && !p.starts_with("https://gravatar.com"));
    if !keep {
        profile.picture = Some(gravatar_url(email));
    }
}

/// A validated user document, ready to be written
///
/// Built from the wire JSON of a create payload, or of an existing record
/// merged with an update payload.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub email: String,
    /// Plaintext, present when the password is being set
    pub password: Option<String>,
    pub role: Role,
    pub profile: Profile,
    pub services: Services,
    pub sales_channel: Option<RecordId>,
}

impl UserDraft {
    /// Parse and validate a wire document
    ///
    /// `require_password` is set on create; on update a password is only
    /// validated when the payload carries one.
    pub fn from_json(doc: &Value, require_password: bool) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = match doc.get("email") {
            Some(Value::String(raw)) => {
                let email = normalize_email(raw);
                if email.is_empty() {
                    errors.add("email", "email is required");
                } else if !is_valid_email(&email) {
                    errors.add("email", "email is not a valid email address");
                }
                email
            }
            None | Some(Value::Null) => {
                errors.add("email", "email is required");
                String::new()
            }
            Some(_) => {
                errors.add("email", "email must be a string");
                String::new()
            }
        };

        let password = match doc.get("password") {
            Some(Value::String(raw)) => {
                check_password(&mut errors, "password", raw);
                Some(raw.clone())
            }
            None | Some(Value::Null) => {
                if require_password {
                    errors.add("password", "password is required");
                }
                None
            }
            Some(_) => {
                errors.add("password", "password must be a string");
                None
            }
        };

        let role = match doc.get("role").and_then(Value::as_str) {
            Some(raw) => match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(message) => {
                    errors.add("role", message);
                    None
                }
            },
            None => {
                errors.add("role", "role is required");
                None
            }
        };

        let mut profile = match doc.get("profile") {
            None | Some(Value::Null) => Profile::default(),
            Some(value) => serde_json::from_value::<Profile>(value.clone()).unwrap_or_else(|e| {
                errors.add("profile", format!("profile is invalid: {e}"));
                Profile::default()
            }),
        };
        profile.first_name = profile.first_name.trim().to_string();
        profile.last_name = profile.last_name.trim().to_string();
        let mut profile_errors = FieldErrors::new();
        check_profile(&mut profile_errors, &profile);
        errors.extend_prefixed("profile", profile_errors);

        let services = match doc.get("services") {
            None | Some(Value::Null) => Services::default(),
            Some(value) => serde_json::from_value::<Services>(value.clone()).unwrap_or_else(|e| {
                errors.add("services", format!("services is invalid: {e}"));
                Services::default()
            }),
        };

        let sales_channel = match doc.get("salesChannel") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => {
                let parsed = parse_record_id(super::sales_channel::SALES_CHANNEL_TABLE, raw);
                if parsed.is_none() {
                    errors.add("salesChannel", "salesChannel is not a valid sales channel id");
                }
                parsed
            }
            Some(_) => {
                errors.add("salesChannel", "salesChannel must be a string");
                None
            }
        };

        if role == Some(Role::Customer) && sales_channel.is_none() && !errors.contains("salesChannel")
        {
            errors.add("salesChannel", "salesChannel is required for customers");
        }

        errors.into_result()?;

        // role is Some here: a missing or bad role records an error above
        let Some(role) = role else {
            let mut errors = FieldErrors::new();
            errors.add("role", "role is required");
            return Err(errors);
        };

        apply_gravatar(&mut profile, &email);

        Ok(Self {
            email,
            password,
            role,
            profile,
            services,
            sales_channel,
        })
    }
}

fn check_profile(errors: &mut FieldErrors, profile: &Profile) {
    check_required_text(errors, "firstName", &profile.first_name, MAX_NAME_LEN);
    check_required_text(errors, "lastName", &profile.last_name, MAX_NAME_LEN);
    check_optional_text(errors, "phone", &profile.phone, MAX_SHORT_TEXT_LEN);
    check_optional_text(errors, "dob", &profile.dob, MAX_SHORT_TEXT_LEN);
    check_optional_text(errors, "picture", &profile.picture, MAX_URL_LEN);

    for (i, address) in profile.delivery.iter().enumerate() {
        let mut nested = FieldErrors::new();
        check_required_text(&mut nested, "firstName", &address.first_name, MAX_NAME_LEN);
        check_required_text(&mut nested, "lastName", &address.last_name, MAX_NAME_LEN);
        check_optional_text(&mut nested, "address", &address.address, MAX_ADDRESS_LEN);
        check_optional_text(&mut nested, "postalCode", &address.postal_code, MAX_SHORT_TEXT_LEN);
        check_optional_text(&mut nested, "country", &address.country, MAX_SHORT_TEXT_LEN);
        errors.extend_prefixed(&format!("delivery.{i}"), nested);
    }

    if let Some(billing) = &profile.billing {
        let mut nested = FieldErrors::new();
        check_optional_text(&mut nested, "address", &billing.address, MAX_ADDRESS_LEN);
        check_optional_text(&mut nested, "postalCode", &billing.postal_code, MAX_SHORT_TEXT_LEN);
        check_optional_text(&mut nested, "country", &billing.country, MAX_SHORT_TEXT_LEN);
        errors.extend_prefixed("billing", nested);
    }
}

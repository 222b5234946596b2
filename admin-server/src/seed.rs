//! Development bootstrap data
//!
//! Creates the platform administrator, two store admins and one storefront
//! per store admin. Existing records are left untouched, so running it on
//! every start is safe.

use serde_json::json;
use shared::Role;

use crate::core::ServerState;
use crate::db::models::{SalesChannelDraft, User, UserDraft};
use crate::utils::{AppError, AppResult};

const SEED_PASSWORD: &str = "adminadmin";

struct SeedAdmin {
    email: &'static str,
    role: Role,
    first_name: &'static str,
    last_name: &'static str,
    /// Storefront owned by this admin
    channel: Option<(&'static str, &'static str)>,
}

const SEED_ADMINS: &[SeedAdmin] = &[
    SeedAdmin {
        email: "super_admin@example.com",
        role: Role::SuperAdmin,
        first_name: "Super",
        last_name: "Admin",
        channel: None,
    },
    SeedAdmin {
        email: "store_admin1@example.com",
        role: Role::StoreAdmin,
        first_name: "Store",
        last_name: "Admin 1",
        channel: Some(("storeadmin1.example.com", "Store Admin 1 Ecommerce")),
    },
    SeedAdmin {
        email: "store_admin2@example.com",
        role: Role::StoreAdmin,
        first_name: "Store",
        last_name: "Admin 2",
        channel: Some(("storeadmin2.example.com", "Store Admin 2 Ecommerce")),
    },
];

/// Ensure the development accounts and storefronts exist
pub async fn seed_development_data(state: &ServerState) -> AppResult<()> {
    for admin in SEED_ADMINS {
        let user = ensure_user(state, admin).await?;
        if let Some((domain, name)) = admin.channel {
            ensure_channel(state, &user, domain, name).await?;
        }
    }
    tracing::info!(accounts = SEED_ADMINS.len(), "Development data seeded");
    Ok(())
}

async fn ensure_user(state: &ServerState, admin: &SeedAdmin) -> AppResult<User> {
    if let Some(user) = state.users().find_by_email(admin.email).await? {
        return Ok(user);
    }
    let draft = UserDraft::from_json(
        &json!({
            "email": admin.email,
            "password": SEED_PASSWORD,
            "role": admin.role,
            "profile": {
                "firstName": admin.first_name,
                "lastName": admin.last_name,
            },
        }),
        true,
    )?;
    let user = state.users().create(draft).await?;
    tracing::info!(email = admin.email, role = %admin.role, "Seeded user");
    Ok(user)
}

async fn ensure_channel(state: &ServerState, owner: &User, domain: &str, name: &str) -> AppResult<()> {
    if state.sales_channels().find_by_domain(domain).await?.is_some() {
        return Ok(());
    }
    let draft = SalesChannelDraft::from_json(&json!({
        "owner": owner.id.to_string(),
        "domain": domain,
        "name": name,
        "type": "ecommerce",
    }))
    .map_err(|errors| {
        AppError::invalid_fields(errors).with_detail("seed", domain.to_string())
    })?;
    state.sales_channels().create(draft).await?;
    tracing::info!(domain, "Seeded sales channel");
    Ok(())
}

//! Wire enums shared by server and clients

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access level of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform-wide administrator
    SuperAdmin,
    /// Owns one or more sales channels
    StoreAdmin,
    /// Shopper bound to a single sales channel
    Customer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::SuperAdmin, Role::StoreAdmin, Role::Customer];

    /// Roles that may sign in on the management domain
    pub const ADMINS: [Role; 2] = [Role::SuperAdmin, Role::StoreAdmin];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::StoreAdmin => "store_admin",
            Role::Customer => "customer",
        }
    }

    pub fn is_admin(&self) -> bool {
        Self::ADMINS.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("`{s}` is not a valid role"))
    }
}

/// Kind of storefront a sales channel runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesChannelType {
    Ecommerce,
}

impl SalesChannelType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SalesChannelType::Ecommerce => "ecommerce",
        }
    }
}

impl fmt::Display for SalesChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalesChannelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ecommerce" => Ok(SalesChannelType::Ecommerce),
            other => Err(format!("`{other}` is not a valid sales channel type")),
        }
    }
}

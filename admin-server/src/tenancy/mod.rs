//! Domain-based multi-tenancy
//!
//! Every request is bound to a tenant derived from its `Host` header:
//!
//! | Host | Scope | Visible users |
//! |------|-------|---------------|
//! | management domain | [`TenantScope::Manage`] | `super_admin`, `store_admin` |
//! | any other domain | [`TenantScope::Storefront`] | `customer` of the ecommerce channel on that domain |
//!
//! The scope is applied whenever an identity is resolved: JWT
//! authentication, password sign-in, Facebook sign-in and password reset
//! lookups.

pub mod middleware;

pub use middleware::resolve_tenant;

/// Which slice of the user base a request may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantScope {
    /// Management console: administrators only
    Manage,
    /// Storefront: customers of the sales channel serving `domain`
    Storefront { domain: String },
}

impl TenantScope {
    pub fn resolve(domain: &str, manage_domain: &str) -> Self {
        if domain.eq_ignore_ascii_case(manage_domain) {
            TenantScope::Manage
        } else {
            TenantScope::Storefront {
                domain: domain.to_lowercase(),
            }
        }
    }

    /// SurrealQL condition restricting `user` rows to this scope
    ///
    /// Storefront clauses reference `$tenant_domain`; bind it with
    /// [`TenantScope::domain_binding`].
    pub fn user_clause(&self) -> &'static str {
        match self {
            TenantScope::Manage => "role IN ['super_admin', 'store_admin']",
            TenantScope::Storefront { .. } => {
                "role = 'customer' AND sales_channel.domain = $tenant_domain AND sales_channel.channel_type = 'ecommerce'"
            }
        }
    }

    /// Value bound to `$tenant_domain` (empty for the management scope)
    pub fn domain_binding(&self) -> (&'static str, String) {
        match self {
            TenantScope::Manage => ("tenant_domain", String::new()),
            TenantScope::Storefront { domain } => ("tenant_domain", domain.clone()),
        }
    }

    pub fn is_manage(&self) -> bool {
        matches!(self, TenantScope::Manage)
    }
}

/// Tenant of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    /// Request domain, lower-cased, without port
    pub domain: String,
    pub scope: TenantScope,
}

impl Tenant {
    pub fn from_domain(domain: &str, manage_domain: &str) -> Self {
        Self {
            domain: domain.to_lowercase(),
            scope: TenantScope::resolve(domain, manage_domain),
        }
    }
}

/// Domain part of a `Host` header value
///
/// Takes the first value of a comma-joined header, strips the `:port`
/// suffix (IPv6 literals keep their brackets) and lower-cases the result.
/// Returns `None` for an empty host.
pub fn domain_from_host(host: &str) -> Option<String> {
    let first = host.split(',').next()?.trim();
    if first.is_empty() {
        return None;
    }
    let domain = if let Some(rest) = first.strip_prefix('[') {
        // [::1]:8080
        match rest.split_once(']') {
            Some((addr, _)) => format!("[{addr}]"),
            None => first.to_string(),
        }
    } else {
        match first.rsplit_once(':') {
            Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name.to_string(),
            _ => first.to_string(),
        }
    };
    let domain = domain.trim_end_matches('.').to_lowercase();
    (!domain.is_empty()).then_some(domain)
}

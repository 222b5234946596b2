//! List query parameters: `q`, `page`, `limit`, `sort`, `fields`
//!
//! Ordering runs in the database against a whitelist of sortable columns.
//! Keyword filtering and paging run in memory on the ordered result:
//! SurrealDB drops rows when `WHERE` over an indexed field is combined with
//! `ORDER BY` and `LIMIT`, so neither is pushed into the query.

use serde::Deserialize;
use shared::{AppError, FieldErrors};

pub const MAX_LIMIT: usize = 100;

/// Raw query string of a list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub fields: Option<String>,
}

/// Sortable field: wire name and stored column
pub type SortField = (&'static str, &'static str);

/// Validated list options
#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    /// Lower-cased keyword
    pub keyword: Option<String>,
    /// `(page, limit)`, page starting at 1
    pub paging: Option<(usize, usize)>,
    /// `ORDER BY` clause body built from whitelisted columns
    pub order_by: String,
    /// Projection of the view, empty for all fields
    pub fields: Vec<String>,
}

impl ListQuery {
    /// Validate against the sortable fields of a resource
    pub fn parse(&self, sortable: &[SortField]) -> Result<ListOptions, AppError> {
        let mut errors = FieldErrors::new();

        let keyword = self
            .q
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let page = parse_positive(&mut errors, "page", self.page.as_deref());
        let limit = parse_positive(&mut errors, "limit", self.limit.as_deref());
        if let Some(limit) = limit
            && limit > MAX_LIMIT
        {
            errors.add("limit", format!("limit must be between 1 and {MAX_LIMIT}"));
        }
        let paging = match (page, limit) {
            (Some(page), Some(limit)) => Some((page, limit)),
            (None, None) => None,
            _ => {
                if !errors.contains("page") && !errors.contains("limit") {
                    errors.add("page", "page and limit must be given together");
                }
                None
            }
        };

        let order_by = match self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(sort) => build_order_by(&mut errors, sort, sortable),
            None => "created_at DESC".to_string(),
        };

        let fields = self
            .fields
            .as_deref()
            .map(|f| {
                f.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        if !errors.is_empty() {
            return Err(AppError::invalid_fields(errors));
        }

        Ok(ListOptions {
            keyword,
            paging,
            order_by,
            fields,
        })
    }
}

fn parse_positive(errors: &mut FieldErrors, field: &str, raw: Option<&str>) -> Option<usize> {
    let raw = raw?.trim();
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => {
            errors.add(field, format!("{field} must be a positive integer"));
            None
        }
    }
}

fn build_order_by(errors: &mut FieldErrors, sort: &str, sortable: &[SortField]) -> String {
    let mut clauses = Vec::new();
    for key in sort.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        let (name, direction) = match key.strip_prefix('-') {
            Some(name) => (name, "DESC"),
            None => (key.strip_prefix('+').unwrap_or(key), "ASC"),
        };
        match sortable.iter().find(|(api, _)| *api == name) {
            Some((_, column)) => clauses.push(format!("{column} {direction}")),
            None => errors.add("sort", format!("cannot sort by `{name}`")),
        }
    }
    if clauses.is_empty() {
        "created_at DESC".to_string()
    } else {
        clauses.join(", ")
    }
}

impl ListOptions {
    /// Whether any of `haystacks` contains the keyword (case-insensitive)
    pub fn matches(&self, haystacks: &[&str]) -> bool {
        match &self.keyword {
            Some(keyword) => haystacks
                .iter()
                .any(|h| h.to_lowercase().contains(keyword.as_str())),
            None => true,
        }
    }

    /// Apply paging to an already filtered and ordered list
    pub fn paginate<T>(&self, items: Vec<T>) -> Vec<T> {
        match self.paging {
            Some((page, limit)) => items
                .into_iter()
                .skip((page - 1).saturating_mul(limit))
                .take(limit)
                .collect(),
            None => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORTABLE: &[SortField] = &[
        ("email", "email"),
        ("createdAt", "created_at"),
        ("firstName", "profile.firstName"),
    ];

    fn query(pairs: &[(&str, &str)]) -> ListQuery {
        let mut q = ListQuery::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "q" => q.q = v,
                "page" => q.page = v,
                "limit" => q.limit = v,
                "sort" => q.sort = v,
                "fields" => q.fields = v,
                _ => unreachable!(),
            }
        }
        q
    }

    #[test]
    fn test_defaults() {
        let opts = ListQuery::default().parse(SORTABLE).unwrap();
        assert_eq!(opts.order_by, "created_at DESC");
        assert!(opts.paging.is_none());
        assert!(opts.keyword.is_none());
        assert!(opts.fields.is_empty());
    }

    #[test]
    fn test_sort_maps_to_columns() {
        let opts = query(&[("sort", "-firstName,email")]).parse(SORTABLE).unwrap();
        assert_eq!(opts.order_by, "profile.firstName DESC, email ASC");
    }

    #[test]
    fn test_unknown_sort_rejected() {
        let err = query(&[("sort", "hash_pass")]).parse(SORTABLE).unwrap_err();
        assert!(err.field_errors().unwrap().contains("sort"));
    }

    #[test]
    fn test_page_and_limit_go_together() {
        let err = query(&[("page", "2")]).parse(SORTABLE).unwrap_err();
        assert!(err.field_errors().unwrap().contains("page"));

        let err = query(&[("page", "0"), ("limit", "10")]).parse(SORTABLE).unwrap_err();
        assert!(err.field_errors().unwrap().contains("page"));

        let err = query(&[("page", "1"), ("limit", "101")]).parse(SORTABLE).unwrap_err();
        assert!(err.field_errors().unwrap().contains("limit"));

        let opts = query(&[("page", "2"), ("limit", "10")]).parse(SORTABLE).unwrap();
        assert_eq!(opts.paging, Some((2, 10)));
    }

    #[test]
    fn test_paginate_and_match() {
        let opts = query(&[("page", "2"), ("limit", "2"), ("q", "Shop")])
            .parse(SORTABLE)
            .unwrap();
        assert_eq!(opts.paginate(vec![1, 2, 3, 4, 5]), vec![3, 4]);
        assert!(opts.matches(&["my-shop.example.com"]));
        assert!(!opts.matches(&["store.example.com", "Store"]));
    }

    #[test]
    fn test_fields_list() {
        let opts = query(&[("fields", "email, role,")]).parse(SORTABLE).unwrap();
        assert_eq!(opts.fields, vec!["email".to_string(), "role".to_string()]);
    }
}

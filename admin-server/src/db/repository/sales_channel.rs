//! Sales Channel Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{SALES_CHANNEL_TABLE, SalesChannel, SalesChannelDraft};
use crate::utils::time::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct SalesChannelRepository {
    base: BaseRepository,
}

impl SalesChannelRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All channels, ordered by a whitelisted `ORDER BY` clause
    pub async fn find_all(&self, order_by: &str) -> RepoResult<Vec<SalesChannel>> {
        let channels: Vec<SalesChannel> = self
            .base
            .db()
            .query(format!("SELECT * FROM sales_channel ORDER BY {order_by}"))
            .await?
            .take(0)?;
        Ok(channels)
    }

    /// Channels owned by `owner`
    pub async fn find_by_owner(
        &self,
        owner: &RecordId,
        order_by: &str,
    ) -> RepoResult<Vec<SalesChannel>> {
        let channels: Vec<SalesChannel> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM sales_channel WHERE owner = $owner ORDER BY {order_by}"
            ))
            .bind(("owner", owner.clone()))
            .await?
            .take(0)?;
        Ok(channels)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<SalesChannel>> {
        let Ok(thing) = parse_id(SALES_CHANNEL_TABLE, id) else {
            return Ok(None);
        };
        self.find_by_record(&thing).await
    }

    pub async fn find_by_record(&self, id: &RecordId) -> RepoResult<Option<SalesChannel>> {
        let channel: Option<SalesChannel> = self.base.db().select(id.clone()).await?;
        Ok(channel)
    }

    pub async fn find_by_domain(&self, domain: &str) -> RepoResult<Option<SalesChannel>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM sales_channel WHERE domain = $domain")
            .bind(("domain", domain.trim().to_lowercase()))
            .await?;
        let channels: Vec<SalesChannel> = result.take(0)?;
        Ok(channels.into_iter().next())
    }

    /// The ecommerce channel serving `domain`
    pub async fn find_storefront(&self, domain: &str) -> RepoResult<Option<SalesChannel>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM sales_channel WHERE domain = $domain AND channel_type = 'ecommerce'")
            .bind(("domain", domain.trim().to_lowercase()))
            .await?;
        let channels: Vec<SalesChannel> = result.take(0)?;
        Ok(channels.into_iter().next())
    }

    pub async fn create(&self, draft: SalesChannelDraft) -> RepoResult<SalesChannel> {
        if self.find_by_domain(&draft.domain).await?.is_some() {
            return Err(RepoError::Duplicate("domain".to_string()));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE sales_channel SET
                    owner = $owner,
                    domain = $domain,
                    name = $name,
                    channel_type = $channel_type,
                    site_data = $site_data,
                    email_templates = $email_templates,
                    easy_ship = $easy_ship,
                    facebook = $facebook,
                    send_grid = $send_grid,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("owner", draft.owner))
            .bind(("domain", draft.domain))
            .bind(("name", draft.name))
            .bind(("channel_type", draft.channel_type))
            .bind(("site_data", draft.site_data))
            .bind(("email_templates", draft.email_templates))
            .bind(("easy_ship", draft.easy_ship))
            .bind(("facebook", draft.facebook))
            .bind(("send_grid", draft.send_grid))
            .bind(("now", now))
            .await?;

        let created: Option<SalesChannel> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create sales channel".to_string()))
    }

    /// Replace the editable fields of a channel with a validated draft
    pub async fn update(&self, id: &RecordId, draft: SalesChannelDraft) -> RepoResult<SalesChannel> {
        if let Some(other) = self.find_by_domain(&draft.domain).await?
            && &other.id != id
        {
            return Err(RepoError::Duplicate("domain".to_string()));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    owner = $owner,
                    domain = $domain,
                    name = $name,
                    channel_type = $channel_type,
                    site_data = $site_data,
                    email_templates = $email_templates,
                    easy_ship = $easy_ship,
                    facebook = $facebook,
                    send_grid = $send_grid,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("id", id.clone()))
            .bind(("owner", draft.owner))
            .bind(("domain", draft.domain))
            .bind(("name", draft.name))
            .bind(("channel_type", draft.channel_type))
            .bind(("site_data", draft.site_data))
            .bind(("email_templates", draft.email_templates))
            .bind(("easy_ship", draft.easy_ship))
            .bind(("facebook", draft.facebook))
            .bind(("send_grid", draft.send_grid))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<SalesChannel> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Sales channel {} not found", id)))
    }

    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<SalesChannel> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}

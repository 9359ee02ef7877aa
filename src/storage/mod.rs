// String-keyed blob persistence; sqlite implementation via sea-orm

use std::sync::Arc;

use chrono::Utc;
use entities::kv_entry;
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};

#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Replace the whole value stored under `key`.
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

pub struct SqliteBlobStore {
    db: Arc<DatabaseConnection>,
}

impl SqliteBlobStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl BlobStore for SqliteBlobStore {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = kv_entry::Entity::find_by_id(key.to_string())
            .one(self.db.as_ref())
            .await?;
        Ok(row.map(|m| m.value))
    }

    #[tracing::instrument(level = "debug", skip(self, value), fields(len = value.len()))]
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let model = kv_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(Utc::now().naive_utc()),
        };
        kv_entry::Entity::insert(model)
            .on_conflict(
                OnConflict::column(kv_entry::Column::Key)
                    .update_columns([kv_entry::Column::Value, kv_entry::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        kv_entry::Entity::delete_by_id(key.to_string())
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}

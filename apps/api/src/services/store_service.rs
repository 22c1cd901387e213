//! Storefront service. Every account may own at most one store.

use chrono::Utc;
use tracing::info;

use bazaar_core::{NewStore, Store};
use bazaar_db::repository::generate_id;
use bazaar_db::{Database, DbError};

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone)]
pub struct StoreService {
    db: Database,
}

impl StoreService {
    pub fn new(db: Database) -> Self {
        StoreService { db }
    }

    pub async fn list(&self) -> ApiResult<Vec<Store>> {
        Ok(self.db.stores().list().await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Store> {
        self.db
            .stores()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Store not found".to_string()))
    }

    /// Open a store for `owner_email`.
    pub async fn create(&self, owner_email: &str, cmd: NewStore) -> ApiResult<Store> {
        cmd.validate()?;

        let now = Utc::now();
        let store = Store {
            id: generate_id(),
            owner_email: owner_email.to_string(),
            name: cmd.name,
            created_at: now,
            updated_at: now,
        };

        let store = self.db.stores().insert(&store).await.map_err(|e| match e {
            DbError::UniqueViolation { .. } => {
                ApiError::Conflict("This account already has a store".to_string())
            }
            other => other.into(),
        })?;

        info!(owner = %owner_email, store_id = %store.id, "Store created");
        Ok(store)
    }

    /// The store owned by `owner_email`.
    pub async fn mine(&self, owner_email: &str) -> ApiResult<Store> {
        self.db
            .stores()
            .get_by_owner(owner_email)
            .await?
            .ok_or_else(|| ApiError::NotFound("You don't have a store".to_string()))
    }

    pub async fn rename(&self, owner_email: &str, cmd: NewStore) -> ApiResult<Store> {
        cmd.validate()?;

        let store = self.mine(owner_email).await?;
        let store = self.db.stores().rename(&store.id, &cmd.name).await?;

        info!(store_id = %store.id, "Store renamed");
        Ok(store)
    }
}

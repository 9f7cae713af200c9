use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Session,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: Session) -> AppResult<Session>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>>;
    async fn replace(&self, session: &Session) -> AppResult<()>;
    /// Returns whether a session was removed.
    async fn delete(&self, id: &str) -> AppResult<bool>;
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

pub struct MongoSessionRepository {
    collection: Collection<Session>,
}

impl MongoSessionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("sessions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let id_options = IndexOptions::builder().unique(true).build();
        let id_model = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(id_options)
            .build();
        self.collection.create_index(id_model).await?;
        info!("Created unique index on sessions.id");

        let expires_at_model = IndexModel::builder()
            .keys(doc! { "expires_at": 1 })
            .build();
        self.collection.create_index(expires_at_model).await?;
        info!("Created index on sessions.expires_at");

        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MongoSessionRepository {
    async fn create(&self, session: Session) -> AppResult<Session> {
        self.collection.insert_one(&session).await?;
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>> {
        let session = self.collection.find_one(doc! { "id": id }).await?;
        Ok(session)
    }

    async fn replace(&self, session: &Session) -> AppResult<()> {
        let result = self
            .collection
            .replace_one(doc! { "id": session.id.as_str() }, session)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("Session not found".to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    // timestamps are stored as unix seconds
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "expires_at": { "$lt": now.timestamp() } })
            .await?;

        Ok(result.deleted_count)
    }
}

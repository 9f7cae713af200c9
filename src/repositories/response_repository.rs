use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Response};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    async fn create(&self, response: Response) -> AppResult<Response>;
    /// Newest first.
    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Response>>;
    async fn delete_by_quiz_ids(&self, quiz_ids: &[String]) -> AppResult<u64>;
}

pub struct MongoResponseRepository {
    collection: Collection<Response>,
}

impl MongoResponseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("responses");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for responses collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let quiz_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "submitted_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("quiz_submitted".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(quiz_index).await?;

        log::info!("Successfully created indexes for responses collection");
        Ok(())
    }
}

#[async_trait]
impl ResponseRepository for MongoResponseRepository {
    async fn create(&self, response: Response) -> AppResult<Response> {
        self.collection.insert_one(&response).await?;
        Ok(response)
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Response>> {
        let responses = self
            .collection
            .find(doc! { "quiz_id": quiz_id })
            .sort(doc! { "submitted_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(responses)
    }

    async fn delete_by_quiz_ids(&self, quiz_ids: &[String]) -> AppResult<u64> {
        if quiz_ids.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection
            .delete_many(doc! { "quiz_id": { "$in": quiz_ids.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }
}

use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Collection, Database, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoRoundDocument, doc_id},
};
use crate::dao::{models::RoundEntity, round_store::RoundStore, storage::StorageResult};

const ROUND_COLLECTION_NAME: &str = "rounds";

/// [`RoundStore`] backed by a MongoDB collection of round documents.
#[derive(Clone)]
pub struct MongoRoundStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    database: RwLock<Database>,
    config: MongoConfig,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = self.database.read().await.clone();
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let database =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.database.write().await;
        *guard = database;
        Ok(())
    }
}

impl MongoRoundStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let database = establish_connection(&config.options, &config.database_name).await?;

        let store = Self {
            inner: Arc::new(MongoInner {
                database: RwLock::new(database),
                config,
            }),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    /// Index backing the owner-scoped, date-descending round listing.
    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.inner.database.read().await.clone();
        let collection = database.collection::<mongodb::bson::Document>(ROUND_COLLECTION_NAME);
        let index = mongodb::IndexModel::builder()
            .keys(doc! {"user_id": 1, "date": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("round_owner_date_idx".to_owned()))
                    .build(),
            )
            .build();

        collection
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: ROUND_COLLECTION_NAME,
                index: "user_id,date",
                source,
            })?;

        Ok(())
    }

    async fn collection(&self) -> Collection<MongoRoundDocument> {
        let guard = self.inner.database.read().await;
        guard.collection::<MongoRoundDocument>(ROUND_COLLECTION_NAME)
    }

    async fn save_round(&self, round: RoundEntity) -> MongoResult<()> {
        let id = round.id;
        let document: MongoRoundDocument = round.into();
        let collection = self.collection().await;
        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveRound { id, source })?;

        Ok(())
    }

    async fn find_round(&self, id: Uuid) -> MongoResult<Option<RoundEntity>> {
        let collection = self.collection().await;

        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadRound { id, source })?;

        Ok(document.map(Into::into))
    }

    async fn list_rounds(&self, user_id: String) -> MongoResult<Vec<RoundEntity>> {
        let collection = self.collection().await;

        let documents: Vec<MongoRoundDocument> = collection
            .find(doc! {"user_id": &user_id})
            .sort(doc! {"date": -1})
            .await
            .map_err(|source| MongoDaoError::ListRounds {
                user_id: user_id.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListRounds { user_id, source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_round(&self, id: Uuid) -> MongoResult<bool> {
        let collection = self.collection().await;
        let result = collection
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteRound { id, source })?;
        Ok(result.deleted_count > 0)
    }
}

impl RoundStore for MongoRoundStore {
    fn save_round(&self, round: RoundEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_round(round).await.map_err(Into::into) })
    }

    fn find_round(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoundEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_round(id).await.map_err(Into::into) })
    }

    fn list_rounds(&self, user_id: String) -> BoxFuture<'static, StorageResult<Vec<RoundEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_rounds(user_id).await.map_err(Into::into) })
    }

    fn delete_round(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_round(id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}

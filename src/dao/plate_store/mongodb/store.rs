use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoPlateDocument, PLATE_FIELD, inserted_id_to_string},
};
use crate::dao::{models::PlateEntity, plate_store::PlateStore, storage::StorageResult};

/// Plate store backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoPlateStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoPlateStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        // Plates may be registered several times, so the index is not unique.
        let index = mongodb::IndexModel::builder()
            .keys(doc! { "plate": 1 })
            .options(
                IndexOptions::builder()
                    .name(Some("plate_idx".to_owned()))
                    .build(),
            )
            .build();

        self.collection()
            .await
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: self.inner.config.collection_name.clone(),
                index: PLATE_FIELD,
                source,
            })?;

        Ok(())
    }

    async fn collection(&self) -> Collection<MongoPlateDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoPlateDocument>(&self.inner.config.collection_name)
    }

    async fn insert_plate(&self, plate: PlateEntity) -> MongoResult<String> {
        let label = plate.plate.clone();
        let document: MongoPlateDocument = plate.into();
        let result = self
            .collection()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::InsertPlate {
                plate: label,
                source,
            })?;

        Ok(inserted_id_to_string(&result.inserted_id))
    }

    async fn find_plates(&self, plate: String) -> MongoResult<Vec<PlateEntity>> {
        let documents: Vec<MongoPlateDocument> = self
            .collection()
            .await
            .find(doc! { "plate": plate.as_str() })
            .await
            .map_err(|source| MongoDaoError::FindPlate {
                plate: plate.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::FindPlate {
                plate: plate.clone(),
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }
}

impl PlateStore for MongoPlateStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    fn add_plate(&self, plate: PlateEntity) -> BoxFuture<'static, StorageResult<String>> {
        let store = self.clone();
        Box::pin(async move { store.insert_plate(plate).await.map_err(Into::into) })
    }

    fn find_by_plate(&self, plate: String) -> BoxFuture<'static, StorageResult<Vec<PlateEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_plates(plate).await.map_err(Into::into) })
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

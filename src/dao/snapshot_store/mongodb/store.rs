use std::{sync::Arc, time::SystemTime};

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::{DateTime, doc},
    options::IndexOptions,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoMatchEventDocument, MongoSnapshotDocument, doc_id, uuid_as_binary},
};
use crate::dao::{
    models::{MatchEventEntity, SnapshotEntity},
    snapshot_store::SnapshotStore,
    storage::StorageResult,
};

const SNAPSHOT_COLLECTION_NAME: &str = "active_games";
const MATCH_EVENT_COLLECTION_NAME: &str = "match_events";

/// MongoDB-backed snapshot store shared across the service.
#[derive(Clone)]
pub struct MongoSnapshotStore {
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

impl MongoSnapshotStore {
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
        let database = self.database().await;

        // Active-snapshot lookups filter by team (and user) and want the most
        // recently updated record first.
        let snapshots = database.collection::<MongoSnapshotDocument>(SNAPSHOT_COLLECTION_NAME);
        let snapshot_index = mongodb::IndexModel::builder()
            .keys(doc! {"team_id": 1, "is_active": 1, "updated_at": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("active_game_recency_idx".to_owned()))
                    .build(),
            )
            .build();
        snapshots
            .create_index(snapshot_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: SNAPSHOT_COLLECTION_NAME,
                index: "team_id,is_active,updated_at",
                source,
            })?;

        // Discovery ranges over the event calendar per team.
        let events = database.collection::<MongoMatchEventDocument>(MATCH_EVENT_COLLECTION_NAME);
        let event_index = mongodb::IndexModel::builder()
            .keys(doc! {"team_id": 1, "starts_at": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("event_window_idx".to_owned()))
                    .build(),
            )
            .build();
        events
            .create_index(event_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: MATCH_EVENT_COLLECTION_NAME,
                index: "team_id,starts_at",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn snapshot_collection(&self) -> Collection<MongoSnapshotDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoSnapshotDocument>(SNAPSHOT_COLLECTION_NAME)
    }

    async fn event_collection(&self) -> Collection<MongoMatchEventDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoMatchEventDocument>(MATCH_EVENT_COLLECTION_NAME)
    }

    async fn find_active(
        &self,
        filter: mongodb::bson::Document,
        team_id: Uuid,
    ) -> MongoResult<Option<SnapshotEntity>> {
        let collection = self.snapshot_collection().await;
        let document = collection
            .find(filter)
            .sort(doc! {"updated_at": -1})
            .limit(1)
            .await
            .map_err(|source| MongoDaoError::QuerySnapshots { team_id, source })?
            .try_next()
            .await
            .map_err(|source| MongoDaoError::QuerySnapshots { team_id, source })?;

        Ok(document.map(Into::into))
    }

    async fn create_snapshot(&self, snapshot: SnapshotEntity) -> MongoResult<()> {
        let id = snapshot.id;
        let document: MongoSnapshotDocument = snapshot.into();
        let collection = self.snapshot_collection().await;
        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::WriteSnapshot { id, source })?;
        Ok(())
    }

    async fn update_snapshot(&self, snapshot: SnapshotEntity) -> MongoResult<()> {
        let id = snapshot.id;
        let document: MongoSnapshotDocument = snapshot.into();
        let collection = self.snapshot_collection().await;
        let result = collection
            .replace_one(doc_id(id), &document)
            .await
            .map_err(|source| MongoDaoError::WriteSnapshot { id, source })?;

        if result.matched_count == 0 {
            return Err(MongoDaoError::SnapshotMissing { id });
        }
        Ok(())
    }

    async fn deactivate_snapshot(&self, id: Uuid) -> MongoResult<()> {
        let collection = self.snapshot_collection().await;
        // Idempotent: deactivating an already-gone snapshot is not an error.
        collection
            .update_one(
                doc_id(id),
                doc! {"$set": {"is_active": false, "updated_at": DateTime::now()}},
            )
            .await
            .map_err(|source| MongoDaoError::WriteSnapshot { id, source })?;
        Ok(())
    }

    async fn list_match_events(
        &self,
        team_id: Uuid,
        from: SystemTime,
        to: SystemTime,
    ) -> MongoResult<Vec<MatchEventEntity>> {
        let collection = self.event_collection().await;
        let documents: Vec<MongoMatchEventDocument> = collection
            .find(doc! {
                "team_id": uuid_as_binary(team_id),
                "cancelled": false,
                "starts_at": {
                    "$gte": DateTime::from_system_time(from),
                    "$lte": DateTime::from_system_time(to),
                },
            })
            .sort(doc! {"starts_at": 1})
            .await
            .map_err(|source| MongoDaoError::QueryMatchEvents { team_id, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::QueryMatchEvents { team_id, source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }
}

impl SnapshotStore for MongoSnapshotStore {
    fn find_active_snapshot(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<SnapshotEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let filter = doc! {
                "team_id": uuid_as_binary(team_id),
                "user_id": uuid_as_binary(user_id),
                "is_active": true,
            };
            store
                .find_active(filter, team_id)
                .await
                .map_err(Into::into)
        })
    }

    fn find_active_snapshot_for_team(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<SnapshotEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let filter = doc! {
                "team_id": uuid_as_binary(team_id),
                "is_active": true,
            };
            store
                .find_active(filter, team_id)
                .await
                .map_err(Into::into)
        })
    }

    fn create_snapshot(&self, snapshot: SnapshotEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.create_snapshot(snapshot).await.map_err(Into::into) })
    }

    fn update_snapshot(&self, snapshot: SnapshotEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.update_snapshot(snapshot).await.map_err(Into::into) })
    }

    fn deactivate_snapshot(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.deactivate_snapshot(id).await.map_err(Into::into) })
    }

    fn list_match_events(
        &self,
        team_id: Uuid,
        from: SystemTime,
        to: SystemTime,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchEventEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_match_events(team_id, from, to)
                .await
                .map_err(Into::into)
        })
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

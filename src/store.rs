use anyhow::Context;
use async_trait::async_trait;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::event::EventHandler;
use mongodb::event::sdam::SdamEvent;
use mongodb::options::{ClientOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use thiserror::Error;

const COLLECTION: &str = "kvpairs";
const DEFAULT_DATABASE: &str = "kvpairs";

/// A single key-value record as persisted in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KvPairRecord {
    /// Assigned by the store at creation; never supplied by clients and
    /// unchanged by updates.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub key: String,
    pub value: JsonValue,
}

/// Errors surfaced by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this key already exists (unique index violation)
    #[error("duplicate key '{0}'")]
    DuplicateKey(String),
    /// Any other database failure
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistence seam for key value pairs.
///
/// Handlers depend on this trait rather than on the MongoDB client directly,
/// so tests can substitute an in-memory implementation.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Look up a record by key. Absence is not an error.
    async fn find_by_key(&self, key: &str) -> Result<Option<KvPairRecord>, StoreError>;

    /// Insert a new record. Fails with [`StoreError::DuplicateKey`] if a
    /// record with this key already exists.
    async fn insert(&self, key: &str, value: JsonValue) -> Result<KvPairRecord, StoreError>;

    /// Atomically replace the value of an existing record, returning the
    /// post-update record, or `None` if the key is absent.
    async fn update_value(
        &self,
        key: &str,
        value: JsonValue,
    ) -> Result<Option<KvPairRecord>, StoreError>;

    /// Atomically delete a record, returning the removed record, or `None`
    /// if the key is absent.
    async fn remove_by_key(&self, key: &str) -> Result<Option<KvPairRecord>, StoreError>;

    /// Lightweight reachability probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// MongoDB-backed store for use across async handlers
#[derive(Clone)]
pub struct MongoKvStore {
    database: Database,
    collection: Collection<KvPairRecord>,
}

impl MongoKvStore {
    /// Create a store from a connection string.
    ///
    /// Only a malformed connection string is fatal here. The driver connects
    /// lazily: an unreachable server is logged by the startup probe and each
    /// subsequent operation fails independently. Server selection is bounded
    /// rather than retried indefinitely.
    pub async fn connect(connection_string: &str) -> anyhow::Result<Self> {
        let mut options = ClientOptions::parse(connection_string)
            .await
            .context("failed to parse database connection string")?;

        options.app_name.get_or_insert_with(|| "kvpair-api".to_string());
        options
            .server_selection_timeout
            .get_or_insert(Duration::from_secs(5));
        options.sdam_event_handler = Some(EventHandler::callback(log_connection_event));

        let database_name = options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client =
            Client::with_options(options).context("failed to create MongoDB client")?;
        let database = client.database(&database_name);
        let collection = database.collection::<KvPairRecord>(COLLECTION);

        let store = Self {
            database,
            collection,
        };
        store.probe().await;
        Ok(store)
    }

    /// Startup probe: ensure the unique index on `key` and verify the server
    /// is reachable. Failure is logged but not fatal; the HTTP server starts
    /// anyway and each request fails independently against an unusable
    /// connection.
    async fn probe(&self) {
        match self.ensure_key_index().await {
            Ok(()) => tracing::info!("Connected to MongoDB"),
            Err(error) => {
                tracing::error!("MongoDB first connection attempt failed: {:#}", error);
            }
        }
    }

    /// The unique index on `key` is the authoritative guard against
    /// concurrent creation of the same key.
    async fn ensure_key_index(&self) -> anyhow::Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "key": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection
            .create_index(index)
            .await
            .context("failed to create unique index on key")?;

        tracing::debug!("Ensured unique index on key");
        Ok(())
    }
}

#[async_trait]
impl KvStore for MongoKvStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<KvPairRecord>, StoreError> {
        let record = self
            .collection
            .find_one(doc! { "key": key })
            .await
            .map_err(|e| backend(e, "failed to query key value pair"))?;

        tracing::debug!("Looked up key value pair with key: {}", key);
        Ok(record)
    }

    async fn insert(&self, key: &str, value: JsonValue) -> Result<KvPairRecord, StoreError> {
        let mut record = KvPairRecord {
            id: None,
            key: key.to_string(),
            value,
        };

        let result = self.collection.insert_one(&record).await.map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::DuplicateKey(key.to_string())
            } else {
                backend(e, "failed to insert key value pair")
            }
        })?;

        record.id = result.inserted_id.as_object_id();
        tracing::debug!("Inserted key value pair with key: {}", key);
        Ok(record)
    }

    async fn update_value(
        &self,
        key: &str,
        value: JsonValue,
    ) -> Result<Option<KvPairRecord>, StoreError> {
        let value = bson::to_bson(&value)
            .context("failed to convert value to BSON")
            .map_err(StoreError::Backend)?;

        let record = self
            .collection
            .find_one_and_update(doc! { "key": key }, doc! { "$set": { "value": value } })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| backend(e, "failed to update key value pair"))?;

        tracing::debug!("Updated key value pair with key: {}", key);
        Ok(record)
    }

    async fn remove_by_key(&self, key: &str) -> Result<Option<KvPairRecord>, StoreError> {
        let record = self
            .collection
            .find_one_and_delete(doc! { "key": key })
            .await
            .map_err(|e| backend(e, "failed to delete key value pair"))?;

        tracing::debug!("Removed key value pair with key: {}", key);
        Ok(record)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| backend(e, "failed to ping MongoDB"))?;
        Ok(())
    }
}

fn backend(error: mongodb::error::Error, context: &'static str) -> StoreError {
    StoreError::Backend(anyhow::Error::new(error).context(context))
}

/// Duplicate-key violations surface as write error code 11000 (11001 on
/// some legacy servers).
fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == 11000 || write_error.code == 11001
        }
        ErrorKind::Command(command_error) => {
            command_error.code == 11000 || command_error.code == 11001
        }
        _ => false,
    }
}

fn log_connection_event(event: SdamEvent) {
    match event {
        SdamEvent::TopologyOpening(_) => tracing::info!("Connecting to MongoDB..."),
        SdamEvent::ServerOpening(_) => tracing::info!("Connection to MongoDB opened"),
        SdamEvent::ServerClosed(_) => tracing::info!("Connection to MongoDB closed"),
        SdamEvent::TopologyClosed(_) => tracing::error!("Disconnected from MongoDB"),
        SdamEvent::ServerHeartbeatFailed(_) => tracing::error!("MongoDB heartbeat failed"),
        _ => {}
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory [`KvStore`] used by handler tests in place of MongoDB.

    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    #[derive(Default)]
    pub struct MemoryStore {
        entries: RwLock<HashMap<String, KvPairRecord>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl KvStore for MemoryStore {
        async fn find_by_key(&self, key: &str) -> Result<Option<KvPairRecord>, StoreError> {
            let entries = self.entries.read().unwrap();
            Ok(entries.get(key).cloned())
        }

        async fn insert(&self, key: &str, value: JsonValue) -> Result<KvPairRecord, StoreError> {
            let mut entries = self.entries.write().unwrap();
            if entries.contains_key(key) {
                return Err(StoreError::DuplicateKey(key.to_string()));
            }
            let record = KvPairRecord {
                id: Some(ObjectId::new()),
                key: key.to_string(),
                value,
            };
            entries.insert(key.to_string(), record.clone());
            Ok(record)
        }

        async fn update_value(
            &self,
            key: &str,
            value: JsonValue,
        ) -> Result<Option<KvPairRecord>, StoreError> {
            let mut entries = self.entries.write().unwrap();
            match entries.get_mut(key) {
                Some(record) => {
                    record.value = value;
                    Ok(Some(record.clone()))
                }
                None => Ok(None),
            }
        }

        async fn remove_by_key(&self, key: &str) -> Result<Option<KvPairRecord>, StoreError> {
            let mut entries = self.entries.write().unwrap();
            Ok(entries.remove(key))
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }
}

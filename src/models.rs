use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::store::KvPairRecord;

/// Request body for create and update operations
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct KvPairBody {
    pub key: String,
    /// Can be any JSON type: string, number, boolean, array, object
    #[schema(value_type = Object)]
    pub value: JsonValue,
}

/// A key value pair as returned to clients, including its assigned id
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct KvPairResponse {
    pub id: String,
    pub key: String,
    #[schema(value_type = Object)]
    pub value: JsonValue,
}

impl From<KvPairRecord> for KvPairResponse {
    fn from(record: KvPairRecord) -> Self {
        KvPairResponse {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            key: record.key,
            value: record.value,
        }
    }
}

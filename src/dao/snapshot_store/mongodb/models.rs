use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{ClockStateEntity, MatchEventEntity, PitchStateEntity, SnapshotEntity};

/// Wire form of an active-game snapshot. `updated_at` is a native BSON date
/// so the store can sort by recency server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSnapshotDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    schema_version: u32,
    team_id: Uuid,
    user_id: Uuid,
    timer_state: ClockStateEntity,
    pitch_state: PitchStateEntity,
    is_active: bool,
    updated_at: DateTime,
}

impl From<SnapshotEntity> for MongoSnapshotDocument {
    fn from(value: SnapshotEntity) -> Self {
        Self {
            id: value.id,
            schema_version: value.schema_version,
            team_id: value.team_id,
            user_id: value.user_id,
            timer_state: value.timer_state,
            pitch_state: value.pitch_state,
            is_active: value.is_active,
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoSnapshotDocument> for SnapshotEntity {
    fn from(value: MongoSnapshotDocument) -> Self {
        Self {
            id: value.id,
            schema_version: value.schema_version,
            team_id: value.team_id,
            user_id: value.user_id,
            timer_state: value.timer_state,
            pitch_state: value.pitch_state,
            is_active: value.is_active,
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

/// Wire form of an externally scheduled match event. `starts_at` is a native
/// BSON date so the discovery window query can range over it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMatchEventDocument {
    #[serde(rename = "_id")]
    id: String,
    team_id: Uuid,
    starts_at: DateTime,
    kind: String,
    #[serde(default)]
    cancelled: bool,
}

impl From<MongoMatchEventDocument> for MatchEventEntity {
    fn from(value: MongoMatchEventDocument) -> Self {
        Self {
            id: value.id,
            team_id: value.team_id,
            starts_at: value.starts_at.to_system_time(),
            kind: value.kind,
            cancelled: value.cancelled,
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}

use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{EndEntity, RoundEntity, RoundType};

/// Wire representation of a round inside the `rounds` collection.
///
/// Differs from [`RoundEntity`] only in its timestamp encoding: BSON
/// `DateTime` instead of `SystemTime`, so date-ordered queries work natively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRoundDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    user_id: String,
    round_type: RoundType,
    distance: u32,
    ends_count: u32,
    arrows_per_end: u32,
    date: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    memo: Option<String>,
    total_score: u32,
    average_score: f64,
    ends: Vec<EndEntity>,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<RoundEntity> for MongoRoundDocument {
    fn from(value: RoundEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            round_type: value.round_type,
            distance: value.distance,
            ends_count: value.ends_count,
            arrows_per_end: value.arrows_per_end,
            date: DateTime::from_system_time(value.date),
            location: value.location,
            memo: value.memo,
            total_score: value.total_score,
            average_score: value.average_score,
            ends: value.ends,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoRoundDocument> for RoundEntity {
    fn from(value: MongoRoundDocument) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            round_type: value.round_type,
            distance: value.distance,
            ends_count: value.ends_count,
            arrows_per_end: value.arrows_per_end,
            date: value.date.to_system_time(),
            location: value.location,
            memo: value.memo,
            total_score: value.total_score,
            average_score: value.average_score,
            ends: value.ends,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

/// Filter selecting one document by its UUID primary key.
pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}

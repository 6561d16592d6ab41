use crate::{Error, Result};
use mongodb::{Collection, bson::doc};
use serde::{Deserialize, Serialize};

pub const GENERATOR_COLLECTION: &str = "generator";

/// One auto-increment counter, keyed by the name of the collection it serves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generator {
    #[serde(rename = "_id")]
    pub key: String,
    pub value: i64,
}

/// Creates the counter for `key` unless it already exists.
pub(crate) async fn ensure_key(
    collection: &Collection<Generator>,
    key: &str,
    default_number: i64,
) -> Result<()> {
    collection
        .update_one(
            doc! { "_id": key },
            doc! { "$setOnInsert": { "value": default_number } },
        )
        .upsert(true)
        .await?;

    Ok(())
}

/// Atomically bumps the counter of `key` and returns the value it held before.
pub(crate) async fn next_value(collection: &Collection<Generator>, key: &str) -> Result<i64> {
    let previous = collection
        .find_one_and_update(doc! { "_id": key }, doc! { "$inc": { "value": 1 } })
        .await?;

    previous
        .map(|generator| generator.value)
        .ok_or_else(|| Error::GeneratorKeyNotFound(key.to_owned()))
}

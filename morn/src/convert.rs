//! Conversion between Rust values and BSON documents.
//!
//! Inputs of every write operation go through [`to_document`], so anything that serializes
//! to a BSON document can be stored: a struct, a map, or a raw [`Document`]. Outputs are
//! decoded back with serde, either from a single result or from a cursor.

use crate::{Error, Result};
use futures_util::{Stream, StreamExt, TryStreamExt};
use mongodb::bson::{self, Bson, DateTime, Document, oid::ObjectId};
use serde::Serialize;

/// Serializes `value` into a document.
///
/// When `stamp_field` is set, the field is (over)written with the current time, which is how
/// `create_at_field` and `update_at_field` are maintained.
pub fn to_document<E: Serialize + ?Sized>(
    value: &E,
    stamp_field: Option<&str>,
) -> Result<Document> {
    let mut document = match bson::to_bson(value)? {
        Bson::Document(document) => document,
        other => return Err(Error::NotADocument(other.element_type())),
    };

    if let Some(field) = stamp_field {
        document.insert(field, DateTime::now());
    }

    Ok(document)
}

pub fn to_documents<E: Serialize>(
    values: &[E],
    stamp_field: Option<&str>,
) -> Result<Vec<Document>> {
    values
        .iter()
        .map(|value| to_document(value, stamp_field))
        .collect()
}

/// Splits a `field:value` spec.
///
/// ```
/// # use morn::convert::parse_key_value;
/// assert_eq!(parse_key_value("age:5").unwrap(), ("age", "5"));
/// assert_eq!(parse_key_value("age:-1").unwrap(), ("age", "-1"));
/// assert!(parse_key_value("age").is_err());
/// ```
pub fn parse_key_value(spec: &str) -> Result<(&str, &str)> {
    let mut parts = spec.split(':');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => Ok((key, value)),
        _ => Err(Error::InvalidKeyValue(spec.to_owned())),
    }
}

/// `"name:asc"` becomes `{ name: 1 }`, `"name:desc"` becomes `{ name: -1 }`.
pub fn parse_sort(spec: &str) -> Result<Document> {
    let (key, direction) = parse_key_value(spec)?;

    let order = match direction {
        "asc" => Order::Asc,
        "desc" => Order::Desc,
        other => return Err(Error::InvalidSortDirection(other.to_owned())),
    };

    let mut document = Document::new();
    document.insert(key, order.to_bson());
    Ok(document)
}

/// Builds the key document of an index from `field:value` specs, keeping their order.
///
/// Numeric values become integers (`"user_id:1"`); anything else is kept as a string so
/// special index types (`"bio:text"`, `"location:2dsphere"`) pass through.
pub fn parse_index_keys<S: AsRef<str>>(specs: &[S]) -> Result<Document> {
    let mut keys = Document::new();

    for spec in specs {
        let (key, value) = parse_key_value(spec.as_ref())?;

        match value.parse::<i32>() {
            Ok(direction) => keys.insert(key, direction),
            Err(_) => keys.insert(key, value),
        };
    }

    Ok(keys)
}

/// `"point:5"` becomes `("point", 5)`.
pub fn parse_increment(spec: &str) -> Result<(&str, i64)> {
    let (key, value) = parse_key_value(spec)?;

    let amount = value
        .parse::<i64>()
        .map_err(|_| Error::InvalidIncrement(value.to_owned()))?;

    Ok((key, amount))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn to_bson(self) -> Bson {
        match self {
            Self::Asc => Bson::Int32(1),
            Self::Desc => Bson::Int32(-1),
        }
    }
}

/// Types an inserted `_id` can be decoded into.
pub trait FromInsertedId: Sized {
    fn from_inserted_id(id: Bson) -> Result<Self>;
}

impl FromInsertedId for Bson {
    fn from_inserted_id(id: Bson) -> Result<Self> {
        Ok(id)
    }
}

impl FromInsertedId for ObjectId {
    fn from_inserted_id(id: Bson) -> Result<Self> {
        match id {
            Bson::ObjectId(oid) => Ok(oid),
            other => Err(Error::UnsupportedId(other)),
        }
    }
}

/// String ids are returned as is, object ids as their hex representation.
impl FromInsertedId for String {
    fn from_inserted_id(id: Bson) -> Result<Self> {
        match id {
            Bson::String(id) => Ok(id),
            Bson::ObjectId(oid) => Ok(oid.to_hex()),
            other => Err(Error::UnsupportedId(other)),
        }
    }
}

impl FromInsertedId for i64 {
    fn from_inserted_id(id: Bson) -> Result<Self> {
        match id {
            Bson::Int64(id) => Ok(id),
            Bson::Int32(id) => Ok(i64::from(id)),
            other => Err(Error::UnsupportedId(other)),
        }
    }
}

impl FromInsertedId for i32 {
    fn from_inserted_id(id: Bson) -> Result<Self> {
        match id {
            Bson::Int32(id) => Ok(id),
            other => Err(Error::UnsupportedId(other)),
        }
    }
}

/// Drains a cursor into a vector.
pub async fn collect_all<R, S>(stream: S) -> Result<Vec<R>>
where
    S: Stream<Item = mongodb::error::Result<R>>,
{
    let items = stream.try_collect().await?;
    Ok(items)
}

/// Returns the first item of a cursor, failing with [`Error::NoDocument`] on an empty one.
pub async fn first<R, S>(stream: S) -> Result<R>
where
    S: Stream<Item = mongodb::error::Result<R>>,
{
    let mut stream = std::pin::pin!(stream);

    match stream.next().await {
        Some(item) => Ok(item?),
        None => Err(Error::NoDocument),
    }
}

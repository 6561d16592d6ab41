use crate::{Result, convert::parse_index_keys};
use mongodb::{IndexModel, options::IndexOptions};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Display;

/// Maps a Rust type to a collection. Usually derived:
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Model)]
/// #[model(collection = "users")]
/// #[model(index(keys = "user_id:1", unique))]
/// #[model(index(keys = "username:1, email:1"))]
/// struct User {
///     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
///     id: Option<ObjectId>,
///     user_id: i64,
///     username: String,
///     email: String,
/// }
///
/// let users = Dao::<User>::for_model(&instance, None).await?;
/// let newest = users.clause().sort_by(user::Fields::UserId, Order::Desc).find_one().await?;
/// ```
///
/// Without `collection`, the collection is named after the struct in `snake_case`, minus a
/// trailing `_model`.
pub trait Model: Serialize + DeserializeOwned + Send + Sync + 'static {
    type Fields: Display + Send + 'static;

    const COLLECTION_NAME: &'static str;

    const INDEXES: &'static [IndexDefinition] = &[];
}

/// A statically declared index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexDefinition {
    /// `field:value` specs, see [`parse_index_keys`].
    pub keys: &'static [&'static str],
    pub unique: bool,
    pub name: Option<&'static str>,
}

impl IndexDefinition {
    pub fn to_index_model(&self) -> Result<IndexModel> {
        let keys = parse_index_keys(self.keys)?;

        let mut options = IndexOptions::default();
        if self.unique {
            options.unique = Some(true);
        }
        options.name = self.name.map(str::to_owned);

        Ok(IndexModel::builder()
            .keys(keys)
            .options(Some(options))
            .build())
    }
}

use mongodb::bson;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error("failed to convert value to BSON: {0}")]
    Serialize(#[from] bson::ser::Error),

    #[error("failed to decode BSON: {0}")]
    Deserialize(#[from] bson::de::Error),

    #[error("failed to read configuration: {0}")]
    Config(String),

    #[error("uri is required")]
    MissingUri,

    #[error("no database selected, call `Instance::set_db` first")]
    DatabaseNotSelected,

    #[error("generator collection is not configured, enable `gen_id` in options")]
    GeneratorNotFound,

    #[error("generator key `{0}` not found")]
    GeneratorKeyNotFound(String),

    #[error("field must be in the format of field:value, got `{0}`")]
    InvalidKeyValue(String),

    #[error("direction must be either asc or desc, got `{0}`")]
    InvalidSortDirection(String),

    #[error("value must be a number, got `{0}`")]
    InvalidIncrement(String),

    #[error("value does not serialize to a document, got {0:?}")]
    NotADocument(bson::spec::ElementType),

    #[error("no documents to insert")]
    EmptyInput,

    #[error("inserted id is not compatible with the requested type: {0}")]
    UnsupportedId(bson::Bson),

    #[error("no document found")]
    NoDocument,

    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Custom(err.into())
    }
}

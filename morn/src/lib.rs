//! Morn is a lightweight `MongoDB` ORM for Rust.
//!
//! ## Example
//!
//! ```ignore
//! // Connect and select a database
//! let instance = Instance::connect("mongodb://localhost:27017", MornOptions::new().gen_id(100_000))
//!     .await?
//!     .set_db("app");
//!
//! // Define a model
//! #[derive(Serialize, Deserialize, Model)]
//! #[model(collection = "users", index(keys = "user_id:1", unique))]
//! struct User {
//!     user_id: i64,
//!     username: String,
//!     email: String,
//! }
//!
//! let users = Dao::<User>::for_model(&instance, None).await?;
//!
//! // Insert a document with a generated numeric id
//! let user_id = users.gen_id().await?;
//! users.clause().create_one(&User { user_id, username: "up".into(), email: "up@example.com".into() }).await?;
//!
//! // Query with a filter, paging and sorting
//! let page: Vec<User> = users
//!     .clause()
//!     .filter(doc! { "username": "up" })
//!     .page(0, 20)
//!     .sort_by(user::Fields::UserId, Order::Desc)
//!     .find_many()
//!     .await?;
//!
//! // Update only what is given
//! #[derive(Serialize)]
//! struct Rename<'a> { username: &'a str }
//!
//! users.clause().filter(doc! { "user_id": user_id }).update_one(&Rename { username: "down" }).await?;
//!
//! // Delete
//! users.clause().filter(doc! { "user_id": user_id }).delete_one().await?;
//! ```
//!
//! See the [`guides`] module to learn more!

#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_errors_doc
)]

extern crate self as morn;

pub mod clause;
pub mod convert;
mod dao;
mod error;
pub mod generator;
pub mod guides;
mod instance;
pub mod logger;
#[cfg(feature = "meta")]
pub mod meta;
mod model;
mod option;

pub use clause::Clause;
pub use convert::{FromInsertedId, Order};
pub use dao::Dao;
pub use error::{Error, Result};
pub use generator::Generator;
pub use instance::Instance;
pub use model::{IndexDefinition, Model};
pub use morn_macros::Model;
pub use option::{MornConfig, MornOptions, QueryOptions, SessionOptions};

pub use mongodb;

#[cfg(feature = "meta")]
#[doc(hidden)]
pub use inventory;

macro_rules! with_session {
    ($query: expr, $session: expr) => {
        match $session {
            Some(session) => $query.session(session),
            None => $query,
        }
    };
}

pub(crate) use with_session;

#[cfg(feature = "meta")]
#[doc(hidden)]
#[macro_export]
macro_rules! __register_model {
    ($model: ty) => {
        $crate::inventory::submit! {
            $crate::meta::ModelMetadataWrapper($crate::meta::ModelMetadata::new(
                <$model as $crate::Model>::COLLECTION_NAME,
                <$model as $crate::Model>::INDEXES,
            ))
        }
    };
}

#[cfg(not(feature = "meta"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __register_model {
    ($model: ty) => {};
}

//! A small repository on top of a `users` collection.
//!
//! ```sh
//! MORN_URI=mongodb://localhost:27017/?replicaSet=rs0 cargo run --example user_repository
//! ```

use futures_util::FutureExt;
use morn::{
    Dao, Instance, Model, MornOptions, Order, QueryOptions, Result,
    mongodb::bson::{Bson, DateTime, doc, oid::ObjectId},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Clone, Debug, Default, Serialize, Deserialize, Model)]
#[serde(default)]
#[model(collection = "users")]
#[model(index(keys = "user_id:1", unique))]
#[model(index(keys = "username:1, email:1"))]
struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime>,
    username: String,
    user_id: i64,
    email: String,
    point: i64,
}

#[derive(Serialize)]
struct Contact<'a> {
    email: &'a str,
}

struct UserRepository {
    users: Dao<User>,
}

impl UserRepository {
    async fn new(instance: &Instance) -> Result<Self> {
        let users = Dao::for_model(instance, None).await?;
        users.ensure_indexes().await?;

        Ok(Self { users })
    }

    async fn create_user(&self, username: &str, email: &str) -> Result<Bson> {
        let user = User {
            id: None,
            created_at: None,
            updated_at: None,
            username: username.to_owned(),
            user_id: self.users.gen_id().await?,
            email: email.to_owned(),
            point: 0,
        };

        self.users.clause().create_one(&user).await
    }

    async fn users_by_email(&self, email: &str) -> Result<Vec<User>> {
        let key = user::Fields::Email.as_str();

        self.users
            .clause()
            .filter(doc! { key: email })
            .sort_by(user::Fields::UserId, Order::Desc)
            .limit(10)
            .find_many()
            .await
    }

    async fn upsert_contact(&self, user_id: i64, email: &str) -> Result<()> {
        self.users
            .clause()
            .filter(doc! { "user_id": user_id })
            .option(QueryOptions {
                upsert: Some(true),
                ..Default::default()
            })
            .update_one(&Contact { email })
            .await?;

        Ok(())
    }

    async fn create_pair(&self) -> Result<()> {
        let users = self.users.clone();
        let first = self.users.gen_id().await?;
        let second = self.users.gen_id().await?;

        self.users
            .session(None, move |session| {
                async move {
                    for (user_id, username) in [(first, "pair1"), (second, "pair2")] {
                        let email = format!("{username}@example.com");
                        users
                            .with_session(session)
                            .create_one(&doc! {
                                "user_id": user_id,
                                "username": username,
                                "email": email,
                                "point": 0_i64,
                            })
                            .await?;
                    }

                    Ok::<_, morn::Error>(())
                }
                .boxed()
            })
            .await
    }
}

#[tokio::main]
async fn main() {
    morn::logger::init("info");

    if let Err(err) = run().await {
        error!(%err, "user repository example failed");
    }
}

async fn run() -> Result<()> {
    let uri = std::env::var("MORN_URI").unwrap_or_default();
    let options = MornOptions::new()
        .gen_id(100_000)
        .create_at_field("created_at")
        .update_at_field("updated_at");

    let instance = Instance::connect(&uri, options).await?.set_db("morn_example");
    let repository = UserRepository::new(&instance).await?;

    let id = repository.create_user("test", "test@test.com").await?;
    info!(%id, "user created");

    repository.upsert_contact(1, "up@example.com").await?;
    repository.create_pair().await?;

    let users = repository.users_by_email("up@example.com").await?;
    info!(count = users.len(), collection = User::COLLECTION_NAME, "users found");

    instance.disconnect().await;

    Ok(())
}

#![allow(dead_code)]

use morn::{
    Dao, Instance, Model, MornOptions,
    mongodb::bson::{DateTime, oid::ObjectId},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NUMBER: i64 = 100_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "users")]
#[model(index(keys = "user_id:1", unique))]
#[model(index(keys = "username:1, email:1"))]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
    pub username: String,
    pub user_id: i64,
    pub email: String,
    pub point: i64,
}

pub fn user(user_id: i64, username: &str, point: i64) -> User {
    User {
        id: None,
        created_at: None,
        updated_at: None,
        username: username.to_owned(),
        user_id,
        email: format!("{username}@example.com"),
        point,
    }
}

/// Connects to `MORN_TEST_URI` and returns a fresh database named after the test.
pub async fn setup(test: &str) -> (Instance, Dao<User>) {
    morn::logger::init("morn=debug");

    let uri = std::env::var("MORN_TEST_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017/?replicaSet=rs0".to_owned());
    let options = MornOptions::new()
        .gen_id(DEFAULT_NUMBER)
        .create_at_field("created_at")
        .update_at_field("updated_at");

    let instance = Instance::connect(&uri, options)
        .await
        .unwrap()
        .set_db(&format!("morn_test_{test}"));
    instance.db().unwrap().drop().await.unwrap();

    let users = Dao::<User>::for_model(&instance, None).await.unwrap();
    users.ensure_indexes().await.unwrap();

    (instance, users)
}

pub async fn seed(users: &Dao<User>, points: &[i64]) -> Vec<User> {
    let mut seeded = Vec::with_capacity(points.len());
    for (index, point) in points.iter().enumerate() {
        let user_id = users.gen_id().await.unwrap();
        seeded.push(user(user_id, &format!("user{}", index + 1), *point));
    }

    users.clause().create_many(&seeded).await.unwrap();

    seeded
}

pub async fn teardown(instance: Instance) {
    instance.db().unwrap().drop().await.unwrap();
    instance.disconnect().await;
}

pub fn collection_name() -> &'static str {
    User::COLLECTION_NAME
}

mod common;

use common::{User, seed, setup, teardown};
use morn::{
    QueryOptions,
    mongodb::{bson::doc, options::ReturnDocument},
};
use serde::Serialize;

#[derive(Serialize)]
struct Rename<'a> {
    username: &'a str,
}

#[derive(Serialize)]
struct SetPoint {
    point: i64,
}

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn update_one_sets_fields_and_stamps_update_time() {
    let (instance, users) = setup("update_one").await;
    let seeded = seed(&users, &[100, 200]).await;

    let result = users
        .clause()
        .filter(doc! { "user_id": seeded[0].user_id })
        .update_one(&Rename { username: "renamed" })
        .await
        .unwrap();
    assert_eq!(result.matched_count, 1);
    assert_eq!(result.modified_count, 1);

    let updated: User = users
        .clause()
        .filter(doc! { "user_id": seeded[0].user_id })
        .find_one()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.username, "renamed");
    assert_eq!(updated.point, 100);
    assert!(updated.updated_at.is_some());

    let missed = users
        .clause()
        .filter(doc! { "user_id": -1 })
        .update_one(&Rename { username: "ghost" })
        .await
        .unwrap();
    assert_eq!(missed.matched_count, 0);

    teardown(instance).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn update_one_with_upsert_creates_the_document() {
    let (instance, users) = setup("update_upsert").await;

    let result = users
        .clause()
        .filter(doc! { "user_id": 9 })
        .option(QueryOptions {
            upsert: Some(true),
            ..Default::default()
        })
        .update_one(&SetPoint { point: 5 })
        .await
        .unwrap();
    assert!(result.upserted_id.is_some());
    assert_eq!(users.clause().count().await.unwrap(), 1);

    teardown(instance).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn update_many_touches_every_match() {
    let (instance, users) = setup("update_many").await;
    seed(&users, &[100, 100, 300]).await;

    let result = users
        .clause()
        .filter(doc! { "point": 100 })
        .update_many(&SetPoint { point: 0 })
        .await
        .unwrap();
    assert_eq!(result.modified_count, 2);

    let zeroed = users
        .clause()
        .filter(doc! { "point": 0 })
        .count()
        .await
        .unwrap();
    assert_eq!(zeroed, 2);

    teardown(instance).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn find_one_and_update_returns_before_or_after() {
    let (instance, users) = setup("find_one_and_update").await;
    let seeded = seed(&users, &[100]).await;
    let filter = doc! { "user_id": seeded[0].user_id };

    let before = users
        .clause()
        .filter(filter.clone())
        .find_one_and_update(&SetPoint { point: 1 })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before.point, 100);

    let after = users
        .clause()
        .filter(filter)
        .option(QueryOptions {
            return_document: Some(ReturnDocument::After),
            ..Default::default()
        })
        .find_one_and_update(&SetPoint { point: 2 })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.point, 2);

    let none = users
        .clause()
        .filter(doc! { "user_id": -1 })
        .find_one_and_update(&SetPoint { point: 3 })
        .await
        .unwrap();
    assert!(none.is_none());

    teardown(instance).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn increase_value_increments_and_upserts() {
    let (instance, users) = setup("increase_value").await;
    let seeded = seed(&users, &[100]).await;

    let after = users
        .clause()
        .filter(doc! { "user_id": seeded[0].user_id })
        .option(QueryOptions {
            return_document: Some(ReturnDocument::After),
            ..Default::default()
        })
        .increase_value("point:-30", false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.point, 70);

    let missing = users
        .clause()
        .filter(doc! { "user_id": 77 })
        .increase_value("point:5", false)
        .await
        .unwrap();
    assert!(missing.is_none());

    users
        .clause()
        .filter(doc! { "username": "fresh" })
        .increase_value("point:5", true)
        .await
        .unwrap();
    let fresh = users
        .clause()
        .filter(doc! { "username": "fresh" })
        .find_one_as::<morn::mongodb::bson::Document>()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fresh.get_i64("point").unwrap(), 5);

    assert!(
        users
            .clause()
            .increase_value("point:many", false)
            .await
            .is_err()
    );

    teardown(instance).await;
}

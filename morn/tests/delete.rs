mod common;

use common::{seed, setup, teardown};
use morn::mongodb::bson::doc;

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn delete_one_and_many() {
    let (instance, users) = setup("delete").await;
    seed(&users, &[100, 200, 200, 300]).await;

    let deleted = users
        .clause()
        .filter(doc! { "point": 200 })
        .delete_one()
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let deleted = users
        .clause()
        .filter(doc! { "point": 999 })
        .delete_one()
        .await
        .unwrap();
    assert_eq!(deleted, 0);

    let deleted = users
        .clause()
        .filter(doc! { "point": { "$gte": 200 } })
        .delete_many()
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let deleted = users.clause().no_filter().delete_many().await.unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(users.clause().count().await.unwrap(), 0);

    teardown(instance).await;
}

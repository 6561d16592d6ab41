mod common;

use common::{setup, teardown, user};
use futures_util::FutureExt;
use morn::{
    Dao, Error, SessionOptions,
    mongodb::{
        bson::{Document, doc},
        options::{ReadConcern, WriteConcern},
    },
};

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn session_commits_on_success() {
    let (instance, users) = setup("session_commit").await;
    let dao = users.clone();

    let created = users
        .session(
            Some(SessionOptions {
                read_concern: Some(ReadConcern::majority()),
                write_concern: Some(WriteConcern::majority()),
                ..Default::default()
            }),
            move |session| {
                async move {
                    dao.with_session(session)
                        .create_one(&user(1, "test", 0))
                        .await?;
                    dao.with_session(session)
                        .create_one(&user(2, "test2", 0))
                        .await?;

                    dao.with_session(session).count().await
                }
                .boxed()
            },
        )
        .await
        .unwrap();

    assert_eq!(created, 2);
    assert_eq!(users.clause().count().await.unwrap(), 2);

    teardown(instance).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn session_aborts_on_error() {
    let (instance, users) = setup("session_abort").await;
    let dao = users.clone();

    let err = users
        .session(None, move |session| {
            async move {
                dao.with_session(session)
                    .create_one(&user(1, "test", 0))
                    .await?;

                Err::<(), _>(Error::custom("rollback"))
            }
            .boxed()
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "rollback");
    assert_eq!(
        users
            .clause()
            .filter(doc! { "user_id": 1 })
            .count()
            .await
            .unwrap(),
        0
    );

    teardown(instance).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn session_reads_see_uncommitted_writes() {
    let (instance, users) = setup("session_reads").await;
    let dao = users.clone();

    let (found, totals, outside) = users
        .session(None, move |session| {
            async move {
                dao.with_session(session)
                    .create_many(&[user(1, "user1", 10), user(2, "user2", 20)])
                    .await?;

                let found = dao
                    .with_session(session)
                    .sort("user_id:desc")
                    .find_many()
                    .await?;
                let totals = dao
                    .with_session(session)
                    .aggregate::<Document>([
                        doc! { "$match": { "point": { "$gt": 0 } } },
                        doc! { "$group": { "_id": null, "total": { "$sum": "$point" } } },
                    ])
                    .await?;
                let outside = dao.clause().count().await?;

                Ok::<_, Error>((found, totals, outside))
            }
            .boxed()
        })
        .await
        .unwrap();

    assert_eq!(
        found.iter().map(|user| user.user_id).collect::<Vec<_>>(),
        [2, 1]
    );
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].get_i64("total").unwrap(), 30);
    assert_eq!(outside, 0);
    assert_eq!(users.clause().count().await.unwrap(), 2);

    teardown(instance).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn session_index_creation_is_rolled_back() {
    let (instance, _) = setup("session_index").await;
    let badges = Dao::<Document>::new("badges", &instance, None)
        .await
        .unwrap();
    let dao = badges.clone();

    let err = badges
        .session(None, move |session| {
            async move {
                dao.with_session(session)
                    .create_index(&["badge:1"])
                    .await?;

                Err::<(), _>(Error::custom("rollback"))
            }
            .boxed()
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "rollback");

    let names = badges
        .collection()
        .list_index_names()
        .await
        .unwrap_or_default();
    assert!(!names.contains(&"badge_1".to_owned()));

    teardown(instance).await;
}

/// ## Getting started
///
/// An [`Instance`](crate::Instance) owns the connection and the selected database. Every
/// [`Dao`](crate::Dao) is created from it and inherits its [`MornOptions`](crate::MornOptions)
/// unless given its own.
///
/// ```ignore
/// use morn::{Dao, Instance, MornOptions};
///
/// let instance = Instance::connect("mongodb://localhost:27017", MornOptions::default())
///     .await?
///     .set_db("app");
///
/// let events = Dao::<Event>::new("events", &instance, None).await?;
/// ```
///
/// The same can be read from a YAML file:
///
/// ```yaml
/// uri: mongodb://localhost:27017
/// database: app
/// gen_id: true
/// default_number: 100000
/// create_at_field: created_at
/// update_at_field: updated_at
/// ```
///
/// ```ignore
/// let config = MornConfig::from_path("morn.yaml")?;
/// let instance = Instance::from_config(&config).await?;
/// ```
///
/// [`Instance::connect`](crate::Instance::connect) enables the stable server API. For any
/// other client setting, build the [`Client`](mongodb::Client) yourself and pass it to
/// [`Instance::from_client`](crate::Instance::from_client).
///
/// ### Method overview
///
/// Every operation starts from [`Dao::clause`](crate::Dao::clause) (or
/// [`Dao::with_session`](crate::Dao::with_session)) and consumes the clause.
///
/// | Method                  | Example                                                          | Corresponding `MongoDB` query                               |
/// |-------------------------|------------------------------------------------------------------|-------------------------------------------------------------|
/// | `create_one`            | `dao.clause().create_one(&user)`                                 | `db.users.insertOne({...})`                                 |
/// | `create_many`           | `dao.clause().create_many(&users)`                               | `db.users.insertMany([...])`                                |
/// | `find_one`              | `dao.clause().filter(doc! { "user_id": 1 }).find_one()`          | `db.users.findOne({ user_id: 1 })`                          |
/// | `find_many`             | `dao.clause().page(20, 10).sort("email:asc").find_many()`        | `db.users.find({}).skip(20).limit(10).sort({ email: 1 })`   |
/// | `count`                 | `dao.clause().filter(doc! { "point": 0 }).count()`               | `db.users.countDocuments({ point: 0 })`                     |
/// | `update_one`            | `dao.clause().filter(f).update_one(&patch)`                      | `db.users.updateOne(f, { $set: {...} })`                    |
/// | `update_many`           | `dao.clause().filter(f).update_many(&patch)`                     | `db.users.updateMany(f, { $set: {...} })`                   |
/// | `find_one_and_update`   | `dao.clause().filter(f).find_one_and_update(&patch)`             | `db.users.findOneAndUpdate(f, { $set: {...} })`             |
/// | `increase_value`        | `dao.clause().filter(f).increase_value("point:5", false)`        | `db.users.findOneAndUpdate(f, { $inc: { point: 5 } })`      |
/// | `delete_one`            | `dao.clause().filter(f).delete_one()`                            | `db.users.deleteOne(f)`                                     |
/// | `delete_many`           | `dao.clause().filter(f).delete_many()`                           | `db.users.deleteMany(f)`                                    |
/// | `aggregate`             | `dao.clause().aggregate::<Stats>([doc! { "$group": {...} }])`    | `db.users.aggregate([{ $group: {...} }])`                   |
/// | `create_index`          | `dao.clause().create_index(&["username:1", "email:1"])`          | `db.users.createIndex({ username: 1, email: 1 })`           |
pub mod getting_started {}

/// ## Queries
///
/// A [`Clause`](crate::Clause) starts with the filter `{}`, no paging and no sort.
///
/// - [`filter`](crate::Clause::filter) takes any [`Document`](mongodb::bson::Document), usually
///   built with [`doc!`](mongodb::bson::doc).
/// - [`page`](crate::Clause::page) takes the number of documents to skip and a limit. It is
///   not a page index: the third page of ten is `page(20, 10)`.
/// - [`sort`](crate::Clause::sort) parses `field:asc` or `field:desc`. A malformed spec is
///   logged and ignored, so the query still runs with the previous sort.
/// - [`sort_by`](crate::Clause::sort_by) appends a key, typically a generated
///   [`Fields`](crate::Model::Fields) variant.
/// - [`option`](crate::Clause::option) attaches [`QueryOptions`](crate::QueryOptions). Skip,
///   limit and sort set on the clause win over the same fields in the options.
///
/// ```ignore
/// let recent: Vec<User> = users
///     .clause()
///     .filter(doc! { "point": { "$gt": 0 } })
///     .sort_by(user::Fields::UserId, Order::Desc)
///     .sort_by(user::Fields::Email, Order::Asc)
///     .limit(50)
///     .option(QueryOptions {
///         projection: Some(doc! { "email": 1 }),
///         ..Default::default()
///     })
///     .find_many()
///     .await?;
/// ```
///
/// ### Decoding into other types
///
/// Reads decode into the model of the DAO. The `_as` variants decode into any other type,
/// such as a projection or a raw document:
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct Email {
///     email: String,
/// }
///
/// let emails: Vec<Email> = users.clause().find_many_as().await?;
/// let raw: Option<Document> = users.clause().find_one_as().await?;
/// ```
///
/// ### Writes
///
/// Writes accept anything that serializes to a document. Updates `$set` every serialized
/// field, so partial updates use a dedicated struct, a map or a raw document. When the
/// options name a `create_at_field` or `update_at_field`, the current time is stamped on
/// inserts or updates.
///
/// ```ignore
/// #[derive(Serialize)]
/// struct Rename<'a> {
///     username: &'a str,
/// }
///
/// users
///     .clause()
///     .filter(doc! { "user_id": 1 })
///     .update_one(&Rename { username: "down" })
///     .await?;
/// ```
pub mod queries {}

/// ## Numeric ids
///
/// With [`MornOptions::gen_id`](crate::MornOptions::gen_id), the database gets a `generator`
/// collection holding one counter per collection:
///
/// ```text
/// { _id: "users", value: 100000 }
/// ```
///
/// Creating a [`Dao`](crate::Dao) registers its counter at `default_number` unless one exists.
/// [`Dao::gen_id`](crate::Dao::gen_id) increments it atomically and returns the value it held
/// before, so ids start at `default_number`.
///
/// ```ignore
/// let instance = Instance::connect(uri, MornOptions::new().gen_id(100_000))
///     .await?
///     .set_db("app");
/// let users = Dao::<User>::new("users", &instance, None).await?;
///
/// assert_eq!(users.gen_id().await?, 100_000);
/// assert_eq!(users.gen_id().await?, 100_001);
/// ```
///
/// Counters for names that have no DAO are registered with
/// [`Instance::generate_new_key`](crate::Instance::generate_new_key).
pub mod numeric_ids {}

/// ## Transactions
///
/// [`Dao::session`](crate::Dao::session) starts a session and a transaction, then hands the
/// session to a closure. Operations bound to it with
/// [`Dao::with_session`](crate::Dao::with_session) belong to the transaction. It is committed
/// when the closure succeeds and aborted when it fails.
///
/// Transactions need a replica set or a sharded cluster.
///
/// ```ignore
/// use futures_util::FutureExt;
///
/// let (tx_users, tx_points) = (users.clone(), points.clone());
///
/// users
///     .session(None, move |session| {
///         async move {
///             tx_users.with_session(session).create_one(&user).await?;
///             tx_points
///                 .with_session(session)
///                 .filter(doc! { "user_id": user.user_id })
///                 .increase_value("point:10", true)
///                 .await?;
///             Ok::<_, morn::Error>(())
///         }
///         .boxed()
///     })
///     .await?;
/// ```
///
/// The closure returns a boxed future that may only borrow the session, so clone what it
/// needs and move it in. DAOs are cheap to clone.
pub mod transactions {}

/// ## Models and indexes
///
/// Deriving [`Model`](crate::Model) names the collection, declares indexes and generates a
/// `Fields` enum of document keys in a module named after the struct in `snake_case`:
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Model)]
/// #[model(index(keys = "user_id:1", unique))]
/// #[model(index(keys = "username:1, email:1", name = "username_email"))]
/// struct UserModel {
///     user_id: i64,
///     #[serde(rename = "name")]
///     username: String,
///     email: String,
/// }
///
/// assert_eq!(UserModel::COLLECTION_NAME, "user");
/// assert_eq!(user_model::Fields::Username.as_str(), "name");
/// ```
///
/// [`Dao::ensure_indexes`](crate::Dao::ensure_indexes) creates the indexes of one model. With
/// the `meta` feature (on by default), every derived model is also registered at startup, and
/// [`meta::enforce_indexes`](crate::meta::enforce_indexes) creates the indexes of all of them.
pub mod models_and_indexes {}

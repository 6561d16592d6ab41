use crate::{
    Clause, Error, Instance, Model, MornOptions, Result, SessionOptions,
    generator::{self, GENERATOR_COLLECTION, Generator},
    logger::TARGET,
    model::IndexDefinition,
};
use futures_util::future::BoxFuture;
use mongodb::{
    Client, ClientSession, Collection, IndexModel,
    bson::Document,
    error::{CommandError, ErrorKind, TRANSIENT_TRANSACTION_ERROR, UNKNOWN_TRANSACTION_COMMIT_RESULT},
};
use std::{
    fmt,
    marker::PhantomData,
    time::{Duration, Instant},
};
use tracing::{debug, error, info, warn};

const COMMIT_RETRY_LIMIT: Duration = Duration::from_secs(12);
const COMMIT_RETRY_BACKOFF: Duration = Duration::from_millis(5);

/// Access to one collection, typed by the documents it holds.
///
/// `T` is what [`Clause::find_one`] and friends decode into. Writes accept any serializable
/// value, so the same DAO can insert the full model and update it with a partial struct.
///
/// Cloning is cheap: the underlying driver handles are reference counted.
pub struct Dao<T> {
    name: String,
    collection: Collection<Document>,
    client: Client,
    options: MornOptions,
    generator: Option<Collection<Generator>>,
    _model: PhantomData<fn() -> T>,
}

impl<T> Dao<T> {
    /// Opens the collection `name` in the instance's database.
    ///
    /// `options` replace the instance's options for this DAO. With `gen_id` on, the
    /// generator key `name` is registered.
    pub async fn new(name: &str, instance: &Instance, options: Option<MornOptions>) -> Result<Self> {
        let db = instance.db()?;
        let options = options.unwrap_or_else(|| instance.options().clone());

        let generator = options.gen_id.then(|| {
            instance
                .generator()
                .cloned()
                .unwrap_or_else(|| db.collection(GENERATOR_COLLECTION))
        });

        if let Some(generator) = &generator {
            info!(target: TARGET, collection = name, "generate id for collection");

            instance
                .ensure_generator_key(generator, name, options.default_number)
                .await?;
        }

        Ok(Self {
            name: name.to_owned(),
            collection: db.collection(name),
            client: instance.client().clone(),
            options,
            generator,
            _model: PhantomData,
        })
    }

    /// A query builder without session.
    pub fn clause(&self) -> Clause<'_, T> {
        Clause::new(&self.collection, &self.options, None)
    }

    /// A query builder whose operation runs inside `session`, usually the one handed out by
    /// [`Dao::session`].
    pub fn with_session<'a>(&'a self, session: &'a mut ClientSession) -> Clause<'a, T> {
        Clause::new(&self.collection, &self.options, Some(session))
    }

    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &MornOptions {
        &self.options
    }

    /// Takes the next value of this collection's counter.
    ///
    /// The value before the increment is returned, so the first call yields
    /// `default_number`.
    pub async fn gen_id(&self) -> Result<i64> {
        let generator = self.generator.as_ref().ok_or(Error::GeneratorNotFound)?;

        let id = generator::next_value(generator, &self.name).await?;
        debug!(target: TARGET, collection = %self.name, id, "generated id");

        Ok(id)
    }

    /// Runs `f` inside a transaction.
    ///
    /// The transaction is aborted when `f` fails and committed otherwise. A commit whose
    /// outcome is unknown, or that failed transiently, is retried for a few seconds.
    ///
    /// The future borrows nothing but the session, so move owned values (a clone of the DAO
    /// included) into it:
    ///
    /// ```ignore
    /// let users = dao.clone();
    /// dao.session(None, move |session| {
    ///     async move {
    ///         users.with_session(session).create_one(&user).await?;
    ///         users
    ///             .with_session(session)
    ///             .filter(doc! { "user_id": 1 })
    ///             .delete_one()
    ///             .await
    ///     }
    ///     .boxed()
    /// })
    /// .await?;
    /// ```
    pub async fn session<F, R>(&self, options: Option<SessionOptions>, f: F) -> Result<R>
    where
        F: for<'s> FnOnce(&'s mut ClientSession) -> BoxFuture<'s, Result<R>>,
    {
        let mut session = self
            .client
            .start_session()
            .await
            .inspect_err(|err| error!(target: TARGET, %err, "failed to start session"))?;

        session
            .start_transaction()
            .with_options(options.as_ref().map(SessionOptions::to_transaction_options))
            .await?;

        match f(&mut session).await {
            Ok(value) => {
                commit_with_retry(&mut session).await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    warn!(target: TARGET, err = %abort_err, "failed to abort transaction");
                }
                Err(err)
            }
        }
    }
}

impl<T: Model> Dao<T> {
    /// Opens the collection named by the model.
    pub async fn for_model(instance: &Instance, options: Option<MornOptions>) -> Result<Self> {
        Self::new(T::COLLECTION_NAME, instance, options).await
    }

    /// Creates the indexes declared on the model.
    pub async fn ensure_indexes(&self) -> Result<()> {
        if T::INDEXES.is_empty() {
            return Ok(());
        }

        let models = T::INDEXES
            .iter()
            .map(IndexDefinition::to_index_model)
            .collect::<Result<Vec<IndexModel>>>()?;

        self.collection
            .create_indexes(models)
            .await
            .inspect_err(|err| {
                error!(target: TARGET, %err, collection = %self.name, "failed to create indexes");
            })?;

        Ok(())
    }
}

impl<T> Clone for Dao<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            collection: self.collection.clone(),
            client: self.client.clone(),
            options: self.options.clone(),
            generator: self.generator.clone(),
            _model: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Dao<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dao")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("gen_id", &self.generator.is_some())
            .finish_non_exhaustive()
    }
}

async fn commit_with_retry(session: &mut ClientSession) -> Result<()> {
    let started = Instant::now();

    while let Err(err) = session.commit_transaction().await {
        // Aborted transactions carry the transient label too, but never succeed on retry.
        let is_aborted = matches!(
            err.kind.as_ref(),
            ErrorKind::Command(CommandError { code: 251, .. })
        );
        let is_retryable = !is_aborted
            && (err.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT)
                || err.contains_label(TRANSIENT_TRANSACTION_ERROR));

        if !is_retryable || started.elapsed() >= COMMIT_RETRY_LIMIT {
            error!(target: TARGET, %err, "failed to commit transaction");
            return Err(err.into());
        }

        tokio::time::sleep(COMMIT_RETRY_BACKOFF).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Account {
        user_id: i64,
    }

    impl Model for Account {
        type Fields = &'static str;

        const COLLECTION_NAME: &'static str = "accounts";

        const INDEXES: &'static [IndexDefinition] = &[IndexDefinition {
            keys: &["user_id:1"],
            unique: true,
            name: None,
        }];
    }

    async fn instance(options: MornOptions) -> Instance {
        let client = Client::with_uri_str("mongodb://localhost:27017").await.unwrap();
        Instance::from_client(client, options).set_db("morn_test")
    }

    #[tokio::test]
    async fn uses_instance_options_by_default() {
        let instance = instance(MornOptions::new().create_at_field("created_at")).await;
        let dao = Dao::<Account>::for_model(&instance, None).await.unwrap();

        assert_eq!(dao.name(), "accounts");
        assert_eq!(dao.collection().name(), "accounts");
        assert_eq!(dao.options().create_at_field.as_deref(), Some("created_at"));
    }

    #[tokio::test]
    async fn dao_options_replace_instance_options() {
        let instance = instance(MornOptions::new().create_at_field("created_at")).await;
        let options = MornOptions::new().update_at_field("updated_at");
        let dao = Dao::<Document>::new("events", &instance, Some(options.clone()))
            .await
            .unwrap();

        assert_eq!(dao.options(), &options);
    }

    #[tokio::test]
    async fn gen_id_requires_generator() {
        let instance = instance(MornOptions::default()).await;
        let dao = Dao::<Document>::new("events", &instance, None).await.unwrap();

        assert!(matches!(dao.gen_id().await, Err(Error::GeneratorNotFound)));
    }

    #[tokio::test]
    async fn database_must_be_selected() {
        let client = Client::with_uri_str("mongodb://localhost:27017").await.unwrap();
        let instance = Instance::from_client(client, MornOptions::default());

        let err = Dao::<Document>::new("events", &instance, None).await.unwrap_err();
        assert!(matches!(err, Error::DatabaseNotSelected));
    }

    #[tokio::test]
    async fn clones_share_the_collection() {
        let instance = instance(MornOptions::default()).await;
        let dao = Dao::<Account>::for_model(&instance, None).await.unwrap();
        let clone = dao.clone();

        assert_eq!(clone.collection().namespace(), dao.collection().namespace());
        assert!(format!("{clone:?}").contains("accounts"));
    }
}

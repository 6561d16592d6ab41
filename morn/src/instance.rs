use crate::{
    Error, MornConfig, MornOptions, Result,
    generator::{self, GENERATOR_COLLECTION, Generator},
    logger::TARGET,
};
use dashmap::DashSet;
use mongodb::{
    Client, Collection, Database,
    options::{ClientOptions, ServerApi, ServerApiVersion},
};
use std::sync::Arc;
use tracing::{error, info};

/// A connected client, the selected database and the options shared by its
/// [`Dao`](crate::Dao)s.
#[derive(Clone, Debug)]
pub struct Instance {
    client: Client,
    db: Option<Database>,
    options: MornOptions,
    generator: Option<Collection<Generator>>,
    ensured_keys: Arc<DashSet<String>>,
}

impl Instance {
    /// Connects with the default client options plus the stable server API (v1). Anything
    /// else must be configured in the connection string, or use [`Instance::from_client`].
    pub async fn connect(uri: &str, options: MornOptions) -> Result<Self> {
        if uri.is_empty() {
            return Err(Error::MissingUri);
        }

        let client = async {
            let mut client_options = ClientOptions::parse(uri).await?;
            client_options.server_api =
                Some(ServerApi::builder().version(ServerApiVersion::V1).build());

            Client::with_options(client_options)
        }
        .await
        .inspect_err(|err| error!(target: TARGET, %err, "failed to connect to MongoDB"))?;

        Ok(Self::from_client(client, options))
    }

    pub fn from_client(client: Client, options: MornOptions) -> Self {
        Self {
            client,
            db: None,
            options,
            generator: None,
            ensured_keys: Arc::default(),
        }
    }

    pub async fn from_config(config: &MornConfig) -> Result<Self> {
        let instance = Self::connect(&config.uri, config.options.clone()).await?;

        Ok(instance.set_db(&config.database))
    }

    /// Selects the database used by every [`Dao`](crate::Dao) created from now on.
    pub fn set_db(mut self, name: &str) -> Self {
        let db = self.client.database(name);

        self.generator = self
            .options
            .gen_id
            .then(|| db.collection(GENERATOR_COLLECTION));
        self.db = Some(db);
        self.ensured_keys = Arc::default();

        self
    }

    pub async fn disconnect(self) {
        self.client.shutdown().await;
    }

    pub fn db(&self) -> Result<&Database> {
        self.db.as_ref().ok_or(Error::DatabaseNotSelected)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn options(&self) -> &MornOptions {
        &self.options
    }

    pub fn generator(&self) -> Option<&Collection<Generator>> {
        self.generator.as_ref()
    }

    /// Registers a counter for `key` starting at the instance's `default_number`.
    pub async fn generate_new_key(&self, key: &str) -> Result<()> {
        let generator = self.generator.as_ref().ok_or(Error::GeneratorNotFound)?;

        self.ensure_generator_key(generator, key, self.options.default_number)
            .await
    }

    /// Keys already ensured by this instance are skipped.
    pub(crate) async fn ensure_generator_key(
        &self,
        generator: &Collection<Generator>,
        key: &str,
        default_number: i64,
    ) -> Result<()> {
        if self.ensured_keys.contains(key) {
            return Ok(());
        }

        generator::ensure_key(generator, key, default_number).await?;
        self.ensured_keys.insert(key.to_owned());

        info!(target: TARGET, key, default_number, "generator key registered");

        Ok(())
    }
}

use super::Clause;
use crate::{Result, convert::parse_index_keys, logger::TARGET, with_session};
use mongodb::IndexModel;
use tracing::{debug, error};

impl<T> Clause<'_, T> {
    /// Creates an index from `field:value` specs and returns its name. Runs inside the
    /// clause's session when there is one.
    ///
    /// ```ignore
    /// dao.clause()
    ///     .option(QueryOptions { unique: Some(true), ..Default::default() })
    ///     .create_index(&["user_id:1"])
    ///     .await?;
    ///
    /// // compound index
    /// dao.clause().create_index(&["username:1", "email:1"]).await?;
    /// ```
    pub async fn create_index<S: AsRef<str>>(self, specs: &[S]) -> Result<String> {
        let keys = parse_index_keys(specs)?;
        let opts = self
            .query_options
            .as_ref()
            .map(|query_options| query_options.to_index());

        debug!(target: TARGET, collection = self.collection.name(), %keys, "create index");

        let model = IndexModel::builder().keys(keys).options(opts).build();

        let collection = self.collection;
        let query = collection.create_index(model);
        let result = with_session!(query, self.session)
            .await
            .inspect_err(|err| {
                error!(target: TARGET, %err, collection = collection.name(), "failed to create index");
            })?;

        Ok(result.index_name)
    }
}

use super::Clause;
use crate::{Result, logger::TARGET, with_session};
use tracing::{debug, warn};

impl<T> Clause<'_, T> {
    /// Deletes the first matching document. Returns how many were deleted (0 or 1).
    pub async fn delete_one(mut self) -> Result<u64> {
        let opts = self
            .query_options
            .as_ref()
            .map(|query_options| query_options.to_delete());
        let filter = self.take_filter();

        debug!(target: TARGET, collection = self.collection.name(), %filter, "delete one");

        let query = self.collection.delete_one(filter).with_options(opts);
        let result = with_session!(query, self.session).await?;

        if result.deleted_count == 0 {
            warn!(target: TARGET, collection = self.collection.name(), "no document deleted");
        }

        Ok(result.deleted_count)
    }

    /// Deletes every matching document; without a filter, every document of the collection.
    pub async fn delete_many(mut self) -> Result<u64> {
        let opts = self
            .query_options
            .as_ref()
            .map(|query_options| query_options.to_delete());
        let filter = self.take_filter();

        debug!(target: TARGET, collection = self.collection.name(), %filter, "delete many");

        let query = self.collection.delete_many(filter).with_options(opts);
        let result = with_session!(query, self.session).await?;

        if result.deleted_count == 0 {
            warn!(target: TARGET, collection = self.collection.name(), "no document deleted");
        }

        Ok(result.deleted_count)
    }
}

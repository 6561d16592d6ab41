use super::Clause;
use crate::{Result, logger::TARGET, with_session};
use tracing::debug;

impl<T> Clause<'_, T> {
    /// Counts the matching documents, honouring skip and limit.
    ///
    /// After [`no_filter`](Clause::no_filter) the collection metadata estimate is returned
    /// instead; it ignores skip, limit and the session.
    pub async fn count(self) -> Result<u64> {
        let Some(filter) = self.filter else {
            debug!(target: TARGET, collection = self.collection.name(), "estimated count");

            return Ok(self.collection.estimated_document_count().await?);
        };

        let mut opts = self
            .query_options
            .as_ref()
            .map(|query_options| query_options.to_count())
            .unwrap_or_default();
        if self.skip > 0 {
            opts.skip = Some(self.skip);
        }
        if self.limit > 0 {
            opts.limit = u64::try_from(self.limit).ok();
        }

        debug!(target: TARGET, collection = self.collection.name(), %filter, "count");

        let query = self.collection.count_documents(filter).with_options(opts);

        Ok(with_session!(query, self.session).await?)
    }
}

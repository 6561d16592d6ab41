use super::Clause;
use crate::{Result, convert, logger::TARGET, with_session};
use serde::de::DeserializeOwned;
use tracing::debug;

impl<T> Clause<'_, T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Finds the first document matching the filter, honouring skip and sort.
    pub async fn find_one(self) -> Result<Option<T>> {
        self.find_one_as().await
    }

    /// Like [`find_one`](Clause::find_one), decoding into another type (a projection, or a
    /// raw [`Document`](mongodb::bson::Document)).
    pub async fn find_one_as<R>(mut self) -> Result<Option<R>>
    where
        R: DeserializeOwned + Send + Sync + 'static,
    {
        let opts = self.find_one_options();
        let filter = self.take_filter();
        let collection = self.collection.clone_with_type::<R>();

        debug!(target: TARGET, collection = collection.name(), %filter, "find one");

        let query = collection.find_one(filter).with_options(opts);
        let found = with_session!(query, self.session).await?;

        Ok(found)
    }

    /// Finds every document matching the filter, honouring skip, limit and sort.
    pub async fn find_many(self) -> Result<Vec<T>> {
        self.find_many_as().await
    }

    pub async fn find_many_as<R>(mut self) -> Result<Vec<R>>
    where
        R: DeserializeOwned + Send + Sync + 'static,
    {
        let opts = self.find_options();
        let filter = self.take_filter();
        let collection = self.collection.clone_with_type::<R>();

        debug!(target: TARGET, collection = collection.name(), %filter, "find many");

        let query = collection.find(filter).with_options(opts);

        match self.session {
            Some(session) => {
                let mut cursor = query.session(&mut *session).await?;
                convert::collect_all(cursor.stream(session)).await
            }
            None => convert::collect_all(query.await?).await,
        }
    }
}

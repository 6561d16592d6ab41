use super::Clause;
use crate::{
    Result,
    convert::{self, parse_increment},
    logger::TARGET,
    with_session,
};
use mongodb::{
    bson::{Document, doc},
    results::UpdateResult,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

impl<T> Clause<'_, T> {
    fn set_document<E: Serialize + ?Sized>(&self, updater: &E) -> Result<Document> {
        let document = convert::to_document(updater, self.update_at_field())?;

        Ok(doc! { "$set": document })
    }

    /// `$set`s the fields of `updater` on the first matching document.
    ///
    /// Every serialized field is written, including `None`s and defaults; skip them with
    /// `#[serde(skip_serializing_if = "...")]` when that is not wanted.
    pub async fn update_one<E: Serialize + ?Sized>(mut self, updater: &E) -> Result<UpdateResult> {
        let opts = self
            .query_options
            .as_ref()
            .map(|query_options| query_options.to_update());
        let update = self.set_document(updater)?;
        let filter = self.take_filter();

        debug!(target: TARGET, collection = self.collection.name(), %filter, %update, "update one");

        let query = self.collection.update_one(filter, update).with_options(opts);
        let result = with_session!(query, self.session).await?;

        if result.modified_count == 0 {
            warn!(target: TARGET, collection = self.collection.name(), "no document updated");
        }

        Ok(result)
    }

    /// `$set`s the fields of `updater` on every matching document.
    pub async fn update_many<E: Serialize + ?Sized>(
        mut self,
        updater: &E,
    ) -> Result<UpdateResult> {
        let opts = self
            .query_options
            .as_ref()
            .map(|query_options| query_options.to_update());
        let update = self.set_document(updater)?;
        let filter = self.take_filter();

        debug!(target: TARGET, collection = self.collection.name(), %filter, %update, "update many");

        let query = self.collection.update_many(filter, update).with_options(opts);
        let result = with_session!(query, self.session).await?;

        if result.modified_count == 0 {
            warn!(target: TARGET, collection = self.collection.name(), "no document updated");
        }

        Ok(result)
    }
}

impl<T> Clause<'_, T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// `$set`s the fields of `updater` on the first matching document and returns it.
    ///
    /// Whether the document is returned as it was before or after the update follows
    /// [`QueryOptions::return_document`](crate::QueryOptions::return_document) (before by
    /// default). `None` when nothing matched.
    pub async fn find_one_and_update<E: Serialize + ?Sized>(self, updater: &E) -> Result<Option<T>> {
        self.find_one_and_update_as(updater).await
    }

    pub async fn find_one_and_update_as<R, E>(mut self, updater: &E) -> Result<Option<R>>
    where
        R: DeserializeOwned + Send + Sync + 'static,
        E: Serialize + ?Sized,
    {
        let opts = self
            .query_options
            .as_ref()
            .map(|query_options| query_options.to_find_one_and_update());
        let update = self.set_document(updater)?;
        let filter = self.take_filter();
        let collection = self.collection.clone_with_type::<R>();

        debug!(target: TARGET, collection = collection.name(), %filter, %update, "find one and update");

        let query = collection
            .find_one_and_update(filter, update)
            .with_options(opts);

        Ok(with_session!(query, self.session).await?)
    }

    /// Adds to a numeric field of the first matching document, e.g. `"point:5"` or
    /// `"point:-1"`.
    ///
    /// With `upsert`, a document is created when nothing matches. Returns the document as
    /// described in [`find_one_and_update`](Clause::find_one_and_update).
    pub async fn increase_value(mut self, spec: &str, upsert: bool) -> Result<Option<T>> {
        let (key, amount) = parse_increment(spec)?;

        let mut opts = self
            .query_options
            .as_ref()
            .map(|query_options| query_options.to_find_one_and_update())
            .unwrap_or_default();
        opts.upsert = Some(upsert);

        let filter = self.take_filter();
        let collection = self.collection.clone_with_type::<T>();

        debug!(target: TARGET, collection = collection.name(), %filter, key, amount, "increase value");

        let query = collection
            .find_one_and_update(filter, doc! { "$inc": { key: amount } })
            .with_options(opts);

        Ok(with_session!(query, self.session).await?)
    }
}

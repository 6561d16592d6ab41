use super::Clause;
use crate::{
    Error, Result,
    convert::{self, FromInsertedId},
    logger::TARGET,
    with_session,
};
use mongodb::bson::Bson;
use serde::Serialize;
use tracing::debug;

impl<T> Clause<'_, T> {
    /// Inserts one document and returns its `_id`.
    ///
    /// `entity` may be anything that serializes to a document: the DAO's model, another
    /// struct, a map or a raw document. `create_at_field` is stamped when configured.
    pub async fn create_one<E: Serialize + ?Sized>(self, entity: &E) -> Result<Bson> {
        let opts = self
            .query_options
            .as_ref()
            .map(|query_options| query_options.to_insert_one());
        let document = convert::to_document(entity, self.create_at_field())?;

        debug!(target: TARGET, collection = self.collection.name(), "create one");

        let query = self.collection.insert_one(document).with_options(opts);
        let result = with_session!(query, self.session).await?;

        Ok(result.inserted_id)
    }

    /// Like [`create_one`](Clause::create_one), decoding the `_id` (e.g. into the hex
    /// `String` of an `ObjectId`).
    pub async fn create_one_as<I, E>(self, entity: &E) -> Result<I>
    where
        I: FromInsertedId,
        E: Serialize + ?Sized,
    {
        let id = self.create_one(entity).await?;

        I::from_inserted_id(id)
    }

    /// Inserts every entity and returns their `_id`s in input order.
    pub async fn create_many<E: Serialize>(self, entities: &[E]) -> Result<Vec<Bson>> {
        if entities.is_empty() {
            return Err(Error::EmptyInput);
        }

        let opts = self
            .query_options
            .as_ref()
            .map(|query_options| query_options.to_insert_many());
        let documents = convert::to_documents(entities, self.create_at_field())?;

        debug!(
            target: TARGET,
            collection = self.collection.name(),
            count = documents.len(),
            "create many"
        );

        let query = self.collection.insert_many(documents).with_options(opts);
        let result = with_session!(query, self.session).await?;

        let mut ids = result.inserted_ids.into_iter().collect::<Vec<_>>();
        ids.sort_unstable_by_key(|(index, _)| *index);

        Ok(ids.into_iter().map(|(_, id)| id).collect())
    }
}

use super::Clause;
use crate::{Result, convert, logger::TARGET};
use mongodb::bson::Document;
use serde::de::DeserializeOwned;
use tracing::debug;

impl<T> Clause<'_, T> {
    /// Runs `pipeline` and decodes every resulting document into `R`.
    ///
    /// The filter, paging and sort of the clause are not applied; put `$match`, `$skip`,
    /// `$limit` and `$sort` stages in the pipeline instead.
    pub async fn aggregate<R>(self, pipeline: impl IntoIterator<Item = Document>) -> Result<Vec<R>>
    where
        R: DeserializeOwned + Send + Sync + 'static,
    {
        let opts = self
            .query_options
            .as_ref()
            .map(|query_options| query_options.to_aggregate());
        let pipeline = pipeline.into_iter().collect::<Vec<_>>();

        debug!(
            target: TARGET,
            collection = self.collection.name(),
            stages = pipeline.len(),
            "aggregate"
        );

        let query = self.collection.aggregate(pipeline).with_options(opts);

        match self.session {
            Some(session) => {
                let mut cursor = query.session(&mut *session).await?.with_type::<R>();
                convert::collect_all(cursor.stream(session)).await
            }
            None => convert::collect_all(query.await?.with_type::<R>()).await,
        }
    }

    /// Runs `pipeline` and decodes its first resulting document, failing with
    /// [`Error::NoDocument`](crate::Error::NoDocument) when there is none.
    pub async fn aggregate_one<R>(self, pipeline: impl IntoIterator<Item = Document>) -> Result<R>
    where
        R: DeserializeOwned + Send + Sync + 'static,
    {
        let opts = self
            .query_options
            .as_ref()
            .map(|query_options| query_options.to_aggregate());
        let pipeline = pipeline.into_iter().collect::<Vec<_>>();

        debug!(
            target: TARGET,
            collection = self.collection.name(),
            stages = pipeline.len(),
            "aggregate one"
        );

        let query = self.collection.aggregate(pipeline).with_options(opts);

        match self.session {
            Some(session) => {
                let mut cursor = query.session(&mut *session).await?.with_type::<R>();
                convert::first(cursor.stream(session)).await
            }
            None => convert::first(query.await?.with_type::<R>()).await,
        }
    }

    /// Runs `pipeline` and returns the raw result documents.
    pub async fn aggregate_documents(
        self,
        pipeline: impl IntoIterator<Item = Document>,
    ) -> Result<Vec<Document>> {
        self.aggregate(pipeline).await
    }
}

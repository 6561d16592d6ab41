use crate::{IndexDefinition, Instance, Result, logger::TARGET};
use mongodb::{IndexModel, bson::Document};
use tracing::{debug, error};

#[doc(hidden)]
pub struct ModelMetadataWrapper(pub ModelMetadata);

inventory::collect!(ModelMetadataWrapper);

/// What `#[derive(Model)]` registers about every model of the program.
pub struct ModelMetadata {
    collection_name: &'static str,
    indexes: &'static [IndexDefinition],
}

impl ModelMetadata {
    #[doc(hidden)]
    pub const fn new(collection_name: &'static str, indexes: &'static [IndexDefinition]) -> Self {
        Self {
            collection_name,
            indexes,
        }
    }

    pub fn collection_name(&self) -> &'static str {
        self.collection_name
    }

    pub fn indexes(&self) -> &'static [IndexDefinition] {
        self.indexes
    }
}

pub fn model_metadata() -> impl Iterator<Item = &'static ModelMetadata> {
    inventory::iter::<ModelMetadataWrapper>
        .into_iter()
        .map(|wrapper| &wrapper.0)
}

/// Creates the declared indexes of every registered model in the instance's database.
pub async fn enforce_indexes(instance: &Instance) -> Result<()> {
    let db = instance.db()?;

    for metadata in model_metadata() {
        if metadata.indexes().is_empty() {
            continue;
        }

        let models = metadata
            .indexes()
            .iter()
            .map(IndexDefinition::to_index_model)
            .collect::<Result<Vec<IndexModel>>>()?;

        db.collection::<Document>(metadata.collection_name())
            .create_indexes(models)
            .await
            .inspect_err(|err| {
                error!(target: TARGET, %err, collection = metadata.collection_name(), "failed to create indexes");
            })?;

        debug!(target: TARGET, collection = metadata.collection_name(), "indexes enforced");
    }

    Ok(())
}

use crate::{Error, Result};
use mongodb::{
    bson::{Bson, Document},
    options::{
        AggregateOptions, Collation, CountOptions, CursorType, DeleteOptions,
        FindOneAndUpdateOptions, FindOneOptions, FindOptions, Hint, IndexOptions, IndexVersion,
        InsertManyOptions, InsertOneOptions, ReadConcern, ReturnDocument, SelectionCriteria,
        Sphere2DIndexVersion, TextIndexVersion, TransactionOptions, UpdateOptions, WriteConcern,
    },
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Behaviour shared by an [`Instance`](crate::Instance) and the [`Dao`](crate::Dao)s created
/// from it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MornOptions {
    /// Keep a `generator` collection holding one auto-increment counter per collection.
    pub gen_id: bool,
    /// Initial counter value of a freshly registered generator key.
    pub default_number: i64,
    /// Field set to the current time when a document is created.
    pub create_at_field: Option<String>,
    /// Field set to the current time when a document is updated.
    pub update_at_field: Option<String>,
}

impl MornOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gen_id(mut self, default_number: i64) -> Self {
        self.gen_id = true;
        self.default_number = default_number;
        self
    }

    pub fn create_at_field(mut self, field: impl Into<String>) -> Self {
        self.create_at_field = Some(field.into());
        self
    }

    pub fn update_at_field(mut self, field: impl Into<String>) -> Self {
        self.update_at_field = Some(field.into());
        self
    }
}

/// Connection settings, usually read from a YAML file.
///
/// ```yaml
/// uri: mongodb://localhost:27017/?replicaSet=rs0
/// database: app
/// gen_id: true
/// default_number: 100000
/// create_at_field: created_at
/// update_at_field: updated_at
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MornConfig {
    pub uri: String,
    pub database: String,
    #[serde(flatten)]
    pub options: MornOptions,
}

impl MornConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|err| Error::Config(err.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())
            .map_err(|err| Error::Config(format!("{}: {err}", path.as_ref().display())))?;

        serde_yaml::from_reader(file).map_err(|err| Error::Config(err.to_string()))
    }
}

/// Options of the transaction started by [`Dao::session`](crate::Dao::session).
#[derive(Clone, Debug, Default)]
pub struct SessionOptions {
    pub read_concern: Option<ReadConcern>,
    pub read_preference: Option<SelectionCriteria>,
    pub write_concern: Option<WriteConcern>,
}

impl SessionOptions {
    pub fn to_transaction_options(&self) -> TransactionOptions {
        let mut opts = TransactionOptions::default();
        if let Some(read_concern) = &self.read_concern {
            opts.read_concern = Some(read_concern.clone());
        }
        if let Some(read_preference) = &self.read_preference {
            opts.selection_criteria = Some(read_preference.clone());
        }
        if let Some(write_concern) = &self.write_concern {
            opts.write_concern = Some(write_concern.clone());
        }
        opts
    }
}

/// Per-query driver options.
///
/// One struct covers every operation of a [`Clause`](crate::Clause); each `to_*` method
/// copies only the fields the corresponding driver operation understands and ignores the
/// rest.
#[derive(Clone, Debug, Default)]
pub struct QueryOptions {
    // find, find_one
    pub allow_partial_results: Option<bool>,
    pub collation: Option<Collation>,
    pub comment: Option<Bson>,
    pub hint: Option<Hint>,
    pub max: Option<Document>,
    pub max_await_time: Option<Duration>,
    pub min: Option<Document>,
    pub projection: Option<Document>,
    pub return_key: Option<bool>,
    pub show_record_id: Option<bool>,
    pub skip: Option<u64>,
    pub sort: Option<Document>,

    // find, aggregate
    pub allow_disk_use: Option<bool>,
    pub batch_size: Option<u32>,
    pub cursor_type: Option<CursorType>,
    pub let_vars: Option<Document>,
    pub limit: Option<i64>,
    pub no_cursor_timeout: Option<bool>,

    // update, find_one_and_update
    pub array_filters: Option<Vec<Document>>,
    pub bypass_document_validation: Option<bool>,
    pub upsert: Option<bool>,

    // insert_many
    pub ordered: Option<bool>,

    // find_one_and_update
    pub return_document: Option<ReturnDocument>,

    // create_index
    pub expire_after: Option<Duration>,
    pub name: Option<String>,
    pub sparse: Option<bool>,
    pub storage_engine: Option<Document>,
    pub unique: Option<bool>,
    pub version: Option<IndexVersion>,
    pub default_language: Option<String>,
    pub language_override: Option<String>,
    pub text_index_version: Option<TextIndexVersion>,
    pub weights: Option<Document>,
    pub sphere_2d_index_version: Option<Sphere2DIndexVersion>,
    pub bits: Option<u32>,
    pub index_max: Option<f64>,
    pub index_min: Option<f64>,
    pub bucket_size: Option<u32>,
    pub partial_filter_expression: Option<Document>,
    pub wildcard_projection: Option<Document>,
    pub hidden: Option<bool>,
}

impl QueryOptions {
    pub fn to_find_one(&self) -> FindOneOptions {
        let mut opts = FindOneOptions::default();
        opts.allow_partial_results = self.allow_partial_results;
        opts.collation.clone_from(&self.collation);
        opts.comment.clone_from(&self.comment);
        opts.hint.clone_from(&self.hint);
        opts.max.clone_from(&self.max);
        opts.min.clone_from(&self.min);
        opts.projection.clone_from(&self.projection);
        opts.return_key = self.return_key;
        opts.show_record_id = self.show_record_id;
        opts.skip = self.skip;
        opts.sort.clone_from(&self.sort);
        opts
    }

    pub fn to_find(&self) -> FindOptions {
        let mut opts = FindOptions::default();
        opts.allow_partial_results = self.allow_partial_results;
        opts.collation.clone_from(&self.collation);
        opts.comment.clone_from(&self.comment);
        opts.hint.clone_from(&self.hint);
        opts.max.clone_from(&self.max);
        opts.max_await_time = self.max_await_time;
        opts.min.clone_from(&self.min);
        opts.projection.clone_from(&self.projection);
        opts.return_key = self.return_key;
        opts.show_record_id = self.show_record_id;
        opts.skip = self.skip;
        opts.sort.clone_from(&self.sort);
        opts.allow_disk_use = self.allow_disk_use;
        opts.batch_size = self.batch_size;
        opts.cursor_type.clone_from(&self.cursor_type);
        opts.let_vars.clone_from(&self.let_vars);
        opts.limit = self.limit;
        opts.no_cursor_timeout = self.no_cursor_timeout;
        opts
    }

    pub fn to_find_one_and_update(&self) -> FindOneAndUpdateOptions {
        let mut opts = FindOneAndUpdateOptions::default();
        opts.collation.clone_from(&self.collation);
        opts.comment.clone_from(&self.comment);
        opts.hint.clone_from(&self.hint);
        opts.projection.clone_from(&self.projection);
        opts.sort.clone_from(&self.sort);
        opts.let_vars.clone_from(&self.let_vars);
        opts.array_filters.clone_from(&self.array_filters);
        opts.bypass_document_validation = self.bypass_document_validation;
        opts.upsert = self.upsert;
        opts.return_document.clone_from(&self.return_document);
        opts
    }

    pub fn to_count(&self) -> CountOptions {
        let mut opts = CountOptions::default();
        opts.collation.clone_from(&self.collation);
        opts.comment.clone_from(&self.comment);
        opts.hint.clone_from(&self.hint);
        opts.limit = self.limit.map(i64::unsigned_abs);
        opts.skip = self.skip;
        opts
    }

    pub fn to_delete(&self) -> DeleteOptions {
        let mut opts = DeleteOptions::default();
        opts.collation.clone_from(&self.collation);
        opts.comment.clone_from(&self.comment);
        opts.hint.clone_from(&self.hint);
        opts.let_vars.clone_from(&self.let_vars);
        opts
    }

    pub fn to_update(&self) -> UpdateOptions {
        let mut opts = UpdateOptions::default();
        opts.collation.clone_from(&self.collation);
        opts.comment.clone_from(&self.comment);
        opts.hint.clone_from(&self.hint);
        opts.let_vars.clone_from(&self.let_vars);
        opts.array_filters.clone_from(&self.array_filters);
        opts.bypass_document_validation = self.bypass_document_validation;
        opts.upsert = self.upsert;
        opts
    }

    pub fn to_insert_one(&self) -> InsertOneOptions {
        let mut opts = InsertOneOptions::default();
        opts.bypass_document_validation = self.bypass_document_validation;
        opts.comment.clone_from(&self.comment);
        opts
    }

    pub fn to_insert_many(&self) -> InsertManyOptions {
        let mut opts = InsertManyOptions::default();
        opts.bypass_document_validation = self.bypass_document_validation;
        opts.comment.clone_from(&self.comment);
        opts.ordered = self.ordered;
        opts
    }

    pub fn to_aggregate(&self) -> AggregateOptions {
        let mut opts = AggregateOptions::default();
        opts.collation.clone_from(&self.collation);
        opts.comment.clone_from(&self.comment);
        opts.hint.clone_from(&self.hint);
        opts.max_await_time = self.max_await_time;
        opts.allow_disk_use = self.allow_disk_use;
        opts.batch_size = self.batch_size;
        opts.let_vars.clone_from(&self.let_vars);
        opts.bypass_document_validation = self.bypass_document_validation;
        opts
    }

    pub fn to_index(&self) -> IndexOptions {
        let mut opts = IndexOptions::default();
        opts.collation.clone_from(&self.collation);
        // zero bounds are treated as unset
        opts.max = self.index_max.filter(|max| *max != 0.0);
        opts.min = self.index_min.filter(|min| *min != 0.0);
        opts.expire_after = self.expire_after;
        opts.name.clone_from(&self.name);
        opts.sparse = self.sparse;
        opts.storage_engine.clone_from(&self.storage_engine);
        opts.unique = self.unique;
        opts.version.clone_from(&self.version);
        opts.default_language.clone_from(&self.default_language);
        opts.language_override.clone_from(&self.language_override);
        opts.text_index_version.clone_from(&self.text_index_version);
        opts.weights.clone_from(&self.weights);
        opts.sphere_2d_index_version.clone_from(&self.sphere_2d_index_version);
        opts.bits = self.bits;
        opts.bucket_size = self.bucket_size;
        opts.partial_filter_expression.clone_from(&self.partial_filter_expression);
        opts.wildcard_projection.clone_from(&self.wildcard_projection);
        opts.hidden = self.hidden;
        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::{
        bson::doc,
        options::{Acknowledgment, ReadConcernLevel, ReadPreference},
    };

    #[test]
    fn config_from_yaml() {
        let config = MornConfig::from_yaml_str(
            "uri: mongodb://localhost:27017\n\
             database: app\n\
             gen_id: true\n\
             default_number: 100000\n\
             create_at_field: created_at\n",
        )
        .unwrap();

        assert_eq!(config.uri, "mongodb://localhost:27017");
        assert_eq!(config.database, "app");
        assert_eq!(
            config.options,
            MornOptions::new().gen_id(100_000).create_at_field("created_at")
        );
    }

    #[test]
    fn config_without_options_uses_defaults() {
        let config =
            MornConfig::from_yaml_str("uri: mongodb://localhost\ndatabase: app\n").unwrap();

        assert_eq!(config.options, MornOptions::default());
    }

    #[test]
    fn config_missing_uri_is_an_error() {
        let err = MornConfig::from_yaml_str("database: app\n").unwrap_err();

        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn session_options_copy_only_provided_fields() {
        let opts = SessionOptions {
            read_concern: Some(ReadConcern::majority()),
            read_preference: None,
            write_concern: Some(WriteConcern::majority()),
        }
        .to_transaction_options();

        assert_eq!(
            opts.read_concern.map(|read_concern| read_concern.level),
            Some(ReadConcernLevel::Majority)
        );
        assert!(opts.selection_criteria.is_none());
        assert_eq!(
            opts.write_concern.and_then(|write_concern| write_concern.w),
            Some(Acknowledgment::Majority)
        );

        let opts = SessionOptions {
            read_preference: Some(SelectionCriteria::ReadPreference(ReadPreference::Primary)),
            ..Default::default()
        }
        .to_transaction_options();

        assert!(opts.selection_criteria.is_some());
        assert!(opts.read_concern.is_none());
    }

    #[test]
    fn find_options_carry_cursor_fields() {
        let opts = QueryOptions {
            skip: Some(5),
            limit: Some(10),
            sort: Some(doc! { "name": 1 }),
            batch_size: Some(50),
            allow_disk_use: Some(true),
            unique: Some(true),
            ..Default::default()
        };

        let find = opts.to_find();
        assert_eq!(find.skip, Some(5));
        assert_eq!(find.limit, Some(10));
        assert_eq!(find.sort, Some(doc! { "name": 1 }));
        assert_eq!(find.batch_size, Some(50));
        assert_eq!(find.allow_disk_use, Some(true));

        let find_one = opts.to_find_one();
        assert_eq!(find_one.skip, Some(5));
        assert_eq!(find_one.sort, Some(doc! { "name": 1 }));
    }

    #[test]
    fn count_options_use_absolute_limit() {
        let opts = QueryOptions {
            limit: Some(-3),
            skip: Some(2),
            ..Default::default()
        }
        .to_count();

        assert_eq!(opts.limit, Some(3));
        assert_eq!(opts.skip, Some(2));
    }

    #[test]
    fn write_options_only_take_supported_fields() {
        let opts = QueryOptions {
            upsert: Some(true),
            ordered: Some(false),
            bypass_document_validation: Some(true),
            array_filters: Some(vec![doc! { "x.a": 1 }]),
            return_document: Some(ReturnDocument::After),
            ..Default::default()
        };

        let update = opts.to_update();
        assert_eq!(update.upsert, Some(true));
        assert_eq!(update.array_filters, Some(vec![doc! { "x.a": 1 }]));

        let insert_many = opts.to_insert_many();
        assert_eq!(insert_many.ordered, Some(false));
        assert_eq!(insert_many.bypass_document_validation, Some(true));

        let find_one_and_update = opts.to_find_one_and_update();
        assert_eq!(find_one_and_update.upsert, Some(true));
        assert!(matches!(
            find_one_and_update.return_document,
            Some(ReturnDocument::After)
        ));
    }

    #[test]
    fn index_options_ignore_zero_bounds() {
        let opts = QueryOptions {
            unique: Some(true),
            name: Some("user_id_unique".into()),
            index_max: Some(0.0),
            index_min: Some(-90.0),
            expire_after: Some(Duration::from_secs(60)),
            ..Default::default()
        }
        .to_index();

        assert_eq!(opts.unique, Some(true));
        assert_eq!(opts.name.as_deref(), Some("user_id_unique"));
        assert_eq!(opts.max, None);
        assert_eq!(opts.min, Some(-90.0));
        assert_eq!(opts.expire_after, Some(Duration::from_secs(60)));
    }
}

//! The query builder returned by [`Dao::clause`](crate::Dao::clause) and
//! [`Dao::with_session`](crate::Dao::with_session).
//!
//! A clause collects a filter, paging, sorting and [`QueryOptions`], then runs exactly one
//! operation, which consumes it:
//!
//! ```ignore
//! let users: Vec<User> = dao
//!     .clause()
//!     .filter(doc! { "email": "up@example.com" })
//!     .sort("email:asc")
//!     .limit(10)
//!     .find_many()
//!     .await?;
//! ```

mod aggregate;
mod count;
mod create;
mod delete;
mod find;
mod index;
mod update;

use crate::{
    MornOptions, QueryOptions,
    convert::{self, Order},
    logger::TARGET,
};
use mongodb::{
    ClientSession, Collection,
    bson::Document,
    options::{FindOneOptions, FindOptions},
};
use std::{fmt::Display, marker::PhantomData};
use tracing::error;

pub struct Clause<'a, T> {
    collection: &'a Collection<Document>,
    options: &'a MornOptions,
    session: Option<&'a mut ClientSession>,

    filter: Option<Document>,
    skip: u64,
    limit: i64,
    sort: Option<Document>,
    query_options: Option<QueryOptions>,

    _model: PhantomData<fn() -> T>,
}

impl<'a, T> Clause<'a, T> {
    pub(crate) fn new(
        collection: &'a Collection<Document>,
        options: &'a MornOptions,
        session: Option<&'a mut ClientSession>,
    ) -> Self {
        Self {
            collection,
            options,
            session,
            filter: Some(Document::new()),
            skip: 0,
            limit: 0,
            sort: None,
            query_options: None,
            _model: PhantomData,
        }
    }

    /// Sets the filter of the operation. Defaults to `{}`.
    pub fn filter(mut self, filter: Document) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Removes the filter. [`count`](Clause::count) then falls back to the estimated document
    /// count; every other operation uses `{}`.
    pub fn no_filter(mut self) -> Self {
        self.filter = None;
        self
    }

    /// Ignored unless positive.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Ignored unless positive.
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Sets [`skip`](Clause::skip) and [`limit`](Clause::limit) at once. `offset` is the
    /// number of documents to skip, not a page index.
    pub fn page(self, offset: u64, limit: i64) -> Self {
        self.skip(offset).limit(limit)
    }

    /// Replaces the sort with a `field:asc` or `field:desc` spec.
    ///
    /// A malformed spec is logged and leaves the current sort untouched.
    pub fn sort(mut self, spec: &str) -> Self {
        if spec.is_empty() {
            return self;
        }

        match convert::parse_sort(spec) {
            Ok(sort) => self.sort = Some(sort),
            Err(err) => error!(target: TARGET, %err, spec, "error convert sort"),
        }

        self
    }

    /// Appends a sort key, so calls can be chained for compound sorts.
    pub fn sort_by(mut self, field: impl Display, order: Order) -> Self {
        self.sort
            .get_or_insert_with(Document::new)
            .insert(field.to_string(), order.to_bson());
        self
    }

    pub fn option(mut self, query_options: QueryOptions) -> Self {
        self.query_options = Some(query_options);
        self
    }

    fn find_options(&self) -> FindOptions {
        let mut opts = self
            .query_options
            .as_ref()
            .map(QueryOptions::to_find)
            .unwrap_or_default();

        if self.skip > 0 {
            opts.skip = Some(self.skip);
        }
        if self.limit > 0 {
            opts.limit = Some(self.limit);
        }
        if self.sort.is_some() {
            opts.sort.clone_from(&self.sort);
        }

        opts
    }

    fn find_one_options(&self) -> FindOneOptions {
        let mut opts = self
            .query_options
            .as_ref()
            .map(QueryOptions::to_find_one)
            .unwrap_or_default();

        if self.skip > 0 {
            opts.skip = Some(self.skip);
        }
        if self.sort.is_some() {
            opts.sort.clone_from(&self.sort);
        }

        opts
    }

    fn take_filter(&mut self) -> Document {
        self.filter.take().unwrap_or_default()
    }

    fn create_at_field(&self) -> Option<&'a str> {
        self.options.create_at_field.as_deref()
    }

    fn update_at_field(&self) -> Option<&'a str> {
        self.options.update_at_field.as_deref()
    }
}

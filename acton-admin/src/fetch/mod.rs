//! Row loading and the per-request rendering context
//!
//! Rows are read through the [`AdminStore`] and keyed by the model's flat
//! field names, so the page never sees the wrapper of an embedded base model.
//! Display formatting happens when a value is rendered, not when it is stored.

use std::collections::BTreeMap;

use futures_util::future::try_join_all;

use crate::error::AdminError;
use crate::model::{FieldValue, ResolvedModel};
use crate::state::AdminState;
use crate::store::{AdminStore, Record};

/// One flattened row of a model
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<(String, FieldValue)>,
    id: Option<FieldValue>,
    deleted: bool,
}

impl Row {
    /// Key a fetched record by the model's flat field names
    #[must_use]
    pub fn from_record(model: &ResolvedModel, record: Record) -> Self {
        let values: Vec<(String, FieldValue)> = model
            .fields()
            .iter()
            .map(|f| f.name.clone())
            .zip(record)
            .collect();

        let lookup = |name: Option<&str>| {
            name.and_then(|name| values.iter().find(|(n, _)| n == name))
                .map(|(_, v)| v.clone())
        };
        let id = lookup(model.id_field().map(|f| f.name.as_str()));
        let deleted = lookup(model.soft_delete_field().map(|f| f.name.as_str()))
            .is_some_and(|v| !v.is_null());

        Self { values, id, deleted }
    }

    /// Value of a field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.iter().find(|(n, _)| n == field).map(|(_, v)| v)
    }

    /// Field values in field order
    #[must_use]
    pub fn values(&self) -> &[(String, FieldValue)] {
        &self.values
    }

    /// Display form of a field, empty when absent or `NULL`
    #[must_use]
    pub fn display(&self, field: &str) -> String {
        self.get(field).map(ToString::to_string).unwrap_or_default()
    }

    /// Value to pre-fill an edit input with
    ///
    /// Same as [`Row::display`] except durations, which are edited as whole
    /// seconds.
    #[must_use]
    pub fn input_value(&self, field: &str) -> String {
        match self.get(field) {
            Some(FieldValue::Duration(secs)) => secs.to_string(),
            Some(value) => value.to_string(),
            None => String::new(),
        }
    }

    /// Record identifier as text, empty if the model has no `id` column
    #[must_use]
    pub fn id(&self) -> String {
        self.id.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    /// Whether the soft-delete marker is set
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// Load every row of a model's table
///
/// # Errors
///
/// Returns the store's error if the query fails.
pub async fn fetch_all(store: &dyn AdminStore, model: &ResolvedModel) -> Result<Vec<Row>, AdminError> {
    let table = model.table_name();
    let records = store.fetch_all(&table, model.fields()).await?;
    Ok(records
        .into_iter()
        .map(|record| Row::from_record(model, record))
        .collect())
}

/// Everything the admin page needs for one request
///
/// Built fresh for every list request and owned by that request; concurrent
/// requests never share one.
#[derive(Debug, Clone)]
pub struct RenderingContext {
    snapshot: BTreeMap<String, Vec<Row>>,
    fields: Vec<String>,
    hidden: Vec<String>,
    pages: Vec<String>,
    page_name: String,
    id_field: Option<String>,
}

impl RenderingContext {
    /// Snapshot every registered model and focus the page on `page_name`
    ///
    /// All models are re-read on every call. The reads run concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::UnknownCollection`] before touching the store if
    /// `page_name` is not registered, or the first store error.
    pub async fn build(state: &AdminState, page_name: &str) -> Result<Self, AdminError> {
        let registry = state.registry();
        let active = registry.require(page_name)?;
        let store = state.store();

        let snapshot = try_join_all(registry.models().map(|model| async move {
            fetch_all(store, model)
                .await
                .map(|rows| (model.name().to_string(), rows))
        }))
        .await?
        .into_iter()
        .collect();

        Ok(Self {
            snapshot,
            fields: active.field_names(),
            hidden: state.hidden_fields().to_vec(),
            pages: registry.names(),
            page_name: page_name.to_string(),
            id_field: active.id_field().map(|f| f.name.clone()),
        })
    }

    /// Rows of the active model
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        self.snapshot
            .get(&self.page_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Rows of any snapshotted model
    #[must_use]
    pub fn rows_of(&self, model: &str) -> Option<&[Row]> {
        self.snapshot.get(model).map(Vec::as_slice)
    }

    /// Field names of the active model
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Field names never shown on the page
    #[must_use]
    pub fn hidden(&self) -> &[String] {
        &self.hidden
    }

    /// All registered model names, sorted
    #[must_use]
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Active model name
    #[must_use]
    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    /// Display name of the active model's `id` field
    #[must_use]
    pub fn id_field(&self) -> Option<&str> {
        self.id_field.as_deref()
    }
}

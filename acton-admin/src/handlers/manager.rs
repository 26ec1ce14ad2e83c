//! List, edit and delete handlers for registered models
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | `GET` | `/admin/manager/{collection}` | [`list`] |
//! | `POST` | `/admin/manager/{collection}/edit/{id}` | [`edit`] |
//! | `DELETE` | `/admin/manager/{collection}/delete/{id}` | [`delete`] |
//!
//! Every handler resolves `{collection}` first and answers `400` for an
//! unknown model without touching the store.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Form,
};
use axum_htmx::HxResponseTrigger;
use chrono::Utc;

use crate::coerce::{coerce, coerce_form, Change};
use crate::error::AdminError;
use crate::fetch::RenderingContext;
use crate::model::{FieldKind, ResolvedModel};
use crate::state::AdminState;
use crate::store::DeleteMode;
use crate::template::{ManagerPage, ROW_DELETED_EVENT, ROW_UPDATED_EVENT};

const NO_CACHE: [(header::HeaderName, &str); 3] = [
    (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

/// Render the list page of a model
///
/// Every registered model is re-read for the navigation snapshot.
///
/// # Errors
///
/// - `400` if `collection` is not registered
/// - `500` if a store query or rendering fails
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<AdminState>,
    Path(collection): Path<String>,
) -> Result<Response, AdminError> {
    let context = RenderingContext::build(&state, &collection).await?;
    tracing::debug!(rows = context.rows().len(), "Rendering admin page");

    let html = ManagerPage::new(context).into_html()?;
    Ok((NO_CACHE, html).into_response())
}

/// Apply a submitted form to one record
///
/// The form is coerced completely before anything is written; the first
/// field that fails aborts the request. An empty form writes nothing.
///
/// # Errors
///
/// - `400` if `collection` is not registered, a submitted field is unknown,
///   or a value (including `id`) does not fit its field
/// - `500` if the update fails
#[tracing::instrument(skip(state, form))]
pub async fn edit(
    State(state): State<AdminState>,
    Path((collection, id)): Path<(String, String)>,
    Form(form): Form<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AdminError> {
    let model = state.registry().require(&collection)?;
    let key = record_key(model, &id)?;
    let changes = coerce_form(model, &form)?;

    if changes.is_empty() {
        tracing::debug!("Empty edit, nothing to update");
    } else {
        let affected = state
            .store()
            .update(&model.table_name(), &key, &changes)
            .await?;
        tracing::info!(fields = changes.len(), affected, "Updated admin record");
    }

    Ok((HxResponseTrigger::normal([ROW_UPDATED_EVENT]), ()))
}

/// Delete one record
///
/// Models with a nullable `deleted_at` timestamp are soft-deleted by setting
/// it to the current UTC time; others lose the row.
///
/// # Errors
///
/// - `400` if `collection` is not registered or `id` does not fit the id field
/// - `500` if the delete fails
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<AdminState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AdminError> {
    let model = state.registry().require(&collection)?;
    let key = record_key(model, &id)?;

    let mode = model
        .soft_delete_field()
        .map_or(DeleteMode::Hard, |field| DeleteMode::Soft {
            column: field.column.clone(),
            at: Utc::now().naive_utc(),
        });

    let affected = state
        .store()
        .delete(&model.table_name(), &key, &mode)
        .await?;
    tracing::info!(soft = mode != DeleteMode::Hard, affected, "Deleted admin record");

    Ok((HxResponseTrigger::normal([ROW_DELETED_EVENT]), ()))
}

/// Coerce a path `{id}` by the model's id field
fn record_key(model: &ResolvedModel, id: &str) -> Result<Change, AdminError> {
    let (column, kind) = model
        .id_field()
        .map_or(("id", FieldKind::Text), |field| (field.column.as_str(), field.kind));
    Ok(Change {
        column: column.to_string(),
        kind,
        value: coerce(id, kind, column)?,
    })
}

//! Askama rendering of the admin page

use askama::Template;
use axum::response::Html;

use crate::error::AdminError;
use crate::fetch::{RenderingContext, Row};

pub mod helpers;

/// Event sent in `HX-Trigger` after a successful edit
pub const ROW_UPDATED_EVENT: &str = "admin-row-updated";

/// Event sent in `HX-Trigger` after a successful delete
pub const ROW_DELETED_EVENT: &str = "admin-row-deleted";

struct NavEntry<'a> {
    name: &'a str,
    url: String,
    active: bool,
}

/// The list page of one model
///
/// Shows a navigation entry per registered model and a table of the active
/// model's rows. Hidden fields get no column. Every other field except the
/// id is an editable input bound to the row's edit form. Models without an
/// `id` column are shown read-only.
#[derive(Template)]
#[template(path = "manager.html")]
pub struct ManagerPage {
    context: RenderingContext,
    columns: Vec<String>,
}

impl ManagerPage {
    /// Prepare a page from a rendering context
    #[must_use]
    pub fn new(context: RenderingContext) -> Self {
        let columns = context
            .fields()
            .iter()
            .filter(|field| !context.hidden().contains(*field))
            .cloned()
            .collect();
        Self { context, columns }
    }

    /// Visible columns of the active model
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Render to an HTML body
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Template`] if rendering fails.
    pub fn into_html(self) -> Result<Html<String>, AdminError> {
        Ok(Html(self.render()?))
    }

    fn nav(&self) -> Vec<NavEntry<'_>> {
        self.context
            .pages()
            .iter()
            .map(|page| NavEntry {
                name: page,
                url: helpers::manager_url(page),
                active: page == self.context.page_name(),
            })
            .collect()
    }

    /// Rows can only be addressed through an `id` column
    fn has_key(&self) -> bool {
        self.context.id_field().is_some()
    }

    fn is_editable(&self, column: &str) -> bool {
        self.has_key() && self.context.id_field() != Some(column)
    }

    fn form_id(&self, row: &Row) -> String {
        format!("edit-{}-{}", self.context.page_name(), row.id())
    }

    fn refresh_attrs(&self) -> String {
        helpers::hx_refresh_on(
            &helpers::manager_url(self.context.page_name()),
            "#admin-table",
            &[ROW_UPDATED_EVENT, ROW_DELETED_EVENT],
        )
    }

    fn edit_attrs(&self, row: &Row) -> String {
        helpers::hx_post(
            &helpers::edit_url(self.context.page_name(), &row.id()),
            "none",
        )
    }

    fn delete_attrs(&self, row: &Row) -> String {
        format!(
            "{} {}",
            helpers::hx_delete(&helpers::delete_url(self.context.page_name(), &row.id()), "none"),
            helpers::hx_confirm(&format!("Delete {} {}?", self.context.page_name(), row.id())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldKind, FieldValue, ModelSchema};
    use crate::registry::Registry;
    use crate::state::AdminState;
    use crate::store::MockAdminStore;
    use std::sync::Arc;

    async fn page(hidden: Vec<String>) -> ManagerPage {
        let mut store = MockAdminStore::new();
        store.expect_fetch_all().returning(|table, _| {
            Ok(if table == "users" {
                vec![vec![
                    FieldValue::Integer(7),
                    FieldValue::Text("Ada <admin>".into()),
                    FieldValue::Text("hash".into()),
                ]]
            } else {
                vec![]
            })
        });

        let mut registry = Registry::new();
        registry
            .register_schema(
                ModelSchema::builder("User")
                    .field("ID", FieldKind::Integer)
                    .field("Name", FieldKind::Text)
                    .field("Password", FieldKind::Text)
                    .build(),
            )
            .register_schema(ModelSchema::builder("Post").build());

        let state = AdminState::new(registry, Arc::new(store), hidden);
        ManagerPage::new(RenderingContext::build(&state, "User").await.unwrap())
    }

    #[tokio::test]
    async fn test_hidden_fields_have_no_column() {
        let page = page(vec!["Password".into()]).await;
        assert_eq!(page.columns(), ["ID", "Name"]);

        let html = page.render().unwrap();
        assert!(!html.contains("Password"));
        assert!(!html.contains("hash"));
    }

    #[tokio::test]
    async fn test_page_renders_rows_and_navigation() {
        let html = page(vec![]).await.render().unwrap();

        assert!(html.contains(r#"href="/admin/manager/Post""#));
        assert!(html.contains(r#"hx-post="/admin/manager/User/edit/7""#));
        assert!(html.contains(r#"hx-delete="/admin/manager/User/delete/7""#));
        assert!(html.contains(r#"name="Name""#));
        // Values are escaped
        assert!(html.contains("Ada &lt;admin&gt;"));
        assert!(!html.contains("Ada <admin>"));
    }

    #[tokio::test]
    async fn test_model_without_id_is_read_only() {
        let mut store = MockAdminStore::new();
        store
            .expect_fetch_all()
            .returning(|_, _| Ok(vec![vec![FieldValue::Text("draft".into())]]));

        let mut registry = Registry::new();
        registry.register_schema(
            ModelSchema::builder("Note")
                .field("Label", FieldKind::Text)
                .build(),
        );
        let state = AdminState::new(registry, Arc::new(store), vec![]);
        let page = ManagerPage::new(RenderingContext::build(&state, "Note").await.unwrap());

        let html = page.render().unwrap();
        assert!(html.contains("draft"));
        assert!(!html.contains("<input"));
        assert!(!html.contains("hx-post"));
        assert!(!html.contains("hx-delete"));
    }

    #[tokio::test]
    async fn test_id_is_not_editable() {
        let html = page(vec![]).await.render().unwrap();
        assert!(!html.contains(r#"name="ID""#));
    }
}

//! HTMX attribute helpers for the admin page
//!
//! Each helper returns ready-to-insert attribute text with its values
//! HTML-escaped, so templates emit it with `|safe`.
//!
//! ```rust
//! use acton_admin::template::helpers::hx_post;
//!
//! let attrs = hx_post("/admin/manager/User/edit/1", "none");
//! assert_eq!(attrs, r#"hx-post="/admin/manager/User/edit/1" hx-swap="none""#);
//! ```

use crate::registry::MANAGER_PREFIX;

/// Escape a value for use inside a double-quoted attribute
#[must_use]
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Generate hx-post attribute with swap strategy
#[must_use]
pub fn hx_post(url: &str, swap: &str) -> String {
    format!(
        r#"hx-post="{}" hx-swap="{}""#,
        escape_attr(url),
        escape_attr(swap)
    )
}

/// Generate hx-delete attribute with swap strategy
#[must_use]
pub fn hx_delete(url: &str, swap: &str) -> String {
    format!(
        r#"hx-delete="{}" hx-swap="{}""#,
        escape_attr(url),
        escape_attr(swap)
    )
}

/// Generate hx-confirm attribute for confirmation dialogs
#[must_use]
pub fn hx_confirm(message: &str) -> String {
    format!(r#"hx-confirm="{}""#, escape_attr(message))
}

/// Generate attributes that re-fetch `selector` from `url` whenever one of
/// `events` fires on the body
///
/// ```rust
/// use acton_admin::template::helpers::hx_refresh_on;
///
/// let attrs = hx_refresh_on("/admin/manager/User", "#admin-table", &["admin-row-updated"]);
/// assert!(attrs.contains(r#"hx-trigger="admin-row-updated from:body""#));
/// ```
#[must_use]
pub fn hx_refresh_on(url: &str, selector: &str, events: &[&str]) -> String {
    let trigger = events
        .iter()
        .map(|event| format!("{event} from:body"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"hx-get="{}" hx-trigger="{}" hx-select="{sel}" hx-target="{sel}" hx-swap="outerHTML""#,
        escape_attr(url),
        escape_attr(&trigger),
        sel = escape_attr(selector),
    )
}

/// URL of a model's list page
#[must_use]
pub fn manager_url(collection: &str) -> String {
    format!("{MANAGER_PREFIX}/{collection}")
}

/// URL a row's edits are posted to; `id` is percent-encoded
#[must_use]
pub fn edit_url(collection: &str, id: &str) -> String {
    format!("{MANAGER_PREFIX}/{collection}/edit/{}", urlencoding::encode(id))
}

/// URL a row is deleted through; `id` is percent-encoded
#[must_use]
pub fn delete_url(collection: &str, id: &str) -> String {
    format!("{MANAGER_PREFIX}/{collection}/delete/{}", urlencoding::encode(id))
}

//! Naming conventions for fields, columns and tables
//!
//! Model and field names are written in `PascalCase` (`DeletedAt`, `UserID`)
//! while the database uses lowercase underscore-separated names
//! (`deleted_at`, `user_id`). Table names are the converted model name with a
//! mechanical `s` suffix.
//!
//! # Examples
//!
//! ```rust
//! use acton_admin::naming::{table_name_for, to_snake_like};
//!
//! assert_eq!(to_snake_like("UserID"), "user_id");
//! assert_eq!(table_name_for("UserProfile"), "user_profiles");
//! ```

/// Convert a `PascalCase` or `camelCase` identifier into lowercase
/// underscore-separated form
///
/// A separator is inserted before an uppercase letter (never at position 0)
/// when it follows a lowercase letter, or when it is followed by a lowercase
/// letter. Runs of capitals therefore stay together until the last capital
/// that begins a new word: `HTMLParser` becomes `html_parser`.
///
/// Input that is already lowercase and underscore-joined is returned as is.
/// Each char maps to exactly one lowercase char, so `İD` becomes `id`.
#[must_use]
pub fn to_snake_like(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut out = String::with_capacity(identifier.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev_lower = chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev_lower || next_lower {
                out.push('_');
            }
        }
        // one char in, one char out
        out.push(c.to_lowercase().next().unwrap_or(c));
    }

    out
}

/// Table backing a model: the snake-like model name plus `s`
///
/// No irregular plurals are attempted; `Category` maps to `categorys`.
#[must_use]
pub fn table_name_for(model_name: &str) -> String {
    let mut table = to_snake_like(model_name);
    table.push('s');
    table
}

/// Convert a `snake_case` identifier into `PascalCase`
///
/// Used for display names of fields declared with Rust naming.
#[must_use]
pub fn to_pascal_like(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

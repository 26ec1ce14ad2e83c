//! Model schemas and field introspection
//!
//! A model exposed through the admin panel declares its fields up front as a
//! [`ModelSchema`]: every field has a display name, a column name and a
//! [`FieldKind`]. Embedded base models (an `ID`/`DeletedAt` block shared by
//! many models) are declared as embedded entries and promoted into the flat
//! field set when the schema is resolved. The wrapper name of an embedded
//! block is never part of the flat field set.
//!
//! Schemas are usually produced by `#[derive(AdminModel)]`, but can be written
//! by hand with [`ModelSchema::builder`]:
//!
//! ```rust
//! use acton_admin::{FieldKind, ModelSchema};
//!
//! let base = ModelSchema::builder("Base")
//!     .field("ID", FieldKind::Integer)
//!     .field("DeletedAt", FieldKind::NullableTimestamp)
//!     .build();
//!
//! let user = ModelSchema::builder("User")
//!     .embed("Model", base)
//!     .field("Name", FieldKind::Text)
//!     .build();
//!
//! let names: Vec<_> = user.fields().iter().map(|f| f.name.clone()).collect();
//! assert_eq!(names, ["ID", "DeletedAt", "Name"]);
//! ```

mod value;

pub use value::{format_duration, FieldValue, TIMESTAMP_FORMAT};

use crate::naming::{table_name_for, to_snake_like};

/// Declared kind of a model field
///
/// The kind selects the coercion rule for submitted form values and the
/// decoder used when reading rows from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Boolean
    Bool,
    /// Signed 64-bit integer
    Integer,
    /// 64-bit float
    Float,
    /// Timestamp without timezone
    Timestamp,
    /// Timestamp that may be `NULL` (soft-delete markers)
    NullableTimestamp,
    /// Duration stored as whole seconds
    Duration,
    /// Anything else, handled as text
    Text,
}

impl FieldKind {
    /// Human-readable name used in error messages
    #[must_use]
    pub const fn expected(self) -> &'static str {
        match self {
            Self::Bool => "a boolean",
            Self::Integer | Self::Duration => "an integer",
            Self::Float => "a float",
            Self::Timestamp | Self::NullableTimestamp => "a date",
            Self::Text => "a string",
        }
    }
}

/// A single flat field of a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Display name, as submitted by forms (`DeletedAt`)
    pub name: String,
    /// Column name in the backing table (`deleted_at`)
    pub column: String,
    /// Declared kind
    pub kind: FieldKind,
    /// Whether the column accepts `NULL`; an empty submission stores `NULL`
    pub nullable: bool,
}

impl FieldDef {
    /// Create a field, deriving its column from the display name
    ///
    /// Only [`FieldKind::NullableTimestamp`] fields start out nullable.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let column = to_snake_like(&name);
        Self {
            name,
            column,
            kind,
            nullable: kind == FieldKind::NullableTimestamp,
        }
    }

    /// Mark the column as accepting `NULL`
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// One declared entry of a schema
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaEntry {
    /// A field owned by the model
    Field(FieldDef),
    /// An embedded base model whose fields are promoted
    Embedded {
        /// Wrapper name, dropped on flattening
        wrapper: String,
        /// The embedded schema
        schema: ModelSchema,
    },
}

/// Declared shape of a model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    name: String,
    entries: Vec<SchemaEntry>,
}

impl ModelSchema {
    /// Start building a schema for the named model
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Model name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared entries, before flattening
    #[must_use]
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// Backing table name
    #[must_use]
    pub fn table_name(&self) -> String {
        table_name_for(&self.name)
    }

    /// Flat field list
    ///
    /// Embedded entries are replaced by their own direct fields, spliced in at
    /// the position of the wrapper. Only one level is promoted: entries
    /// embedded inside an embedded model are not carried over.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldDef> {
        let mut fields = Vec::new();
        for entry in &self.entries {
            match entry {
                SchemaEntry::Field(field) => fields.push(field.clone()),
                SchemaEntry::Embedded { schema, .. } => {
                    fields.extend(schema.entries.iter().filter_map(|inner| match inner {
                        SchemaEntry::Field(field) => Some(field.clone()),
                        SchemaEntry::Embedded { .. } => None,
                    }));
                }
            }
        }
        fields
    }

    /// Declared kind of a flat field, `None` if the model has no such field
    #[must_use]
    pub fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.fields()
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.kind)
    }
}

/// Builder for [`ModelSchema`]
#[derive(Debug)]
#[must_use]
pub struct SchemaBuilder {
    name: String,
    entries: Vec<SchemaEntry>,
}

impl SchemaBuilder {
    /// Add a field; the column is the snake-like display name
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.entries.push(SchemaEntry::Field(FieldDef::new(name, kind)));
        self
    }

    /// Add a field with an explicit column name
    pub fn column(
        mut self,
        name: impl Into<String>,
        column: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        self.entries.push(SchemaEntry::Field(FieldDef {
            name: name.into(),
            column: column.into(),
            kind,
            nullable: kind == FieldKind::NullableTimestamp,
        }));
        self
    }

    /// Add a field whose column accepts `NULL` (an `Option<T>` member)
    pub fn optional(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.entries
            .push(SchemaEntry::Field(FieldDef::new(name, kind).nullable()));
        self
    }

    /// Embed a base model under a wrapper name
    pub fn embed(mut self, wrapper: impl Into<String>, schema: ModelSchema) -> Self {
        self.entries.push(SchemaEntry::Embedded {
            wrapper: wrapper.into(),
            schema,
        });
        self
    }

    /// Finish the schema
    pub fn build(self) -> ModelSchema {
        ModelSchema {
            name: self.name,
            entries: self.entries,
        }
    }
}

/// A model resolved for serving: its schema plus the flat field list
///
/// Built once at registration. Lookups go through the flat list, so the
/// wrapper names of embedded models are unknown to every caller.
#[derive(Debug, Clone)]
pub struct ResolvedModel {
    schema: ModelSchema,
    fields: Vec<FieldDef>,
}

impl ResolvedModel {
    /// Flatten a schema
    #[must_use]
    pub fn new(schema: ModelSchema) -> Self {
        let fields = schema.fields();
        Self { schema, fields }
    }

    /// Model name
    #[must_use]
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Backing table name
    #[must_use]
    pub fn table_name(&self) -> String {
        self.schema.table_name()
    }

    /// Flat fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Flat field names in declaration order
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Look up a flat field by display name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared kind of a flat field, `None` if the model has no such field
    #[must_use]
    pub fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.field(name).map(|f| f.kind)
    }

    /// The primary-key field (column `id`)
    #[must_use]
    pub fn id_field(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.column == "id")
    }

    /// The soft-delete marker (nullable timestamp column `deleted_at`)
    #[must_use]
    pub fn soft_delete_field(&self) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|f| f.column == "deleted_at" && f.kind == FieldKind::NullableTimestamp)
    }
}

/// A type that can be exposed through the admin panel
///
/// Usually derived with `#[derive(AdminModel)]`.
pub trait AdminModel {
    /// Declared schema of the model
    fn schema() -> ModelSchema;
}

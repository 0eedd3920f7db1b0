//! Entity metadata boundary.
//!
//! The host front end (reflection, annotations, codegen) produces this; the
//! core only reads it. Column order is the declaration order and drives the
//! render order of column-list tokens.

use crate::casing::to_snake_case;
use serde::{Deserialize, Serialize};

/// Storage type tag for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Bool,
    Int,
    Float,
    Decimal,
    Text,
    DateTime,
    Uuid,
}

/// One column of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Logical (property) name.
    pub name: String,
    /// Storage name override; when absent the cased logical name is used.
    pub storage: Option<String>,
    pub type_tag: TypeTag,
    pub nullable: bool,
    pub primary_key: bool,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            storage: None,
            type_tag,
            nullable: false,
            primary_key: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn storage(mut self, storage: impl Into<String>) -> Self {
        self.storage = Some(storage.into());
        self
    }

    /// The column name as it appears in storage.
    pub fn storage_name(&self) -> String {
        match &self.storage {
            Some(s) => s.clone(),
            None => to_snake_case(&self.name),
        }
    }

    /// Match a logical or storage name, case-insensitively.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.storage_name().eq_ignore_ascii_case(name)
    }
}

/// An entity: table name plus its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    /// Table name, used verbatim (not cased).
    pub table: String,
    pub columns: Vec<ColumnMeta>,
}

impl EntityMeta {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnMeta) -> Self {
        self.columns.push(column);
        self
    }

    /// Primary-key columns in declaration order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    pub fn find(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_entity() -> EntityMeta {
        EntityMeta::new("User")
            .column(ColumnMeta::new("Id", TypeTag::Int).primary_key())
            .column(ColumnMeta::new("UserName", TypeTag::Text))
            .column(ColumnMeta::new("Email", TypeTag::Text).nullable())
    }

    #[test]
    fn test_storage_name_cased() {
        let e = user_entity();
        assert_eq!(e.columns[1].storage_name(), "user_name");
    }

    #[test]
    fn test_storage_override_wins() {
        let c = ColumnMeta::new("LegacyName", TypeTag::Text).storage("LEGACY_NM");
        assert_eq!(c.storage_name(), "LEGACY_NM");
    }

    #[test]
    fn test_primary_keys() {
        let e = user_entity();
        let pks: Vec<_> = e.primary_keys().map(|c| c.name.as_str()).collect();
        assert_eq!(pks, vec!["Id"]);
    }

    #[test]
    fn test_find_matches_either_name() {
        let e = user_entity();
        assert!(e.find("UserName").is_some());
        assert!(e.find("user_name").is_some());
        assert!(e.find("missing").is_none());
    }
}

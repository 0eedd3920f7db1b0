//! Dialect-aware SQL construction with typed expression trees.
//!
//! Build statements as ASTs or resolve `{{...}}` templates against entity
//! metadata; render dialect-correct, parameterized SQL for six engines.
//!
//! ```
//! use sqlforge::prelude::*;
//! use sqlforge::ast::builders::col;
//!
//! let mut query = QueryBuilder::new("users", Dialect::Postgres);
//! query.filter(col("Age").gt(18)).take(20);
//! assert_eq!(
//!     query.to_sql().unwrap(),
//!     "SELECT * FROM \"users\" WHERE \"age\" > 18 LIMIT 20"
//! );
//! ```

pub mod ast;
pub mod builder;
pub mod casing;
pub mod compiler;
pub mod diag;
pub mod dialect;
pub mod error;
pub mod meta;
pub mod template;

pub use builder::{CompiledQuery, QueryBuilder};
pub use dialect::Dialect;

pub mod prelude {
    pub use crate::ast::{AggregateFunc, BinaryOp, Expr, SortOrder, UnaryOp, Value};
    pub use crate::builder::{CompiledQuery, QueryBuilder};
    pub use crate::diag::{Diagnostic, Severity};
    pub use crate::dialect::{Dialect, DialectDescriptor};
    pub use crate::error::{ForgeError, ForgeResult};
    pub use crate::meta::{ColumnMeta, EntityMeta, TypeTag};
    pub use crate::template::{ProcessedTemplate, TemplateContext, process_template};
}

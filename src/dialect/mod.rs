//! Dialect registry.
//!
//! One static descriptor per supported engine, looked up by the [`Dialect`]
//! tag. Descriptors are created once and never mutated.

mod descriptor;

pub use descriptor::{
    ConcatStyle, DateStyle, DialectDescriptor, FunctionTable, PagingStyle, ParamStyle,
};

use crate::error::{ForgeError, ForgeResult};
use serde::{Deserialize, Serialize};

/// Supported SQL engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    SqlServer,
    MySql,
    Postgres,
    Oracle,
    Db2,
    Sqlite,
}

impl Dialect {
    /// All supported dialects, registry order.
    pub const ALL: [Dialect; 6] = [
        Dialect::SqlServer,
        Dialect::MySql,
        Dialect::Postgres,
        Dialect::Oracle,
        Dialect::Db2,
        Dialect::Sqlite,
    ];

    /// Resolve the descriptor for this dialect. Total for all tags.
    pub fn descriptor(&self) -> &'static DialectDescriptor {
        match self {
            Dialect::SqlServer => &SQL_SERVER,
            Dialect::MySql => &MYSQL,
            Dialect::Postgres => &POSTGRES,
            Dialect::Oracle => &ORACLE,
            Dialect::Db2 => &DB2,
            Dialect::Sqlite => &SQLITE,
        }
    }

    /// Resolve a dialect from a runtime name (config files, CLI flags).
    pub fn from_name(name: &str) -> ForgeResult<Dialect> {
        match name.to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            "mysql" => Ok(Dialect::MySql),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "oracle" => Ok(Dialect::Oracle),
            "db2" => Ok(Dialect::Db2),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(ForgeError::UnsupportedDialect(other.to_string())),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.descriptor().name)
    }
}

const ANSI_FUNCTIONS: FunctionTable = FunctionTable {
    abs: "ABS",
    round: "ROUND",
    floor: "FLOOR",
    ceiling: "CEILING",
    sqrt: "SQRT",
    power: "POWER",
    greatest: "GREATEST",
    least: "LEAST",
    length: "LENGTH",
    substring: "SUBSTRING",
    replace: "REPLACE",
    upper: "UPPER",
    lower: "LOWER",
    concat: "CONCAT",
};

static SQL_SERVER: DialectDescriptor = DialectDescriptor {
    name: "sqlserver",
    ident_quote: ("[", "]"),
    string_quote: '\'',
    param: ParamStyle::Named("@"),
    paging: PagingStyle::OffsetFetch,
    bools: ("1", "0"),
    date: DateStyle::QuotedIso,
    concat: ConcatStyle::InfixPlus,
    functions: FunctionTable {
        length: "LEN",
        ..ANSI_FUNCTIONS
    },
};

static MYSQL: DialectDescriptor = DialectDescriptor {
    name: "mysql",
    ident_quote: ("`", "`"),
    string_quote: '\'',
    param: ParamStyle::Named("@"),
    paging: PagingStyle::LimitOffset,
    bools: ("TRUE", "FALSE"),
    date: DateStyle::QuotedIso,
    concat: ConcatStyle::ConcatCall,
    functions: FunctionTable {
        length: "CHAR_LENGTH",
        ..ANSI_FUNCTIONS
    },
};

static POSTGRES: DialectDescriptor = DialectDescriptor {
    name: "postgres",
    ident_quote: ("\"", "\""),
    string_quote: '\'',
    param: ParamStyle::Named("@"),
    paging: PagingStyle::LimitOffset,
    bools: ("TRUE", "FALSE"),
    date: DateStyle::QuotedIso,
    concat: ConcatStyle::InfixPipe,
    functions: FunctionTable {
        ceiling: "CEIL",
        substring: "SUBSTR",
        ..ANSI_FUNCTIONS
    },
};

static ORACLE: DialectDescriptor = DialectDescriptor {
    name: "oracle",
    ident_quote: ("\"", "\""),
    string_quote: '\'',
    param: ParamStyle::Named(":"),
    paging: PagingStyle::OffsetFetch,
    bools: ("1", "0"),
    date: DateStyle::ToDate,
    concat: ConcatStyle::InfixPipe,
    functions: FunctionTable {
        ceiling: "CEIL",
        substring: "SUBSTR",
        ..ANSI_FUNCTIONS
    },
};

static DB2: DialectDescriptor = DialectDescriptor {
    name: "db2",
    ident_quote: ("\"", "\""),
    string_quote: '\'',
    param: ParamStyle::Positional,
    paging: PagingStyle::FetchFirst,
    bools: ("1", "0"),
    date: DateStyle::QuotedIso,
    concat: ConcatStyle::InfixPipe,
    functions: FunctionTable {
        substring: "SUBSTR",
        ..ANSI_FUNCTIONS
    },
};

static SQLITE: DialectDescriptor = DialectDescriptor {
    name: "sqlite",
    ident_quote: ("\"", "\""),
    string_quote: '\'',
    param: ParamStyle::Named("@"),
    paging: PagingStyle::LimitOffset,
    bools: ("1", "0"),
    date: DateStyle::QuotedIso,
    concat: ConcatStyle::InfixPipe,
    functions: FunctionTable {
        ceiling: "CEIL",
        substring: "SUBSTR",
        ..ANSI_FUNCTIONS
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_quoting_per_dialect() {
        assert_eq!(
            Dialect::SqlServer.descriptor().quote_identifier("User"),
            "[User]"
        );
        assert_eq!(Dialect::MySql.descriptor().quote_identifier("User"), "`User`");
        assert_eq!(
            Dialect::Postgres.descriptor().quote_identifier("User"),
            "\"User\""
        );
    }

    #[test]
    fn test_embedded_close_quote_doubled() {
        assert_eq!(
            Dialect::SqlServer.descriptor().quote_identifier("we]ird"),
            "[we]]ird]"
        );
    }

    #[test]
    fn test_dotted_identifier() {
        assert_eq!(
            Dialect::Postgres.descriptor().quote_identifier("u.name"),
            "\"u\".\"name\""
        );
    }

    #[test]
    fn test_string_quote_doubling() {
        for dialect in Dialect::ALL {
            assert_eq!(
                dialect.descriptor().quote_string("O'Connor"),
                "'O''Connor'"
            );
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Dialect::from_name("PostgreSQL").unwrap(), Dialect::Postgres);
        assert_eq!(Dialect::from_name("mssql").unwrap(), Dialect::SqlServer);
        assert!(matches!(
            Dialect::from_name("access"),
            Err(crate::error::ForgeError::UnsupportedDialect(_))
        ));
    }

    #[test]
    fn test_paging_styles() {
        let (sql, _) = Dialect::SqlServer.descriptor().paging(Some(10), Some(20));
        assert_eq!(sql, " OFFSET 10 ROWS FETCH NEXT 20 ROWS ONLY");
        let (sql, _) = Dialect::Postgres.descriptor().paging(Some(10), Some(20));
        assert_eq!(sql, " LIMIT 20 OFFSET 10");
        let (sql, dropped) = Dialect::Db2.descriptor().paging(Some(10), Some(20));
        assert_eq!(sql, " FETCH FIRST 20 ROWS ONLY");
        assert!(dropped);
    }

    #[test]
    fn test_bool_literals() {
        assert_eq!(Dialect::Sqlite.descriptor().bool_literal(true), "1");
        assert_eq!(Dialect::Postgres.descriptor().bool_literal(false), "FALSE");
    }

    #[test]
    fn test_concat_styles() {
        let parts = vec!["'a'".to_string(), "'b'".to_string()];
        assert_eq!(Dialect::SqlServer.descriptor().concat(&parts), "'a' + 'b'");
        assert_eq!(Dialect::MySql.descriptor().concat(&parts), "CONCAT('a', 'b')");
        assert_eq!(Dialect::Oracle.descriptor().concat(&parts), "'a' || 'b'");
    }
}

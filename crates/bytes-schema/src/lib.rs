//! Declarative MySQL schemas and schema-to-DDL diffing.
//!
//! `bytes-schema` lets an application describe the tables it needs and
//! compares that description with what a database already has:
//!
//! - **Builder** - declare tables, columns, indices and foreign keys
//! - **Declarations** - the plain data both sides of a diff are made of
//! - **Difference** - the first property that differs between two entities
//! - **Factory** - the ordered DDL statements that close the gap
//! - **Dialect** - statement rendering (MySQL / InnoDB)
//!
//! Introspecting a live database is left to the caller, who hands the
//! factory a [`Schema`] built from whatever the database reports.
//!
//! # Example
//!
//! ```rust
//! use bytes_schema::prelude::*;
//!
//! # fn main() -> bytes_schema::Result<()> {
//! let mut builder = SchemaBuilder::new();
//! let mut users = builder.table("Users")?;
//! users
//!     .column("UserId", "INT", 10)?
//!     .primary_key()
//!     .auto_increment()
//!     .unsigned()
//!     .not_null();
//! users.column("Email", "VARCHAR", 255)?;
//!
//! let plan = QueryFactory::new().queries(builder.declarations(), &Schema::new())?;
//! assert_eq!(
//!     plan.queries(),
//!     vec![
//!         "CREATE TABLE `Users` (`UserId` INT(10) UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY) \
//!          ENGINE=InnoDB CHARACTER SET utf8 COLLATE utf8_unicode_ci",
//!         "ALTER TABLE `Users` ADD COLUMN `Email` VARCHAR(255) NULL",
//!     ]
//! );
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod declaration;
pub mod dialect;
pub mod difference;
pub mod error;
pub mod factory;
pub mod sanitize;
pub mod types;

pub use builder::{
    ColumnBuilder, ForeignKeyBuilder, IndexBuilder, IntoArguments, SchemaBuilder, TableBuilder,
};
pub use declaration::{
    ColumnDeclaration, ForeignKeyDeclaration, IndexDeclaration, Schema, TableDeclaration,
};
pub use dialect::{DdlDialect, MySqlDialect};
pub use difference::{Difference, Subject};
pub use error::{Result, SchemaError};
pub use factory::{Plan, QueryFactory, Statement, StatementKind};
pub use sanitize::safe_parameter;
pub use types::{DataType, ForeignKeyRule};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::builder::{IntoArguments, SchemaBuilder};
    pub use crate::declaration::{
        ColumnDeclaration, ForeignKeyDeclaration, IndexDeclaration, Schema, TableDeclaration,
    };
    pub use crate::dialect::{DdlDialect, MySqlDialect};
    pub use crate::difference::{Difference, Subject};
    pub use crate::error::{Result, SchemaError};
    pub use crate::factory::{Plan, QueryFactory, Statement, StatementKind};
    pub use crate::types::{DataType, ForeignKeyRule};
}

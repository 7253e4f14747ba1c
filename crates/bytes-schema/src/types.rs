//! Column data types and foreign key rules.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::SchemaError;

/// MySQL column data types accepted in declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    // Numbers, bits & boolean
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    Bool,
    Bit,
    Serial,
    Decimal,
    Float,
    Double,
    Real,
    // Strings
    Char,
    Varchar,
    TinyText,
    Text,
    MediumText,
    LongText,
    Binary,
    VarBinary,
    TinyBlob,
    MediumBlob,
    Blob,
    LongBlob,
    Enum,
    Set,
    // Date & time
    Date,
    DateTime,
    Timestamp,
    Time,
    Year,
    // Geometry
    Geometry,
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    /// A type reported by a live database that declarations cannot use.
    /// Kept so that introspected columns still compare against declarations.
    Unsupported(String),
}

impl DataType {
    /// Every type a declaration may use, in documentation order.
    pub const SUPPORTED: &'static [DataType] = &[
        Self::TinyInt,
        Self::SmallInt,
        Self::MediumInt,
        Self::Int,
        Self::BigInt,
        Self::Bool,
        Self::Bit,
        Self::Serial,
        Self::Decimal,
        Self::Float,
        Self::Double,
        Self::Real,
        Self::Char,
        Self::Varchar,
        Self::TinyText,
        Self::Text,
        Self::MediumText,
        Self::LongText,
        Self::Binary,
        Self::VarBinary,
        Self::TinyBlob,
        Self::MediumBlob,
        Self::Blob,
        Self::LongBlob,
        Self::Enum,
        Self::Set,
        Self::Date,
        Self::DateTime,
        Self::Timestamp,
        Self::Time,
        Self::Year,
        Self::Geometry,
        Self::Point,
        Self::LineString,
        Self::Polygon,
        Self::MultiPoint,
        Self::MultiLineString,
        Self::MultiPolygon,
        Self::GeometryCollection,
    ];

    /// Returns the SQL keyword for this type.
    #[must_use]
    pub fn as_sql(&self) -> &str {
        match self {
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::MediumInt => "MEDIUMINT",
            Self::Int => "INT",
            Self::BigInt => "BIGINT",
            Self::Bool => "BOOL",
            Self::Bit => "BIT",
            Self::Serial => "SERIAL",
            Self::Decimal => "DECIMAL",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Real => "REAL",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::TinyText => "TINYTEXT",
            Self::Text => "TEXT",
            Self::MediumText => "MEDIUMTEXT",
            Self::LongText => "LONGTEXT",
            Self::Binary => "BINARY",
            Self::VarBinary => "VARBINARY",
            Self::TinyBlob => "TINYBLOB",
            Self::MediumBlob => "MEDIUMBLOB",
            Self::Blob => "BLOB",
            Self::LongBlob => "LONGBLOB",
            Self::Enum => "ENUM",
            Self::Set => "SET",
            Self::Date => "DATE",
            Self::DateTime => "DATETIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Time => "TIME",
            Self::Year => "YEAR",
            Self::Geometry => "GEOMETRY",
            Self::Point => "POINT",
            Self::LineString => "LINESTRING",
            Self::Polygon => "POLYGON",
            Self::MultiPoint => "MULTIPOINT",
            Self::MultiLineString => "MULTILINESTRING",
            Self::MultiPolygon => "MULTIPOLYGON",
            Self::GeometryCollection => "GEOMETRYCOLLECTION",
            Self::Unsupported(name) => name,
        }
    }

    /// Interprets a type name reported by the database. Unlike [`FromStr`],
    /// this never fails: unknown names become [`DataType::Unsupported`].
    #[must_use]
    pub fn from_introspected(name: &str) -> Self {
        let upper = name.to_ascii_uppercase();
        upper
            .parse()
            .unwrap_or_else(|_| Self::Unsupported(upper))
    }

    /// The argument list MySQL reports for a column declared without
    /// arguments. Only `INT` has one (its display width).
    #[must_use]
    pub fn default_arguments(&self, unsigned: bool) -> Vec<String> {
        match self {
            Self::Int => vec![if unsigned { "10" } else { "11" }.to_string()],
            _ => Vec::new(),
        }
    }

    fn supported_list() -> String {
        Self::SUPPORTED
            .iter()
            .map(Self::as_sql)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for DataType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SUPPORTED
            .iter()
            .find(|t| t.as_sql() == s)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownDataType {
                given: s.to_string(),
                supported: Self::supported_list(),
            })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_sql())
    }
}

/// Referential action for `ON UPDATE` / `ON DELETE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ForeignKeyRule {
    /// Propagate the change to referencing rows.
    #[default]
    #[serde(rename = "CASCADE")]
    Cascade,
    /// Set the referencing column to NULL.
    #[serde(rename = "SET NULL")]
    SetNull,
    /// Reject the change (deferred check).
    #[serde(rename = "NO ACTION")]
    NoAction,
    /// Reject the change.
    #[serde(rename = "RESTRICT")]
    Restrict,
}

impl ForeignKeyRule {
    /// All supported rules.
    pub const ALL: [ForeignKeyRule; 4] = [Self::Cascade, Self::SetNull, Self::NoAction, Self::Restrict];

    /// Returns the SQL representation of the rule.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
        }
    }
}

impl FromStr for ForeignKeyRule {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.as_sql() == s)
            .ok_or_else(|| SchemaError::UnknownForeignKeyRule {
                given: s.to_string(),
                supported: Self::ALL
                    .iter()
                    .map(|rule| rule.as_sql())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for ForeignKeyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

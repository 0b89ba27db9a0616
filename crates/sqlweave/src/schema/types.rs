//! Per-vendor column type keyword tables.
//!
//! Each category is the union of a shared base list and a vendor-specific list.
//! Lookups are case-insensitive and return the canonical (uppercase) keyword.

use crate::vendor::Vendor;

/// Abstract type tokens.
pub const CHAR: &str = "CHAR";
pub const VARCHAR: &str = "VARCHAR";
pub const TEXT: &str = "TEXT";
pub const NUMERIC: &str = "NUMERIC";
pub const DECIMAL: &str = "DECIMAL";
pub const INT: &str = "INT";
pub const INTEGER: &str = "INTEGER";
pub const SMALLINT: &str = "SMALLINT";
pub const BIGINT: &str = "BIGINT";
pub const FLOAT: &str = "FLOAT";
pub const BOOLEAN: &str = "BOOLEAN";
pub const DATE: &str = "DATE";
pub const TIME: &str = "TIME";
pub const TIMESTAMP: &str = "TIMESTAMP";
pub const DATETIME: &str = "DATETIME";
pub const BLOB: &str = "BLOB";
pub const JSON: &str = "JSON";

/// Replaced by the vendor's auto-increment keyword.
pub const AUTO: &str = "__auto__";
/// Replaced by the vendor's sequence keyword.
pub const SEQUENCE: &str = "__sequence__";

/// Keyword category; decides how size and option arguments render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    String,
    FixedPoint,
    WholeNumber,
    DateTime,
    LargeObject,
}

impl TypeCategory {
    /// Lookup order.
    pub const ALL: [TypeCategory; 5] = [
        TypeCategory::String,
        TypeCategory::FixedPoint,
        TypeCategory::WholeNumber,
        TypeCategory::DateTime,
        TypeCategory::LargeObject,
    ];
}

struct VendorTypes {
    strings: &'static [&'static str],
    fixed: &'static [&'static str],
    whole: &'static [&'static str],
    datetime: &'static [&'static str],
    objects: &'static [&'static str],
    auto_increment: &'static str,
    sequence: &'static str,
}

impl VendorTypes {
    fn vendor_list(&self, category: TypeCategory) -> &'static [&'static str] {
        match category {
            TypeCategory::String => self.strings,
            TypeCategory::FixedPoint => self.fixed,
            TypeCategory::WholeNumber => self.whole,
            TypeCategory::DateTime => self.datetime,
            TypeCategory::LargeObject => self.objects,
        }
    }
}

fn shared(category: TypeCategory) -> &'static [&'static str] {
    match category {
        TypeCategory::String => &["CHAR", "VARCHAR", "TEXT"],
        TypeCategory::FixedPoint => &["NUMERIC", "DECIMAL"],
        TypeCategory::WholeNumber => &["INT", "INTEGER", "SMALLINT", "BIGINT"],
        TypeCategory::DateTime => &["DATE", "TIME", "TIMESTAMP"],
        TypeCategory::LargeObject => &[],
    }
}

static MYSQL: VendorTypes = VendorTypes {
    strings: &[
        "TINYTEXT",
        "MEDIUMTEXT",
        "LONGTEXT",
        "ENUM",
        "SET",
        "BINARY",
        "VARBINARY",
    ],
    fixed: &["FIXED", "DEC"],
    whole: &[
        "TINYINT",
        "MEDIUMINT",
        "FLOAT",
        "DOUBLE",
        "REAL",
        "BIT",
        "BOOL",
        "BOOLEAN",
    ],
    datetime: &["DATETIME", "YEAR"],
    objects: &["TINYBLOB", "BLOB", "MEDIUMBLOB", "LONGBLOB", "JSON"],
    auto_increment: "AUTO_INCREMENT",
    sequence: "AUTO_INCREMENT",
};

static POSTGRESQL: VendorTypes = VendorTypes {
    strings: &["CHARACTER", "BPCHAR", "CITEXT"],
    fixed: &["MONEY"],
    whole: &[
        "SERIAL",
        "BIGSERIAL",
        "SMALLSERIAL",
        "REAL",
        "FLOAT",
        "BOOL",
        "BOOLEAN",
    ],
    datetime: &["TIMESTAMPTZ", "TIMETZ", "INTERVAL"],
    objects: &["BYTEA", "JSON", "JSONB", "UUID", "XML", "INET", "CIDR"],
    auto_increment: "GENERATED BY DEFAULT AS IDENTITY",
    sequence: "SERIAL",
};

static SQLITE3: VendorTypes = VendorTypes {
    strings: &["CLOB", "NCHAR", "NVARCHAR"],
    fixed: &[],
    whole: &["TINYINT", "MEDIUMINT", "REAL", "DOUBLE", "FLOAT", "BOOLEAN"],
    datetime: &["DATETIME"],
    objects: &["BLOB"],
    auto_increment: "AUTOINCREMENT",
    sequence: "AUTOINCREMENT",
};

static SQLSERVER: VendorTypes = VendorTypes {
    strings: &["NCHAR", "NVARCHAR", "NTEXT"],
    fixed: &["DEC", "MONEY", "SMALLMONEY"],
    whole: &["TINYINT", "BIT", "FLOAT", "REAL"],
    datetime: &[
        "DATETIME",
        "DATETIME2",
        "SMALLDATETIME",
        "DATETIMEOFFSET",
    ],
    objects: &["IMAGE", "XML", "BINARY", "VARBINARY", "UNIQUEIDENTIFIER"],
    auto_increment: "IDENTITY(1,1)",
    sequence: "IDENTITY(1,1)",
};

fn vendor_types(vendor: Vendor) -> &'static VendorTypes {
    match vendor {
        Vendor::MySql => &MYSQL,
        Vendor::PostgreSql => &POSTGRESQL,
        Vendor::Sqlite3 => &SQLITE3,
        Vendor::SqlServer => &SQLSERVER,
    }
}

/// Resolve a type token for a vendor, returning its category and canonical keyword.
pub fn lookup(vendor: Vendor, token: &str) -> Option<(TypeCategory, &'static str)> {
    let token = token.trim();
    let types = vendor_types(vendor);
    TypeCategory::ALL.into_iter().find_map(|category| {
        shared(category)
            .iter()
            .chain(types.vendor_list(category))
            .find(|kw| kw.eq_ignore_ascii_case(token))
            .map(|kw| (category, *kw))
    })
}

/// Keyword substituted for [`AUTO`].
pub fn auto_increment(vendor: Vendor) -> &'static str {
    vendor_types(vendor).auto_increment
}

/// Keyword substituted for [`SEQUENCE`].
pub fn sequence(vendor: Vendor) -> &'static str {
    vendor_types(vendor).sequence
}

use crate::{DataType, Ident};

/// Which catalog channel a reflection call goes through.
///
/// `Native` uses the driver's catalog protocol and is fast, but on some
/// server versions its catalog locks can deadlock against concurrent DDL.
/// `Fallback` reads the system views under a snapshot hint: one more round
/// trip, possibly slightly stale, never lock-waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReflectPath {
    #[default]
    Native,
    Fallback,
}

impl ReflectPath {
    #[must_use]
    pub const fn from_fallback_flag(use_fallback: bool) -> Self {
        if use_fallback {
            Self::Fallback
        } else {
            Self::Native
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: Ident,
    pub data_type: DataType,
    pub nullable: bool,
    pub default: Option<String>,
    pub autoincrement: bool,
    pub is_distribution_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrimaryKeyConstraint {
    pub name: Option<Ident>,
    pub constrained_columns: Vec<Ident>,
}

impl PrimaryKeyConstraint {
    /// The "no primary key" answer: no name, no columns.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyConstraint {
    pub name: Option<Ident>,
    pub constrained_columns: Vec<Ident>,
    pub referred_schema: Option<Ident>,
    pub referred_table: Ident,
    pub referred_columns: Vec<Ident>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub name: Ident,
    pub column_names: Vec<Ident>,
    pub unique: bool,
}

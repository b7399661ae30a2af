use std::fmt;
use std::str::FromStr;

/// Logical kinds a value or column can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Unsupported,
    Int,
    Long,
    UInt,
    UBigInt,
    Float,
    Double,
    Decimal,
    Varchar,
    Varbinary,
    Bool,
    Date,
    Time,
    Timestamp,
}

impl TypeTag {
    /// Every tag, in declaration order.
    pub const ALL: [TypeTag; 15] = [
        TypeTag::Null,
        TypeTag::Unsupported,
        TypeTag::Int,
        TypeTag::Long,
        TypeTag::UInt,
        TypeTag::UBigInt,
        TypeTag::Float,
        TypeTag::Double,
        TypeTag::Decimal,
        TypeTag::Varchar,
        TypeTag::Varbinary,
        TypeTag::Bool,
        TypeTag::Date,
        TypeTag::Time,
        TypeTag::Timestamp,
    ];

    /// Canonical upper-case name
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Null => "NULL",
            TypeTag::Unsupported => "UNSUPPORTED",
            TypeTag::Int => "INT",
            TypeTag::Long => "LONG",
            TypeTag::UInt => "U_INT",
            TypeTag::UBigInt => "U_BIGINT",
            TypeTag::Float => "FLOAT",
            TypeTag::Double => "DOUBLE",
            TypeTag::Decimal => "DECIMAL",
            TypeTag::Varchar => "VARCHAR",
            TypeTag::Varbinary => "VARBINARY",
            TypeTag::Bool => "BOOL",
            TypeTag::Date => "DATE",
            TypeTag::Time => "TIME",
            TypeTag::Timestamp => "TIMESTAMP",
        }
    }

    /// Default encoded width in bytes for fixed-width kinds.
    ///
    /// Returns `None` for variable-width kinds and for `Null`/`Unsupported`,
    /// which have no storage representation.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            TypeTag::Int | TypeTag::UInt | TypeTag::Float | TypeTag::Date => Some(4),
            TypeTag::Long
            | TypeTag::UBigInt
            | TypeTag::Double
            | TypeTag::Time
            | TypeTag::Timestamp => Some(8),
            TypeTag::Decimal => Some(16),
            TypeTag::Bool => Some(1),
            TypeTag::Varchar | TypeTag::Varbinary | TypeTag::Null | TypeTag::Unsupported => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, TypeTag::Varchar | TypeTag::Varbinary)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeTag::Int
                | TypeTag::Long
                | TypeTag::UInt
                | TypeTag::UBigInt
                | TypeTag::Float
                | TypeTag::Double
                | TypeTag::Decimal
        )
    }

    fn is_temporal(&self) -> bool {
        matches!(self, TypeTag::Date | TypeTag::Time | TypeTag::Timestamp)
    }

    /// Whether values of this kind can ever be converted to `target`.
    ///
    /// This is the static check used while composing expressions. A `true`
    /// answer does not guarantee every value converts (text may fail to parse).
    pub fn can_convert_to(&self, target: TypeTag) -> bool {
        if *self == TypeTag::Null {
            return true;
        }
        if *self == TypeTag::Unsupported || target == TypeTag::Unsupported {
            return false;
        }
        if target == TypeTag::Null {
            return false;
        }

        let scalar = |t: TypeTag| t.is_numeric() || t.is_temporal() || t == TypeTag::Bool;
        !((*self == TypeTag::Varbinary && scalar(target))
            || (scalar(*self) && target == TypeTag::Varbinary))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let alias = match upper.as_str() {
            "BIGINT" => Some(TypeTag::Long),
            "INTEGER" => Some(TypeTag::Int),
            "BOOLEAN" => Some(TypeTag::Bool),
            "UNSIGNED BIGINT" => Some(TypeTag::UBigInt),
            "TEXT" => Some(TypeTag::Varchar),
            _ => None,
        };

        alias
            .or_else(|| TypeTag::ALL.iter().copied().find(|t| t.name() == upper))
            .ok_or_else(|| format!("Unknown type: {}", s))
    }
}

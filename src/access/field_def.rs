use crate::access::{RowDataError, RowDataResult};
use crate::types::TypeTag;

/// Largest payload a variable-width field can declare (3-byte length prefix).
pub const MAX_VARIABLE_WIDTH: usize = 0xFF_FFFF;

/// Default declared maximum for variable-width fields.
pub const DEFAULT_VARIABLE_WIDTH: usize = 255;

/// How many bytes a field occupies when not null
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    Fixed(usize),
    /// Width is encoded per row as a length prefix followed by up to
    /// `max_width` payload bytes.
    Variable { max_width: usize },
}

/// Layout of one column within a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name: String,
    type_tag: TypeTag,
    width: FieldWidth,
    position: usize,
}

impl FieldDef {
    /// Create a field with the default width for its type
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        let width = match type_tag.fixed_width() {
            Some(size) => FieldWidth::Fixed(size),
            None if type_tag.is_variable() => FieldWidth::Variable {
                max_width: DEFAULT_VARIABLE_WIDTH,
            },
            None => FieldWidth::Fixed(0),
        };

        Self {
            name: name.into(),
            type_tag,
            width,
            position: 0,
        }
    }

    /// Override the declared width.
    ///
    /// For fixed-width integer kinds this narrows the stored width (`LONG`
    /// accepts 1, 2, 3, 4 or 8 bytes; `INT` and `U_INT` accept 1 to 4). For
    /// variable-width kinds it sets the maximum payload length. Other kinds
    /// only accept their default width.
    pub fn with_width(mut self, width: usize) -> RowDataResult<Self> {
        let valid = match self.type_tag {
            TypeTag::Long => matches!(width, 1 | 2 | 3 | 4 | 8),
            TypeTag::Int | TypeTag::UInt => (1..=4).contains(&width),
            TypeTag::Varchar | TypeTag::Varbinary => (1..=MAX_VARIABLE_WIDTH).contains(&width),
            other => other.fixed_width() == Some(width),
        };

        if !valid {
            return Err(RowDataError::InvalidWidth {
                field: self.name,
                type_tag: self.type_tag,
                width,
            });
        }

        self.width = if self.type_tag.is_variable() {
            FieldWidth::Variable { max_width: width }
        } else {
            FieldWidth::Fixed(width)
        };
        Ok(self)
    }

    pub(crate) fn at_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    pub fn width(&self) -> FieldWidth {
        self.width
    }

    /// Ordinal position within the owning row
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.width, FieldWidth::Variable { .. })
    }

    /// Size of the length prefix in bytes; zero for fixed-width fields
    pub fn prefix_width(&self) -> usize {
        match self.width {
            FieldWidth::Fixed(_) => 0,
            FieldWidth::Variable { max_width } if max_width <= 0xFF => 1,
            FieldWidth::Variable { max_width } if max_width <= 0xFFFF => 2,
            FieldWidth::Variable { .. } => 3,
        }
    }

    /// Largest number of bytes a non-null value of this field can occupy
    pub fn max_encoded_width(&self) -> usize {
        match self.width {
            FieldWidth::Fixed(size) => size,
            FieldWidth::Variable { max_width } => self.prefix_width() + max_width,
        }
    }
}

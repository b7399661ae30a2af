use crate::access::FieldDef;
use crate::types::TypeTag;

/// Ordered field layout of one row shape.
///
/// Supplied by the schema provider and shared read-only (usually behind an
/// `Arc`) by every codec and evaluation that touches rows of this shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowDef {
    fields: Vec<FieldDef>,
}

impl RowDef {
    /// Create a row layout; fields are numbered in the order given
    pub fn new(fields: Vec<FieldDef>) -> Self {
        let fields = fields
            .into_iter()
            .enumerate()
            .map(|(position, field)| field.at_position(position))
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldDef> {
        self.fields.get(index)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Find a field's position by name (case-insensitive)
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name().eq_ignore_ascii_case(name))
    }

    pub fn types(&self) -> Vec<TypeTag> {
        self.fields.iter().map(|f| f.type_tag()).collect()
    }
}

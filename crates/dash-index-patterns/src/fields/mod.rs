//! Field descriptors and the ordered field collection

mod collection;
mod field;

pub use collection::FieldCollection;
pub use field::{
    shorten_dotted_string, FieldSpec, FieldSubType, IndexPatternField, MultiSubType,
    NestedSubType,
};

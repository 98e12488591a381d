//! Ordered, name-unique field collection
//!
//! Backed by an [`IndexMap`] so iteration follows insertion order and name
//! lookup stays O(1).

use super::field::{FieldSpec, IndexPatternField};
use crate::error::IndexPatternError;
use indexmap::IndexMap;

/// Field set of an index pattern
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCollection {
    fields: IndexMap<String, IndexPatternField>,
    short_dots_enable: bool,
}

impl FieldCollection {
    /// Create empty collection
    #[inline]
    #[must_use]
    pub fn new(short_dots_enable: bool) -> Self {
        Self {
            fields: IndexMap::new(),
            short_dots_enable,
        }
    }

    /// Build from specs, in iteration order
    ///
    /// # Errors
    /// `DuplicateField` if two specs share a name
    pub fn from_specs<I>(specs: I, short_dots_enable: bool) -> Result<Self, IndexPatternError>
    where
        I: IntoIterator<Item = FieldSpec>,
    {
        let mut collection = Self::new(short_dots_enable);
        for spec in specs {
            collection.add(spec)?;
        }
        Ok(collection)
    }

    /// Insert a new field
    ///
    /// # Errors
    /// `DuplicateField` if the name is taken; the collection is unchanged
    pub fn add(&mut self, spec: FieldSpec) -> Result<&IndexPatternField, IndexPatternError> {
        if self.fields.contains_key(&spec.name) {
            return Err(IndexPatternError::duplicate_field(spec.name));
        }
        let name = spec.name.clone();
        let field = IndexPatternField::new(spec, self.short_dots_enable);
        let (index, _) = self.fields.insert_full(name, field);
        Ok(&self.fields[index])
    }

    /// Insert or replace a field, keeping its position when replaced
    pub fn update(&mut self, spec: FieldSpec) {
        let name = spec.name.clone();
        let field = IndexPatternField::new(spec, self.short_dots_enable);
        self.fields.insert(name, field);
    }

    /// Remove a field by name, preserving the order of the rest
    pub fn remove(&mut self, name: &str) -> Option<IndexPatternField> {
        self.fields.shift_remove(name)
    }

    /// Remove a field by name along with the position it held
    pub fn remove_full(&mut self, name: &str) -> Option<(usize, IndexPatternField)> {
        self.fields
            .shift_remove_full(name)
            .map(|(index, _, field)| (index, field))
    }

    /// Put a field back at `index`, clamped to the end of the collection
    ///
    /// Replaces any field already holding the name.
    pub fn insert_at(&mut self, index: usize, field: IndexPatternField) {
        let index = index.min(self.fields.len());
        self.fields
            .shift_insert(index, field.name().to_string(), field);
    }

    #[inline]
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&IndexPatternField> {
        self.fields.get(name)
    }

    #[inline]
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut IndexPatternField> {
        self.fields.get_mut(name)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fields of a given semantic type, in collection order
    pub fn get_by_type<'a>(
        &'a self,
        field_type: &'a str,
    ) -> impl Iterator<Item = &'a IndexPatternField> + 'a {
        self.fields
            .values()
            .filter(move |f| f.field_type() == field_type)
    }

    /// Iterate fields in collection order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &IndexPatternField> {
        self.fields.values()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Persisted form keyed by field name
    #[must_use]
    pub fn to_spec(&self) -> IndexMap<String, FieldSpec> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.to_spec()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a FieldCollection {
    type Item = &'a IndexPatternField;
    type IntoIter = indexmap::map::Values<'a, String, IndexPatternField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.values()
    }
}

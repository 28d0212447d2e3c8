//! Field and layout editing.
//!
//! A layout is a grid of field IDs. Every field of a level appears exactly
//! once in its layout and rows are never left empty. The same operations
//! work on a model and on the nested field list of an object field.

use super::types::{ContentModel, FieldDefinition, FieldLayout, SchemaError};
use crate::plugins::FieldTypeRegistry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Target slot in a layout. `index: None` means a new row inserted at `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPosition {
    pub row: usize,
    pub index: Option<usize>,
}

impl LayoutPosition {
    pub fn new_row(row: usize) -> Self {
        Self { row, index: None }
    }

    pub fn at(row: usize, index: usize) -> Self {
        Self {
            row,
            index: Some(index),
        }
    }
}

/// One field per row, in declaration order.
pub fn default_layout(fields: &[FieldDefinition]) -> FieldLayout {
    fields.iter().map(|f| vec![f.id.clone()]).collect()
}

/// Mutable view over one level of fields and its layout.
pub struct FieldEditor<'a> {
    fields: &'a mut Vec<FieldDefinition>,
    layout: &'a mut FieldLayout,
}

impl<'a> FieldEditor<'a> {
    pub fn new(fields: &'a mut Vec<FieldDefinition>, layout: &'a mut FieldLayout) -> Self {
        Self { fields, layout }
    }

    /// Adds `field` at `position`, assigning an ID when it has none.
    /// Returns the field's ID.
    pub fn insert_field(
        &mut self,
        mut field: FieldDefinition,
        position: LayoutPosition,
        registry: &FieldTypeRegistry,
    ) -> Result<String, SchemaError> {
        if field.field_type.trim().is_empty() {
            return Err(SchemaError::InvalidField(format!(
                "Field '{}' has no type",
                field.field_id
            )));
        }
        if !registry.contains(&field.field_type) {
            return Err(SchemaError::UnknownFieldType(field.field_type));
        }
        if field.id.is_empty() {
            field.id = Uuid::new_v4().simple().to_string();
        }
        if self.fields.iter().any(|f| f.id == field.id) {
            return Err(SchemaError::InvalidField(format!(
                "Field ID '{}' already exists",
                field.id
            )));
        }

        let id = field.id.clone();
        self.fields.push(field);
        self.place(&id, position);
        Ok(id)
    }

    /// Moves an existing field to `position`.
    pub fn move_field(&mut self, id: &str, position: LayoutPosition) -> Result<(), SchemaError> {
        if !self.fields.iter().any(|f| f.id == id) {
            return Err(SchemaError::NotFound(format!("Field '{}' not found", id)));
        }
        for row in self.layout.iter_mut() {
            row.retain(|field_id| field_id != id);
        }
        self.place(id, position);
        Ok(())
    }

    pub fn move_row(&mut self, source: usize, destination: usize) -> Result<(), SchemaError> {
        if source >= self.layout.len() {
            return Err(SchemaError::InvalidLayout(format!(
                "Row {} does not exist",
                source
            )));
        }
        let row = self.layout.remove(source);
        let destination = destination.min(self.layout.len());
        self.layout.insert(destination, row);
        Ok(())
    }

    /// Replaces the field with the same ID.
    pub fn update_field(&mut self, field: FieldDefinition) -> Result<(), SchemaError> {
        let existing = self
            .fields
            .iter_mut()
            .find(|f| f.id == field.id)
            .ok_or_else(|| SchemaError::NotFound(format!("Field '{}' not found", field.id)))?;
        *existing = field;
        Ok(())
    }

    pub fn delete_field(&mut self, id: &str) -> Result<FieldDefinition, SchemaError> {
        let index = self
            .fields
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| SchemaError::NotFound(format!("Field '{}' not found", id)))?;
        let removed = self.fields.remove(index);
        for row in self.layout.iter_mut() {
            row.retain(|field_id| field_id != id);
        }
        self.prune();
        Ok(removed)
    }

    pub fn field_position(&self, id: &str) -> Option<LayoutPosition> {
        field_position(self.layout, id)
    }

    fn place(&mut self, id: &str, position: LayoutPosition) {
        let row = position.row.min(self.layout.len());
        match position.index {
            Some(index) if row < self.layout.len() => {
                let target = &mut self.layout[row];
                let index = index.min(target.len());
                target.insert(index, id.to_string());
            }
            _ => self.layout.insert(row, vec![id.to_string()]),
        }
        self.prune();
    }

    fn prune(&mut self) {
        self.layout.retain(|row| !row.is_empty());
    }
}

fn field_position(layout: &FieldLayout, id: &str) -> Option<LayoutPosition> {
    layout.iter().enumerate().find_map(|(row, ids)| {
        ids.iter()
            .position(|field_id| field_id == id)
            .map(|index| LayoutPosition::at(row, index))
    })
}

fn resolve_layout<'f>(fields: &'f [FieldDefinition], layout: &FieldLayout) -> Vec<Vec<&'f FieldDefinition>> {
    layout
        .iter()
        .map(|row| {
            row.iter()
                .filter_map(|id| fields.iter().find(|f| &f.id == id))
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}

impl ContentModel {
    /// Editor over the model's top-level fields. A model without a layout
    /// gets the default one-field-per-row layout first.
    pub fn editor(&mut self) -> FieldEditor<'_> {
        let fields = &mut self.fields;
        let layout = self.layout.get_or_insert_with(|| default_layout(fields));
        FieldEditor::new(fields, layout)
    }

    pub fn field_position(&self, id: &str) -> Option<LayoutPosition> {
        match &self.layout {
            Some(layout) => field_position(layout, id),
            None => self
                .fields
                .iter()
                .position(|f| f.id == id)
                .map(|row| LayoutPosition::at(row, 0)),
        }
    }

    /// Rows of field definitions as the editor shows them.
    pub fn fields_in_layout(&self) -> Vec<Vec<&FieldDefinition>> {
        match &self.layout {
            Some(layout) => resolve_layout(&self.fields, layout),
            None => self.fields.iter().map(|f| vec![f]).collect(),
        }
    }
}

impl FieldDefinition {
    /// Editor over the nested fields of an object field.
    pub fn nested_editor(&mut self) -> FieldEditor<'_> {
        let settings = &mut self.settings;
        if settings.layout.is_empty() && !settings.fields.is_empty() {
            settings.layout = default_layout(&settings.fields);
        }
        FieldEditor::new(&mut settings.fields, &mut settings.layout)
    }

    pub fn nested_fields_in_layout(&self) -> Vec<Vec<&FieldDefinition>> {
        if self.settings.layout.is_empty() {
            return self.settings.fields.iter().map(|f| vec![f]).collect();
        }
        resolve_layout(&self.settings.fields, &self.settings.layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FieldTypeRegistry {
        FieldTypeRegistry::with_builtin_field_types()
    }

    fn model() -> ContentModel {
        ContentModel::new("article", "Article").with_fields(vec![
            FieldDefinition::new("a", "title", "text"),
            FieldDefinition::new("b", "body", "rich-text"),
        ])
    }

    #[test]
    fn insert_assigns_id_and_places_field() {
        let mut m = model();
        let id = m
            .editor()
            .insert_field(FieldDefinition::new("", "summary", "long-text"), LayoutPosition::at(0, 1), &registry())
            .unwrap();
        assert!(!id.is_empty());
        assert_eq!(m.field_position(&id), Some(LayoutPosition::at(0, 1)));
        assert_eq!(m.fields.len(), 3);
    }

    #[test]
    fn insert_rejects_unknown_type() {
        let mut m = model();
        let err = m
            .editor()
            .insert_field(FieldDefinition::new("c", "where", "geo-point"), LayoutPosition::new_row(0), &registry())
            .unwrap_err();
        assert_eq!(err, SchemaError::UnknownFieldType("geo-point".to_string()));
    }

    #[test]
    fn move_field_prunes_empty_rows() {
        let mut m = model();
        m.editor().move_field("b", LayoutPosition::at(0, 0)).unwrap();
        assert_eq!(m.layout, Some(vec![vec!["b".to_string(), "a".to_string()]]));

        m.editor().move_field("a", LayoutPosition::new_row(0)).unwrap();
        assert_eq!(
            m.layout,
            Some(vec![vec!["a".to_string()], vec!["b".to_string()]])
        );
    }

    #[test]
    fn move_row_and_delete() {
        let mut m = model();
        m.editor().move_row(1, 0).unwrap();
        assert_eq!(m.field_position("b"), Some(LayoutPosition::at(0, 0)));
        assert!(m.editor().move_row(5, 0).is_err());

        m.editor().delete_field("b").unwrap();
        assert_eq!(m.layout, Some(vec![vec!["a".to_string()]]));
        assert!(m.field_by_id("b").is_none());
    }

    #[test]
    fn update_replaces_by_id() {
        let mut m = model();
        m.editor()
            .update_field(FieldDefinition::new("a", "headline", "text"))
            .unwrap();
        assert_eq!(m.field_by_id("a").unwrap().field_id, "headline");
        assert!(m.editor().update_field(FieldDefinition::new("x", "x", "text")).is_err());
    }

    #[test]
    fn fields_in_layout_without_layout() {
        let m = model();
        let rows = m.fields_in_layout();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0].field_id, "body");
    }

    #[test]
    fn nested_editor_works_on_object_fields() {
        let mut seo = FieldDefinition::new("s", "seo", "object")
            .with_fields(vec![FieldDefinition::new("t", "title", "text")]);
        seo.nested_editor()
            .insert_field(FieldDefinition::new("d", "description", "long-text"), LayoutPosition::at(0, 1), &registry())
            .unwrap();
        let rows = seo.nested_fields_in_layout();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1].field_id, "description");
    }
}

use crate::plugins::{graphql_type, Endpoint, FieldDefs, FieldProjection, FieldTypePlugin};

/// Field type that maps directly onto one GraphQL scalar on both endpoints.
pub struct ScalarField {
    field_type: &'static str,
    graphql_type: &'static str,
    sortable: bool,
    shared_defs: Option<&'static str>,
}

impl ScalarField {
    pub const fn new(field_type: &'static str, graphql_type: &'static str) -> Self {
        Self {
            field_type,
            graphql_type,
            sortable: false,
            shared_defs: None,
        }
    }

    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub const fn with_shared_defs(mut self, defs: &'static str) -> Self {
        self.shared_defs = Some(defs);
        self
    }

    fn render(&self, projection: &FieldProjection<'_>) -> FieldDefs {
        let field = projection.field;
        format!("{}: {}", field.field_id, graphql_type(field, self.graphql_type)).into()
    }
}

impl FieldTypePlugin for ScalarField {
    fn field_type(&self) -> &str {
        self.field_type
    }

    fn is_sortable(&self) -> bool {
        self.sortable
    }

    fn shared_type_defs(&self, _endpoint: Endpoint) -> Option<String> {
        self.shared_defs.map(str::to_string)
    }

    fn create_type_field(&self, projection: &FieldProjection<'_>) -> Option<FieldDefs> {
        Some(self.render(projection))
    }

    fn create_input_field(&self, projection: &FieldProjection<'_>) -> Option<FieldDefs> {
        match projection.endpoint {
            Endpoint::Manage => Some(self.render(projection)),
            Endpoint::Read => None,
        }
    }
}

pub fn text() -> ScalarField {
    ScalarField::new("text", "String").sortable()
}

pub fn long_text() -> ScalarField {
    ScalarField::new("long-text", "String")
}

pub fn number() -> ScalarField {
    ScalarField::new("number", "Float").sortable()
}

pub fn boolean() -> ScalarField {
    ScalarField::new("boolean", "Boolean").sortable()
}

pub fn datetime() -> ScalarField {
    ScalarField::new("datetime", "DateTime")
        .sortable()
        .with_shared_defs("scalar DateTime")
}

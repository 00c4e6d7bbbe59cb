use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};

/// An identifier as written in the schema, with helpers for the spellings
/// the planner needs (GraphQL enum values, storage names).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name {
    src: String,
}

impl Name {
    pub fn new(src: &str) -> Self {
        Self {
            src: src.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.src
    }

    pub fn camel_case(&self) -> String {
        self.src.to_lower_camel_case()
    }

    pub fn upper_camel_case(&self) -> String {
        self.src.to_upper_camel_case()
    }

    pub fn snake_case(&self) -> String {
        self.src.to_snake_case()
    }

    /// `createdAt` becomes `CREATED_AT`.
    pub fn upper_snake_case(&self) -> String {
        self.src.to_shouty_snake_case()
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.src)
    }
}

use std::fmt;

/// Semantic type of an entity field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I32,
    I64,
    String,
    Uuid,
}

impl Type {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::I32 | Self::I64)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "Bool",
            Self::I32 => "I32",
            Self::I64 => "I64",
            Self::String => "String",
            Self::Uuid => "Uuid",
        })
    }
}

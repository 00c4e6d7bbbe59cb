/// Sort direction of an ordering term.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn is_asc(self) -> bool {
        matches!(self, Self::Asc)
    }

    pub fn is_desc(self) -> bool {
        matches!(self, Self::Desc)
    }

    /// Returns the opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

use super::Serializer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
}

impl Serializer {
    pub fn sqlite() -> Serializer {
        Serializer {
            flavor: Flavor::Sqlite,
        }
    }

    pub fn postgresql() -> Serializer {
        Serializer {
            flavor: Flavor::Postgresql,
        }
    }

    pub fn mysql() -> Serializer {
        Serializer {
            flavor: Flavor::Mysql,
        }
    }

    pub(super) fn is_mysql(&self) -> bool {
        self.flavor == Flavor::Mysql
    }

    pub(super) fn is_postgresql(&self) -> bool {
        self.flavor == Flavor::Postgresql
    }
}

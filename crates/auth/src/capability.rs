use serde::Serialize;

use crate::Role;

/// Protected actions and the roles allowed to perform them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CreateHouse,
    ChangeFlatStatus,
    CreateFlat,
    ReadFlats,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::CreateHouse,
        Capability::ChangeFlatStatus,
        Capability::CreateFlat,
        Capability::ReadFlats,
    ];

    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Capability::CreateHouse | Capability::ChangeFlatStatus => &[Role::Moderator],
            Capability::CreateFlat | Capability::ReadFlats => &[Role::Client, Role::Moderator],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::CreateHouse => "create_house",
            Capability::ChangeFlatStatus => "change_flat_status",
            Capability::CreateFlat => "create_flat",
            Capability::ReadFlats => "read_flats",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

use estate_core::UserId;

use crate::{Claims, Role};

/// The acting subject of an authorized request.
///
/// Produced only by [`crate::authorize`]; downstream operations take it as an
/// explicit argument instead of looking it up from request context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }
}

impl From<&Claims> for Principal {
    fn from(claims: &Claims) -> Self {
        Self {
            subject_id: claims.sub,
            role: claims.role,
        }
    }
}

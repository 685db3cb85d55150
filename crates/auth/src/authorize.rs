use thiserror::Error;

use estate_core::DomainError;

use crate::{Capability, Claims, Principal, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("no verified credential")]
    Unauthenticated,

    #[error("role '{role}' is not allowed")]
    Forbidden { role: Role },
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Unauthenticated => DomainError::unauthenticated(value.to_string()),
            AuthzError::Forbidden { .. } => DomainError::forbidden(value.to_string()),
        }
    }
}

/// Decide whether verified claims may act with one of `allowed_roles`.
///
/// - No IO
/// - No panics
/// - Exact role comparison
///
/// Absent claims are always `Unauthenticated`, regardless of `allowed_roles`.
/// On success the acting [`Principal`] is returned so callers pass the subject
/// on explicitly.
pub fn authorize(claims: Option<&Claims>, allowed_roles: &[Role]) -> Result<Principal, AuthzError> {
    let Some(claims) = claims else {
        return Err(AuthzError::Unauthenticated);
    };

    if allowed_roles.contains(&claims.role) {
        Ok(Principal::from(claims))
    } else {
        Err(AuthzError::Forbidden { role: claims.role })
    }
}

/// [`authorize`] against the role set of a [`Capability`].
pub fn authorize_capability(claims: Option<&Claims>, capability: Capability) -> Result<Principal, AuthzError> {
    let outcome = authorize(claims, capability.allowed_roles());
    if let Err(e) = &outcome {
        tracing::warn!(capability = %capability, error = %e, "authorization denied");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use proptest::prelude::*;

    use estate_core::UserId;

    use super::*;

    fn claims(role: Role) -> Claims {
        Claims::new(UserId::new(), role, Utc::now())
    }

    #[test]
    fn capability_table() {
        let client = claims(Role::Client);
        let moderator = claims(Role::Moderator);

        assert_eq!(
            authorize_capability(Some(&client), Capability::CreateHouse),
            Err(AuthzError::Forbidden { role: Role::Client })
        );
        assert_eq!(
            authorize_capability(Some(&client), Capability::ChangeFlatStatus),
            Err(AuthzError::Forbidden { role: Role::Client })
        );
        assert!(authorize_capability(Some(&client), Capability::CreateFlat).is_ok());
        assert!(authorize_capability(Some(&client), Capability::ReadFlats).is_ok());

        for cap in Capability::ALL {
            assert!(authorize_capability(Some(&moderator), cap).is_ok(), "{cap}");
            assert_eq!(
                authorize_capability(None, cap),
                Err(AuthzError::Unauthenticated),
                "{cap}"
            );
        }
    }

    #[test]
    fn principal_carries_subject() {
        let c = claims(Role::Moderator);
        let p = authorize(Some(&c), &[Role::Moderator]).unwrap();
        assert_eq!(p.subject_id, c.sub);
        assert!(p.is_moderator());
    }

    #[test]
    fn empty_role_set_forbids_everyone() {
        for role in Role::ALL {
            assert_eq!(
                authorize(Some(&claims(role)), &[]),
                Err(AuthzError::Forbidden { role })
            );
        }
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::Client), Just(Role::Moderator)]
    }

    proptest! {
        #[test]
        fn allowed_iff_present_and_member(
            role in proptest::option::of(role_strategy()),
            allowed in proptest::collection::vec(role_strategy(), 0..3),
        ) {
            let c = role.map(claims);
            let outcome = authorize(c.as_ref(), &allowed);

            match (role, outcome) {
                (None, Err(AuthzError::Unauthenticated)) => {}
                (Some(r), Ok(p)) => {
                    prop_assert!(allowed.contains(&r));
                    prop_assert_eq!(p.role, r);
                }
                (Some(r), Err(AuthzError::Forbidden { role: denied })) => {
                    prop_assert!(!allowed.contains(&r));
                    prop_assert_eq!(denied, r);
                }
                (role, outcome) => prop_assert!(false, "unexpected {:?} -> {:?}", role, outcome),
            }
        }
    }
}

//! Ownership policy.
//!
//! Every mutation of an owned resource goes through [`check_owner`]. The
//! comparison is by identifier value.

use anyhow::anyhow;
use vidtube_core::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

impl Access {
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Converts a denial into a `Forbidden` error naming the resource kind.
    pub fn require(self, resource: &str) -> Result<(), AppError> {
        match self {
            Self::Granted => Ok(()),
            Self::Denied => Err(AppError::forbidden(anyhow!(
                "You are not the owner of this {resource}"
            ))),
        }
    }
}

pub fn check_owner<Id: PartialEq>(owner: &Id, caller: &Id) -> Access {
    if owner == caller {
        Access::Granted
    } else {
        Access::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use vidtube_core::ErrorKind;

    #[test]
    fn test_owner_is_granted() {
        let id = Uuid::new_v4();
        assert_eq!(check_owner(&id, &id), Access::Granted);
    }

    #[test]
    fn test_equal_values_from_different_sources_are_granted() {
        let raw = "6f9619ff-8b86-d011-b42d-00c04fc964ff";
        let from_db: Uuid = raw.parse().unwrap();
        let from_token: Uuid = raw.to_uppercase().parse().unwrap();
        assert!(check_owner(&from_db, &from_token).is_granted());
    }

    #[test]
    fn test_other_caller_is_denied() {
        let access = check_owner(&Uuid::new_v4(), &Uuid::new_v4());
        assert_eq!(access, Access::Denied);

        let err = access.require("playlist").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(err.error.to_string().contains("playlist"));
    }
}

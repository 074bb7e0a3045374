//! Load-then-authorize for owned resources.
//!
//! Services fetch a row with `fetch_optional` and pass the result straight to
//! [`authorize_owner`]: a missing row is `NotFound`, someone else's row is
//! `Forbidden`, and only the owner gets the resource back to mutate.

use anyhow::anyhow;
use vidtube_auth::check_owner;
use vidtube_core::AppError;

use crate::ids::UserId;

/// A resource with a single owning user.
pub trait Owned {
    /// Human-readable kind used in error messages.
    const KIND: &'static str;

    fn owner_id(&self) -> UserId;
}

pub fn authorize_owner<R: Owned>(resource: Option<R>, caller: UserId) -> Result<R, AppError> {
    let resource = resource
        .ok_or_else(|| AppError::not_found(anyhow!("{} not found", capitalize(R::KIND))))?;

    check_owner(&resource.owner_id(), &caller).require(R::KIND)?;

    Ok(resource)
}

fn capitalize(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidtube_core::ErrorKind;

    #[derive(Debug)]
    struct Note {
        owner: UserId,
    }

    impl Owned for Note {
        const KIND: &'static str = "note";

        fn owner_id(&self) -> UserId {
            self.owner
        }
    }

    #[test]
    fn test_missing_resource_is_not_found() {
        let err = authorize_owner::<Note>(None, UserId::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.error.to_string(), "Note not found");
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let note = Note { owner: UserId::new() };
        let err = authorize_owner(Some(note), UserId::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_owner_gets_resource_back() {
        let owner = UserId::new();
        let note = authorize_owner(Some(Note { owner }), owner).unwrap();
        assert_eq!(note.owner, owner);
    }
}

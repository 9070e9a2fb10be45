//! Typed entity identifiers.
//!
//! [`Id<T>`] is a UUID with a phantom marker, so an account id and a token
//! id are distinct types even though both are plain UUIDs at rest. Mixing
//! them up is a compile error instead of a data bug.

use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A UUID tagged with the entity it identifies
///
/// ```
/// use kernel::id::{Id, markers};
/// type AccountId = Id<markers::Account>;
/// ```
pub struct Id<T> {
    value: uuid::Uuid,
    _marker: PhantomData<T>,
}

// Manual impls instead of derives: derives would add `T: Clone` etc.
// bounds, but the phantom marker never needs them.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> Id<T> {
    /// A fresh random identifier (UUID v4)
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4(),
            _marker: PhantomData,
        }
    }

    /// Wrap a UUID loaded from storage
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid,
            _marker: PhantomData,
        }
    }

    /// Borrow the raw UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }

    /// Unwrap into the raw UUID
    pub fn into_uuid(self) -> Uuid {
        self.value
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T> From<Id<T>> for Uuid {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

/// Phantom markers, one per identified entity
pub mod markers {
    pub struct Account;
    pub struct VerificationToken;
}

pub type AccountId = Id<markers::Account>;
pub type VerificationTokenId = Id<markers::VerificationToken>;

#[cfg(test)]
mod tests {
    use super::*;

    fn takes_account_id(_: AccountId) {}

    #[test]
    fn test_markers_make_distinct_types() {
        let account_id = AccountId::new();
        takes_account_id(account_id);
        // `takes_account_id(VerificationTokenId::new())` would not compile
    }

    #[test]
    fn test_uuid_roundtrip() {
        let raw = Uuid::new_v4();
        let id = AccountId::from_uuid(raw);
        assert_eq!(id.as_uuid(), &raw);
        assert_eq!(id.into_uuid(), raw);
        assert_eq!(Uuid::from(AccountId::from(raw)), raw);
    }

    #[test]
    fn test_display_is_bare_uuid() {
        let raw = Uuid::new_v4();
        let id = VerificationTokenId::from_uuid(raw);
        assert_eq!(id.to_string(), raw.to_string());
        assert_eq!(format!("{:?}", id), format!("Id({})", raw));
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(AccountId::new(), AccountId::new());
    }
}

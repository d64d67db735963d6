//! Reduced, secret-free view of an authenticated identity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Identity, Role};

/// Post-authentication principal carried in tokens and request extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    #[schema(example = 42)]
    pub id: i64,
    /// Derived display name, may be empty
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Token subject, the id in string form
    #[schema(example = "42")]
    pub subject: String,
    pub role: Role,
}

impl Profile {
    pub fn new(id: i64, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            subject: id.to_string(),
            role,
        }
    }
}

impl From<&Identity> for Profile {
    fn from(identity: &Identity) -> Self {
        let name = display_name(identity.first_name.as_deref(), identity.last_name.as_deref());
        Self::new(identity.id, name, identity.role)
    }
}

/// `"first last"`, whichever half is present, or empty. Blank parts count as absent.
pub fn display_name(first: Option<&str>, last: Option<&str>) -> String {
    let first = first.map(str::trim).filter(|s| !s.is_empty());
    let last = last.map(str::trim).filter(|s| !s.is_empty());

    match (first, last) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_rules() {
        assert_eq!(display_name(Some("Ada"), None), "Ada");
        assert_eq!(display_name(None, Some("Lovelace")), "Lovelace");
        assert_eq!(display_name(Some("Ada"), Some("Lovelace")), "Ada Lovelace");
        assert_eq!(display_name(None, None), "");
        assert_eq!(display_name(Some(""), Some("Lovelace")), "Lovelace");
        assert_eq!(display_name(Some("   "), Some("Lovelace")), "Lovelace");
        assert_eq!(display_name(Some(" Ada "), Some("\t")), "Ada");
    }

    #[test]
    fn test_subject_is_stringified_id() {
        let profile = Profile::new(1234, "", Role::Admin);
        assert_eq!(profile.subject, "1234");
        assert_eq!(profile.role, Role::Admin);
    }
}

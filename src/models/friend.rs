use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::Patch;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a friend. Blank optional fields are stored as NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFriend {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewFriend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Validate and normalize in place. Runs before anything touches the store.
    pub fn validate(&mut self) -> Result<()> {
        self.name = validate_name(&self.name)?;
        self.email = normalize_optional(self.email.take());
        self.phone = normalize_optional(self.phone.take());
        self.notes = normalize_optional(self.notes.take());
        if let Some(ref e) = self.email {
            validate_email(e)?;
        }
        Ok(())
    }
}

/// Partial update for a friend. Only `Patch::Set` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FriendUpdate {
    pub name: Patch<String>,
    pub email: Patch<Option<String>>,
    pub phone: Patch<Option<String>>,
    pub notes: Patch<Option<String>>,
}

impl FriendUpdate {
    pub fn is_empty(&self) -> bool {
        !(self.name.is_set() || self.email.is_set() || self.phone.is_set() || self.notes.is_set())
    }

    /// Validate and normalize the supplied fields with the same rules as
    /// `NewFriend::validate`. A blank optional value becomes `Set(None)`.
    pub fn validate(&mut self) -> Result<()> {
        if let Patch::Set(ref mut name) = self.name {
            *name = validate_name(name)?;
        }
        for field in [&mut self.email, &mut self.phone, &mut self.notes] {
            if let Patch::Set(value) = field {
                *value = normalize_optional(value.take());
            }
        }
        if let Patch::Set(Some(ref email)) = self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// Merge supplied fields over `friend`. Call `validate` first.
    pub fn apply(self, friend: &mut Friend) {
        self.name.apply_to(&mut friend.name);
        self.email.apply_to(&mut friend.email);
        self.phone.apply_to(&mut friend.phone);
        self.notes.apply_to(&mut friend.notes);
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Name is required"));
    }
    Ok(trimmed.to_string())
}

fn validate_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(Error::validation(format!("Invalid email format: {}", email)))
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Basic shape check: one `@`, non-empty local part, dotted domain, no spaces.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern is valid")
    });
    re.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("user.name@domain.co.uk"));
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@domain.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@domain"));
        assert!(!is_valid_email("us er@domain.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn test_new_friend_validation_normalizes() {
        let mut input = NewFriend::new("  Ada  ").with_phone("   ").with_notes("");
        input.validate().unwrap();
        assert_eq!(input.name, "Ada");
        assert_eq!(input.phone, None);
        assert_eq!(input.notes, None);
    }

    #[test]
    fn test_new_friend_rejects_blank_name() {
        let mut input = NewFriend::new("   ");
        assert!(input.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_new_friend_rejects_bad_email() {
        let mut input = NewFriend::new("Bob").with_email("not-an-email");
        assert!(input.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_update_apply_merges_only_set_fields() {
        let now = Utc::now();
        let mut friend = Friend {
            id: 1,
            name: "Ada".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: Some("555-0100".to_string()),
            notes: Some("met at work".to_string()),
            created_at: now,
            updated_at: now,
        };

        let mut update = FriendUpdate {
            phone: Patch::Set(None),
            notes: Patch::Set(Some("college".to_string())),
            ..FriendUpdate::default()
        };
        update.validate().unwrap();
        update.apply(&mut friend);

        assert_eq!(friend.name, "Ada");
        assert_eq!(friend.email.as_deref(), Some("ada@example.com"));
        assert_eq!(friend.phone, None);
        assert_eq!(friend.notes.as_deref(), Some("college"));
    }

    #[test]
    fn test_update_validation() {
        let mut update = FriendUpdate {
            name: Patch::Set(String::new()),
            ..FriendUpdate::default()
        };
        assert!(update.validate().is_err());

        let mut update = FriendUpdate {
            email: Patch::Set(Some("nope".to_string())),
            ..FriendUpdate::default()
        };
        assert!(update.validate().is_err());

        // Clearing an email is always allowed
        let mut update = FriendUpdate {
            email: Patch::Set(None),
            ..FriendUpdate::default()
        };
        assert!(update.validate().is_ok());
        assert!(!update.is_empty());
        assert!(FriendUpdate::default().is_empty());
    }

    #[test]
    fn test_update_validation_normalizes() {
        let mut update = FriendUpdate {
            name: Patch::Set("  Ada  ".to_string()),
            email: Patch::Set(Some(" ada@example.com ".to_string())),
            phone: Patch::Set(Some("   ".to_string())),
            notes: Patch::Set(Some(String::new())),
        };
        update.validate().unwrap();

        assert_eq!(update.name, Patch::Set("Ada".to_string()));
        assert_eq!(update.email, Patch::Set(Some("ada@example.com".to_string())));
        assert_eq!(update.phone, Patch::Set(None));
        assert_eq!(update.notes, Patch::Set(None));
    }
}

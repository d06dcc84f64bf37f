//! Authenticated customer entity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::serde_utils;

/// Backend user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(#[serde(deserialize_with = "serde_utils::id_string")] String);

impl UserId {
    /// Returns identifier as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Registration profile attached to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Given name.
    #[serde(default)]
    pub name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Date of birth.
    #[serde(default, deserialize_with = "serde_utils::opt_flexible_date")]
    pub date_of_birth: Option<NaiveDate>,
    /// Government identity document number.
    #[serde(default)]
    pub document_number: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Snapshot of the authenticated user for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: String,
    #[serde(default, deserialize_with = "serde_utils::string_or_seq")]
    roles: Vec<String>,
    #[serde(flatten)]
    profile: Profile,
}

impl User {
    /// Creates user without profile details.
    #[must_use]
    pub fn new(
        id: impl Into<UserId>,
        email: impl Into<String>,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            profile: Profile::default(),
        }
    }

    /// Attaches profile details.
    #[must_use]
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Returns whether user carries role (case-insensitive).
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Returns the best available display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.profile.name, &self.profile.last_name) {
            (Some(name), Some(last)) => format!("{name} {last}"),
            (Some(name), None) => name.clone(),
            _ => self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_user_payload() {
        let user: User =
            serde_json::from_str(r#"{"id":"1","email":"a@b.com","roles":"USER"}"#).unwrap();

        assert_eq!(user.id().as_str(), "1");
        assert_eq!(user.email(), "a@b.com");
        assert!(user.has_role("user"));
        assert_eq!(user.profile(), &Profile::default());
    }

    #[test]
    fn test_parse_full_profile() {
        let user: User = serde_json::from_str(
            r#"{
                "id": 7,
                "email": "ana@metro.test",
                "roles": ["USER", "ADMIN"],
                "name": "Ana",
                "lastName": "Lopez",
                "dateOfBirth": "1992-11-03",
                "documentNumber": "12345678",
                "phone": "+5491100000000"
            }"#,
        )
        .unwrap();

        assert_eq!(user.id().as_str(), "7");
        assert!(user.has_role("ADMIN"));
        assert_eq!(user.display_name(), "Ana Lopez");
        assert_eq!(
            user.profile().date_of_birth,
            NaiveDate::from_ymd_opt(1992, 11, 3)
        );
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User::new("1", "a@b.com", ["USER"]);
        assert_eq!(user.display_name(), "a@b.com");
    }
}

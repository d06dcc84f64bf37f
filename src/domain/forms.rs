//! Login and registration form schemas.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use serde::Serialize;
use validator::{Validate, ValidationError};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum age accepted at registration.
pub const MIN_REGISTRATION_AGE: i32 = 13;

static DOCUMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{6,12}$").expect("valid document regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("valid phone regex"));

/// Credentials submitted by the login form.
#[derive(Clone, Serialize, Validate, Zeroize, ZeroizeOnDrop)]
pub struct LoginForm {
    #[validate(email(message = "must be a valid email address"))]
    email: String,
    #[validate(length(min = 1, message = "is required"))]
    password: String,
}

impl LoginForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Account registration payload.
#[derive(Clone, Serialize, Validate, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 80, message = "is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 80, message = "is required"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[zeroize(skip)]
    #[validate(custom(function = "validate_birth_date"))]
    pub date_of_birth: NaiveDate,
    #[validate(regex(path = *DOCUMENT_RE, message = "must be 6 to 12 letters or digits"))]
    pub document_number: String,
    #[validate(regex(path = *PHONE_RE, message = "must be 7 to 15 digits"))]
    pub phone: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

/// Requires at least 8 characters with lowercase, uppercase, digit and symbol.
fn validate_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 8;
    let has_lower = password.chars().any(char::is_lowercase);
    let has_upper = password.chars().any(char::is_uppercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if long_enough && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(ValidationError::new("weak_password").with_message(
            "must have 8+ characters with upper and lower case letters, a digit and a symbol"
                .into(),
        ))
    }
}

fn validate_birth_date(date: &NaiveDate) -> Result<(), ValidationError> {
    let today = Utc::now().date_naive();
    if *date > today {
        return Err(ValidationError::new("future_date").with_message("is in the future".into()));
    }

    let mut age = today.year() - date.year();
    if (today.month(), today.day()) < (date.month(), date.day()) {
        age -= 1;
    }

    if age < MIN_REGISTRATION_AGE {
        return Err(ValidationError::new("too_young")
            .with_message(format!("must be at least {MIN_REGISTRATION_AGE} years old").into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RequestError;
    use test_case::test_case;

    fn register_form() -> RegisterForm {
        RegisterForm {
            name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            email: "ana@metro.test".to_string(),
            password: "Aa1@2345".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            document_number: "AB123456".to_string(),
            phone: "+5491122334455".to_string(),
        }
    }

    #[test]
    fn test_login_form_valid() {
        assert!(LoginForm::new("a@b.com", "Aa1@2345").validate().is_ok());
    }

    #[test]
    fn test_login_form_trims_email() {
        let form = LoginForm::new("  a@b.com ", "x");
        assert_eq!(form.email(), "a@b.com");
    }

    #[test]
    fn test_login_form_reports_fields() {
        let error: RequestError = LoginForm::new("not-an-email", "")
            .validate()
            .unwrap_err()
            .into();

        let fields = error.field_errors().unwrap();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_register_form_valid() {
        assert!(register_form().validate().is_ok());
    }

    #[test_case("short1A!" , true ; "exactly_eight")]
    #[test_case("Aa1@2345" , true ; "scenario_password")]
    #[test_case("aa1@2345" , false ; "no_upper")]
    #[test_case("AA1@2345" , false ; "no_lower")]
    #[test_case("Aab@cdef" , false ; "no_digit")]
    #[test_case("Aa112345" , false ; "no_symbol")]
    #[test_case("Aa1@234" , false ; "too_short")]
    fn test_password_strength(password: &str, ok: bool) {
        assert_eq!(validate_password(password).is_ok(), ok);
    }

    #[test]
    fn test_register_rejects_future_birth_date() {
        let mut form = register_form();
        form.date_of_birth = Utc::now().date_naive() + chrono::Duration::days(1);

        let error: RequestError = form.validate().unwrap_err().into();
        let fields = error.field_errors().unwrap();
        assert!(fields.contains_key("date_of_birth") || fields.contains_key("dateOfBirth"));
    }

    #[test]
    fn test_register_rejects_bad_phone_and_document() {
        let mut form = register_form();
        form.phone = "call me".to_string();
        form.document_number = "12".to_string();

        let error: RequestError = form.validate().unwrap_err().into();
        let fields = error.field_errors().unwrap();
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("document_number") || fields.contains_key("documentNumber"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let output = format!("{:?}", LoginForm::new("a@b.com", "Aa1@2345"));
        assert!(!output.contains("Aa1@2345"));
    }

    #[test]
    fn test_register_serializes_camel_case() {
        let json = serde_json::to_value(register_form()).unwrap();
        assert_eq!(json["lastName"], "Lopez");
        assert_eq!(json["dateOfBirth"], "1990-01-01");
        assert_eq!(json["documentNumber"], "AB123456");
    }
}

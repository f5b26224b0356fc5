//! Forms backing the "my info" page.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::character::Character;
use crate::domain::feedback::parse_calendar_day;
use crate::domain::member::{Career, MemberPatch, PasswordChange};
use crate::domain::types::{CharacterId, NonEmptyString};
use crate::forms::{FormError, not_blank};

/// Longest phone number accepted by the backend.
pub const MAX_PHONE_LEN: usize = 15;

/// Keeps digits only, truncated to [`MAX_PHONE_LEN`].
pub fn sanitize_phone_input(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(MAX_PHONE_LEN)
        .collect()
}

fn check_phone(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_PHONE_LEN {
        return Err(ValidationError::new("phone_length")
            .with_message("phone numbers can have at most 15 digits".into()));
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("phone_digits")
            .with_message("phone numbers may only contain digits".into()));
    }
    Ok(())
}

fn primary_phone(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(
            ValidationError::new("required").with_message("phone number 1 is required".into())
        );
    }
    check_phone(value)
}

fn address_part(value: &str) -> Result<(), ValidationError> {
    not_blank(value)
        .map_err(|err| err.with_message("city, district and dong are required".into()))
}

fn career_text(value: &str) -> Result<(), ValidationError> {
    not_blank(value).map_err(|err| {
        err.with_message("company, position and a start date from 1900-01-01 are required".into())
    })
}

fn earliest_career_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn career_start_date(value: &str) -> Result<(), ValidationError> {
    match parse_calendar_day(value) {
        Some(date) if date >= earliest_career_date() => Ok(()),
        _ => Err(ValidationError::new("start_date")
            .with_message("company, position and a start date from 1900-01-01 are required".into())),
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Character picker.
pub struct CharacterForm {
    #[validate(range(min = 1, max = 6, message = "unknown character"))]
    pub profile: i64,
}

impl CharacterForm {
    pub fn into_patch(self) -> Result<MemberPatch, FormError> {
        self.validate()?;
        let id = CharacterId::new(self.profile).map_err(|_| FormError::InvalidCharacter)?;
        log::debug!("Switching character to {}", Character::from(id).name());
        Ok(MemberPatch {
            profile: Some(id),
            ..MemberPatch::default()
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Primary and optional secondary phone number.
pub struct PhoneForm {
    #[validate(custom(function = "primary_phone"))]
    pub tel1: String,
    #[validate(custom(function = "check_phone"))]
    pub tel2: Option<String>,
}

impl PhoneForm {
    pub fn into_patch(self) -> Result<MemberPatch, FormError> {
        self.validate()?;
        Ok(MemberPatch {
            tel1: Some(self.tel1),
            tel2: Some(self.tel2.unwrap_or_default()),
            ..MemberPatch::default()
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddressForm {
    #[validate(custom(function = "address_part"))]
    pub city: String,
    #[validate(custom(function = "address_part"))]
    pub district: String,
    #[validate(custom(function = "address_part"))]
    pub dong: String,
    pub detail: Option<String>,
}

impl AddressForm {
    pub fn into_patch(self) -> Result<MemberPatch, FormError> {
        self.validate()?;
        Ok(MemberPatch {
            city: Some(self.city),
            district: Some(self.district),
            dong: Some(self.dong),
            detail: Some(self.detail.unwrap_or_default()),
            ..MemberPatch::default()
        })
    }
}

fn password_differs(form: &PasswordForm) -> Result<(), ValidationError> {
    if form.current_password == form.new_password {
        Err(ValidationError::new("same_password")
            .with_message("the new password must differ from the current one".into()))
    } else {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "password_differs"))]
pub struct PasswordForm {
    #[validate(length(min = 1, message = "all password fields are required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "passwords need at least 6 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "password confirmation does not match"))]
    pub new_password_confirm: String,
}

impl PasswordForm {
    pub fn into_change(self) -> Result<PasswordChange, FormError> {
        self.validate()?;
        Ok(PasswordChange {
            current_password: self.current_password,
            new_password: self.new_password,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CareerYearsForm {
    #[validate(range(min = 0, message = "career years cannot be negative"))]
    pub career_years: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
/// One career entry as typed by the therapist.
pub struct CareerForm {
    #[validate(custom(function = "career_text"))]
    pub company: String,
    #[validate(custom(function = "career_text"))]
    pub position: String,
    #[validate(custom(function = "career_start_date"))]
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl CareerForm {
    pub fn into_career(self) -> Result<Career, FormError> {
        self.validate()?;
        let company = NonEmptyString::new(self.company).map_err(|_| FormError::InvalidName)?;
        let position = NonEmptyString::new(self.position).map_err(|_| FormError::InvalidName)?;
        let start_date = parse_calendar_day(&self.start_date).ok_or(FormError::InvalidDate)?;
        let end_date = match self.end_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_calendar_day(raw).ok_or(FormError::InvalidDate)?),
        };
        Ok(Career::new(company, position, start_date, end_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password_form(current: &str, new: &str, confirm: &str) -> PasswordForm {
        PasswordForm {
            current_password: current.to_string(),
            new_password: new.to_string(),
            new_password_confirm: confirm.to_string(),
        }
    }

    #[test]
    fn phone_input_is_sanitized() {
        assert_eq!(sanitize_phone_input("010-1234-5678"), "01012345678");
        assert_eq!(sanitize_phone_input("1234567890123456789"), "123456789012345");
    }

    #[test]
    fn phone_form_requires_primary_number() {
        let form = PhoneForm {
            tel1: String::new(),
            tel2: None,
        };
        let err = form.into_patch().unwrap_err();
        assert_eq!(err.message(), "phone number 1 is required");
    }

    #[test]
    fn phone_form_rejects_long_numbers() {
        let form = PhoneForm {
            tel1: "0101234".to_string(),
            tel2: Some("1234567890123456".to_string()),
        };
        assert!(form.into_patch().is_err());
    }

    #[test]
    fn phone_form_sends_empty_secondary_number() {
        let patch = PhoneForm {
            tel1: "0101234".to_string(),
            tel2: None,
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.tel2.as_deref(), Some(""));
    }

    #[test]
    fn address_requires_three_parts() {
        let form = AddressForm {
            city: "Seoul".to_string(),
            district: " ".to_string(),
            dong: "Hapjeong".to_string(),
            detail: None,
        };
        assert_eq!(
            form.into_patch().unwrap_err().message(),
            "city, district and dong are required"
        );
    }

    #[test]
    fn password_rules_are_enforced() {
        assert!(password_form("", "secret1", "secret1").into_change().is_err());
        assert!(password_form("old", "short", "short").into_change().is_err());
        assert!(password_form("secret1", "secret1", "secret1").into_change().is_err());
        assert!(password_form("old", "secret1", "secret2").into_change().is_err());

        let change = password_form("old", "secret1", "secret1").into_change().unwrap();
        assert_eq!(change.new_password, "secret1");
    }

    #[test]
    fn same_password_reports_its_own_message() {
        let err = password_form("secret1", "secret1", "secret1")
            .into_change()
            .unwrap_err();
        assert_eq!(err.message(), "the new password must differ from the current one");
    }

    #[test]
    fn career_years_cannot_be_negative() {
        assert!(CareerYearsForm { career_years: -1 }.validate().is_err());
        assert!(CareerYearsForm { career_years: 0 }.validate().is_ok());
    }

    #[test]
    fn career_requires_start_date_from_1900() {
        let mut form = CareerForm {
            company: "Clinic".to_string(),
            position: "SLP".to_string(),
            start_date: "1899-12-31".to_string(),
            end_date: None,
        };
        assert!(form.clone().into_career().is_err());

        form.start_date = String::new();
        assert!(form.clone().into_career().is_err());

        form.start_date = "2019-03-01".to_string();
        form.end_date = Some(" ".to_string());
        let career = form.into_career().unwrap();
        assert_eq!(career.start_date, NaiveDate::from_ymd_opt(2019, 3, 1));
        assert_eq!(career.end_date, None);
    }

    #[test]
    fn career_rejects_blank_company() {
        let form = CareerForm {
            company: "  ".to_string(),
            position: "SLP".to_string(),
            start_date: "2019-03-01".to_string(),
            end_date: None,
        };
        assert!(form.into_career().is_err());
    }

    #[test]
    fn character_form_is_bounded() {
        assert!(CharacterForm { profile: 7 }.into_patch().is_err());
        let patch = CharacterForm { profile: 6 }.into_patch().unwrap();
        assert_eq!(patch.profile.map(CharacterId::get), Some(6));
    }
}

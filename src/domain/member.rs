use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::character::ProfileRecord;
use crate::domain::feedback::parse_calendar_day;
use crate::domain::types::{CharacterId, MemberId, NonEmptyString, null_as_default};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Therapist,
    User,
}

/// Identity of the signed-in member together with the bearer credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub access_token: String,
    pub member_id: MemberId,
    pub name: String,
    pub user_type: UserType,
}

impl AuthenticatedUser {
    pub fn is_therapist(&self) -> bool {
        self.user_type == UserType::Therapist
    }
}

/// One entry of a therapist's career history.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Career {
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
}

/// Blank or malformed dates are treated as unset.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_calendar_day))
}

impl Career {
    #[must_use]
    pub fn new(
        company: NonEmptyString,
        position: NonEmptyString,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            company: company.into_inner(),
            position: position.into_inner(),
            start_date: Some(start_date),
            end_date,
        }
    }
}

/// The signed-in member's editable record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemberProfile {
    pub character: CharacterId,
    pub name: String,
    pub nickname: String,
    pub birth_date: String,
    pub email: String,
    pub tel1: String,
    pub tel2: String,
    pub city: String,
    pub district: String,
    pub dong: String,
    pub detail: String,
    pub career_years: i32,
    pub careers: Vec<Career>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberPayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "nickName")]
    nickname: Option<String>,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    tel1: Option<String>,
    #[serde(default)]
    tel2: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    district: Option<String>,
    #[serde(default)]
    dong: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    career_years: Option<i32>,
    #[serde(default)]
    careers: Option<Vec<Career>>,
    #[serde(flatten)]
    profile: ProfileRecord,
}

impl<'de> Deserialize<'de> for MemberProfile {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let payload = MemberPayload::deserialize(deserializer)?;
        Ok(Self {
            character: payload.profile.character_id(),
            name: payload.name.unwrap_or_default(),
            nickname: payload.nickname.unwrap_or_default(),
            birth_date: payload.birth_date.unwrap_or_default(),
            email: payload.email.unwrap_or_default(),
            tel1: payload.tel1.unwrap_or_default(),
            tel2: payload.tel2.unwrap_or_default(),
            city: payload.city.unwrap_or_default(),
            district: payload.district.unwrap_or_default(),
            dong: payload.dong.unwrap_or_default(),
            detail: payload.detail.unwrap_or_default(),
            career_years: payload.career_years.unwrap_or_default(),
            careers: payload.careers.unwrap_or_default(),
        })
    }
}

/// Partial update of the signed-in member; unset fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<CharacterId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tel1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tel2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dong: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_years: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub careers: Option<Vec<Career>>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

use serde::{Deserialize, Serialize};

use crate::domain::character::ProfileRecord;
use crate::domain::types::{CharacterId, ClientId, null_as_default};

/// Roster entry for a child assigned to the signed-in therapist.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub client_id: ClientId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    /// Remaining upstream fields, kept for avatar resolution.
    #[serde(flatten)]
    pub profile: ProfileRecord,
}

impl ClientSummary {
    pub fn character_id(&self) -> CharacterId {
        self.profile.character_id()
    }
}

/// Richer profile of a child, fetched per client.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub tel1: Option<String>,
    #[serde(default)]
    pub tel2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub dong: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileRecord,
}

impl ClientDetail {
    pub fn character_id(&self) -> CharacterId {
        self.profile.character_id()
    }

    /// Phone numbers joined as `tel1 / tel2`.
    pub fn contact(&self) -> String {
        match (self.tel1.as_deref(), self.tel2.as_deref()) {
            (Some(tel1), Some(tel2)) if !tel2.is_empty() => format!("{tel1} / {tel2}"),
            (Some(tel1), _) => tel1.to_string(),
            (None, Some(tel2)) => tel2.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Address parts joined by spaces, skipping missing ones.
    pub fn address(&self) -> String {
        [&self.city, &self.district, &self.dong, &self.detail]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

//! Character identities and the profile record resolver.
//!
//! Upstream payloads carry the character under many spellings, sometimes
//! nested under a related entity, sometimes 0-based, sometimes as a name.
//! [`resolve_profile_id`] folds all of them into a [`CharacterId`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::types::CharacterId;

/// Keys checked, in order, for the character identifier.
pub const PROFILE_KEYS: [&str; 12] = [
    "profile",
    "profileId",
    "profile_id",
    "profileImageId",
    "profile_image_id",
    "profile_image",
    "characterId",
    "character_id",
    "childProfile",
    "child_profile",
    "childProfileId",
    "avatarIndex",
];

/// Related entities searched when the record itself has no profile key.
pub const NESTED_KEYS: [&str; 4] = ["member", "client", "child", "user"];

/// Lowercase name fragments recognised in descriptive values.
const NAME_TABLE: [(&str, i64); 7] = [
    ("bear", 1),
    ("wolf", 2),
    ("puppy", 3),
    ("dog", 3),
    ("parrot", 4),
    ("duck", 5),
    ("penguin", 6),
];

/// Untyped bag of fields received from the backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ProfileRecord(Map<String, Value>);

impl ProfileRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolves the character carried by this record.
    pub fn character_id(&self) -> CharacterId {
        resolve_fields(&self.0)
    }
}

/// Resolves any JSON value to a character. Non-objects yield the default.
pub fn resolve_profile_id(record: &Value) -> CharacterId {
    match record {
        Value::Object(fields) => resolve_fields(fields),
        _ => CharacterId::DEFAULT,
    }
}

fn resolve_fields(fields: &Map<String, Value>) -> CharacterId {
    let raw = read_first(fields).or_else(|| {
        NESTED_KEYS
            .iter()
            .filter_map(|key| fields.get(*key).and_then(Value::as_object))
            .find_map(read_first)
    });

    raw.and_then(interpret).unwrap_or(CharacterId::DEFAULT)
}

fn read_first(fields: &Map<String, Value>) -> Option<&Value> {
    PROFILE_KEYS
        .iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}

fn interpret(raw: &Value) -> Option<CharacterId> {
    match raw {
        Value::String(text) => from_text(text),
        Value::Number(number) => {
            let value = number
                .as_i64()
                .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))?;
            from_index(value)
        }
        _ => None,
    }
}

/// Accepts 1-based ids as-is and shifts a 0-based first index.
fn from_index(value: i64) -> Option<CharacterId> {
    CharacterId::new(value)
        .ok()
        .or_else(|| (value == 0).then_some(CharacterId::DEFAULT))
}

fn from_text(text: &str) -> Option<CharacterId> {
    let lower = text.to_lowercase();

    let digits: String = lower
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    if let Some(id) = digits.parse::<i64>().ok().and_then(from_index) {
        return Some(id);
    }

    NAME_TABLE
        .iter()
        .find(|(name, _)| lower.contains(name))
        .and_then(|(_, id)| CharacterId::new(*id).ok())
}

/// Colour palette applied to the front-end while a character is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CharacterTheme {
    pub background: &'static str,
    pub primary_bg: &'static str,
    pub primary_text: &'static str,
}

/// The six fixed characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Character {
    Bear,
    Wolf,
    Puppy,
    Parrot,
    Duck,
    Penguin,
}

impl Character {
    pub const ALL: [Character; 6] = [
        Character::Bear,
        Character::Wolf,
        Character::Puppy,
        Character::Parrot,
        Character::Duck,
        Character::Penguin,
    ];

    pub fn id(self) -> CharacterId {
        match CharacterId::new(self as i64 + 1) {
            Ok(id) => id,
            Err(_) => CharacterId::DEFAULT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Character::Bear => "bear",
            Character::Wolf => "wolf",
            Character::Puppy => "puppy",
            Character::Parrot => "parrot",
            Character::Duck => "duck",
            Character::Penguin => "penguin",
        }
    }

    /// Image asset backing this character.
    pub fn asset(self) -> &'static str {
        match self {
            Character::Bear => "logoimage/bear.png",
            Character::Wolf => "logoimage/wolf.png",
            Character::Puppy => "logoimage/puppy.png",
            Character::Parrot => "logoimage/parrot.png",
            Character::Duck => "logoimage/duck.png",
            Character::Penguin => "logoimage/penguin.png",
        }
    }

    pub fn theme(self) -> CharacterTheme {
        let (background, primary_bg, primary_text) = match self {
            Character::Bear => ("#f3eade", "#b38b6d", "#ffffff"),
            Character::Wolf => ("#eceff1", "#78909c", "#ffffff"),
            Character::Puppy => ("#fffde7", "#a1887f", "#ffffff"),
            Character::Parrot => ("#f1f8e9", "#aed581", "#ffffff"),
            Character::Duck => ("#fff9c4", "#ffd600", "#000000"),
            Character::Penguin => ("#e3f2fd", "#64b5f6", "#ffffff"),
        };
        CharacterTheme {
            background,
            primary_bg,
            primary_text,
        }
    }
}

impl From<CharacterId> for Character {
    fn from(id: CharacterId) -> Self {
        Character::ALL[usize::from(id.get() - 1)]
    }
}

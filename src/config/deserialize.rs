// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Accepts team numbers written as YAML integers or strings.

use serde::Deserialize;

use crate::types::TeamNumber;

pub fn deserialize_team<'de, D>(deserializer: D) -> Result<TeamNumber, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entry = TeamEntry::deserialize(deserializer)?;
    Ok(entry.into_team())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TeamEntry {
    Number(i64),
    Text(String),
}

impl TeamEntry {
    fn into_team(self) -> TeamNumber {
        match self {
            TeamEntry::Number(n) => TeamNumber::from_signed(n),
            TeamEntry::Text(s) => TeamNumber::parse_lenient(&s),
        }
    }
}

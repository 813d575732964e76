use std::fmt;
use serde::de::{Deserialize, Deserializer, Error, Visitor};

/// Strings, numbers and booleans can be deserialized into a RelaxedString
///
/// Blueprints routinely write env values unquoted, e.g. `value: 10000`,
/// and the platform injects them as strings regardless.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RelaxedString(String);

impl RelaxedString {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RelaxedString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RelaxedString {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

/// `deserialize_with` helper for optional relaxed values
///
/// A missing key or an explicit `~` both become `None`.
pub fn optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let res = Option::<RelaxedString>::deserialize(deserializer)?;
    Ok(res.map(RelaxedString::into_inner))
}

impl<'de> Deserialize<'de> for RelaxedString {
    fn deserialize<D>(deserializer: D) -> Result<RelaxedString, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RelaxedStringVisitor)
    }
}

struct RelaxedStringVisitor;

macro_rules! visit_tostring {
    ( $name:ident, $type:ty ) => {
        fn $name<E>(self, v: $type) -> Result<Self::Value, E> where E: Error {
            self.visit_string(v.to_string())
        }
    };
}

/// RelaxedStringVisitor will visit numbers, bools and strings
impl<'de> Visitor<'de> for RelaxedStringVisitor {
    type Value = RelaxedString;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string, number or boolean")
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> where E: Error {
        Ok(RelaxedString(v))
    }

    // Calls `self.visit_string(v.to_string())`
    visit_tostring!(visit_bool, bool);
    visit_tostring!(visit_str, &str);
    visit_tostring!(visit_i64, i64);
    visit_tostring!(visit_u64, u64);
    visit_tostring!(visit_f64, f64);
}

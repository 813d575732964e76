use std::collections::BTreeSet;
use std::iter::FromIterator;
use std::ops::{Deref, DerefMut};
use std::slice;

use regex::Regex;

use super::traits::Verify;
use super::Result;
use crate::invalid;

/// Where the value of an environment variable comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvSource {
    /// Value is written in the blueprint
    Literal,
    /// Value is supplied by the operator through the platform's secret store
    Secret,
}

/// A single environment variable binding
///
/// ```yaml
/// envVars:
///   # operator supplied secret, never written to the file
///   - key: BOT_TOKEN
///     sync: false
///   # literal
///   - key: PORT
///     value: 10000
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnvVar {
    /// Variable name
    #[serde(default)]
    pub key: String,
    /// Literal value
    #[serde(default, deserialize_with = "crate::deserializers::optional",
            skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Set to false to have the operator supply the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<bool>,
}

impl EnvVar {
    pub fn literal(key: &str, value: &str) -> Self {
        EnvVar { key: key.into(), value: Some(value.into()), sync: None }
    }

    pub fn secret(key: &str) -> Self {
        EnvVar { key: key.into(), value: None, sync: Some(false) }
    }

    /// Source of this variable
    ///
    /// Only meaningful on verified variables.
    pub fn source(&self) -> EnvSource {
        if self.sync == Some(false) {
            EnvSource::Secret
        } else {
            EnvSource::Literal
        }
    }

    pub fn is_secret(&self) -> bool {
        self.source() == EnvSource::Secret
    }
}

impl Verify for EnvVar {
    fn verify(&self, at: &str) -> Result<()> {
        if self.key.is_empty() {
            bail!(invalid(format!("{}.key", at), "env var key cannot be empty"));
        }
        let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
        if !re.is_match(&self.key) {
            bail!(invalid(format!("{}.key", at),
                format!("{} is not a valid environment variable name", self.key)));
        }
        if self.key != self.key.to_uppercase() {
            warn!("env var {} is not upper case", self.key);
        }
        match (self.sync, &self.value) {
            (Some(false), Some(_)) => {
                bail!(invalid(format!("{}.value", at),
                    format!("{} is operator supplied (sync: false) and cannot carry a value", self.key)));
            }
            (Some(false), None) => {}
            (_, Some(_)) => {}
            (_, None) => {
                bail!(invalid(format!("{}.value", at),
                    format!("{} needs either a value or sync: false", self.key)));
            }
        }
        Ok(())
    }
}

/// Ordered environment variable bindings of a service
///
/// Keys are unique within the sequence.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EnvVars(Vec<EnvVar>);

impl EnvVars {
    pub fn new(vars: Vec<EnvVar>) -> Self {
        EnvVars(vars)
    }

    // Convenience for serde skip_serializing_if
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a binding by key
    pub fn by_key(&self, key: &str) -> Option<&EnvVar> {
        self.0.iter().find(|e| e.key == key)
    }

    /// Keys of the operator supplied bindings, in declaration order
    pub fn secret_keys(&self) -> Vec<&str> {
        self.0.iter().filter(|e| e.is_secret()).map(|e| e.key.as_str()).collect()
    }
}

impl Verify for EnvVars {
    fn verify(&self, at: &str) -> Result<()> {
        let mut seen = BTreeSet::new();
        for (i, e) in self.0.iter().enumerate() {
            let pos = format!("{}[{}]", at, i);
            e.verify(&pos)?;
            if !seen.insert(e.key.as_str()) {
                bail!(invalid(format!("{}.key", pos), format!("duplicate env var {}", e.key)));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a EnvVars {
    type Item = &'a EnvVar;
    type IntoIter = slice::Iter<'a, EnvVar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for EnvVars {
    type Item = EnvVar;
    type IntoIter = ::std::vec::IntoIter<EnvVar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<EnvVar> for EnvVars {
    fn from_iter<I: IntoIterator<Item = EnvVar>>(iter: I) -> Self {
        EnvVars(Vec::from_iter(iter))
    }
}

impl Deref for EnvVars {
    type Target = Vec<EnvVar>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for EnvVars {
    fn deref_mut(&mut self) -> &mut Vec<EnvVar> {
        &mut self.0
    }
}

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use serde_yaml::Value;

use super::{ErrorKind, Result};
use crate::invalid;
use crate::manifest::{Blueprint, ServiceDescriptor, REQUIRED_KEYS};

/// Blueprints backed by a file on disk
impl Blueprint {
    /// Read and verify every service in a blueprint file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Blueprint> {
        let path = path.as_ref();
        trace!("Using blueprint in {}", path.display());
        if !path.exists() {
            bail!("Blueprint file {} does not exist", path.display())
        }
        let origin = path.display().to_string();
        let mut f = File::open(path)?;
        let mut buf = Vec::new();
        f.read_to_end(&mut buf)?;
        let data = String::from_utf8(buf)
            .map_err(|e| ErrorKind::ParseError(origin.clone(), format!("not valid utf-8: {}", e)))?;
        let bp = parse(&data, &origin)?;
        debug!("Loaded {} service(s) from {}", bp.services.len(), path.display());
        Ok(bp)
    }

    /// Serialize the blueprint back to yaml
    pub fn render(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Read a blueprint file holding exactly one service
///
/// Fails with a `ParseError` when the file is not well-formed yaml matching
/// the blueprint schema, and with a `ValidationError` when any invariant of
/// the service is violated.
pub fn load<P: AsRef<Path>>(path: P) -> Result<ServiceDescriptor> {
    Blueprint::load(path)?.into_single()
}

/// Serialize a single service into a blueprint document
///
/// Inverse of `load`.
pub fn render(svc: &ServiceDescriptor) -> Result<String> {
    Blueprint::new(vec![svc.clone()]).render()
}

/// Parse and verify a blueprint held in memory
///
/// `origin` names the document in errors, typically its path.
pub fn parse(data: &str, origin: &str) -> Result<Blueprint> {
    if data.trim().is_empty() {
        bail!(ErrorKind::ParseError(origin.into(), "document is empty".into()));
    }
    // untyped first so that missing keys are reported as such
    let raw: Value = serde_yaml::from_str(data).map_err(|e| parse_error(origin, &e))?;
    check_required(&raw)?;

    let bp: Blueprint = serde_yaml::from_str(data).map_err(|e| parse_error(origin, &e))?;
    bp.verify()?;
    Ok(bp)
}

fn parse_error(origin: &str, e: &serde_yaml::Error) -> ErrorKind {
    ErrorKind::ParseError(origin.into(), e.to_string())
}

/// Check every service entry carries the required keys
///
/// Entries of the wrong shape are left to the typed parse.
fn check_required(raw: &Value) -> Result<()> {
    let services = raw.as_mapping()
        .and_then(|m| m.get(&Value::String("services".into())))
        .and_then(Value::as_sequence);
    let services = match services {
        Some(s) => s,
        None => return Ok(()),
    };
    for (i, svc) in services.iter().enumerate() {
        let map = match svc.as_mapping() {
            Some(m) => m,
            None => continue,
        };
        for keys in REQUIRED_KEYS {
            let present = keys.iter().any(|k| map.contains_key(&Value::String(k.to_string())));
            if !present {
                bail!(invalid(format!("services[{}].{}", i, keys[0]), "missing required field"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::ErrorKind;

    const MINIMAL: &str = r#"
services:
- type: web
  name: echo
  env: node
  buildCommand: npm ci
  startCommand: node index.js
  healthCheckPath: /healthz
"#;

    #[test]
    fn minimal_defaults() {
        let bp = parse(MINIMAL, "minimal").unwrap();
        let svc = &bp.services[0];
        assert!(svc.autoDeploy);
        assert_eq!(svc.plan, crate::structs::Plan::Starter);
        assert!(svc.envVars.is_empty());
        assert!(svc.disk.is_none());
    }

    #[test]
    fn runtime_alias() {
        let doc = MINIMAL.replace("env: node", "runtime: node");
        let bp = parse(&doc, "alias").unwrap();
        assert_eq!(bp.services[0].env, "node");
    }

    #[test]
    fn missing_field_is_a_validation_error() {
        let doc = MINIMAL.replace("  healthCheckPath: /healthz\n", "");
        let err = parse(&doc, "missing").unwrap_err();
        match err.kind() {
            ErrorKind::ValidationError(field, reason) => {
                assert_eq!(field, "services[0].healthCheckPath");
                assert_eq!(reason, "missing required field");
            }
            k => panic!("unexpected error {:?}", k),
        }
    }

    #[test]
    fn malformed_yaml_reports_a_line() {
        let err = parse("services:\n- type: web\n  name: [unclosed\n", "broken.yaml").unwrap_err();
        match err.kind() {
            ErrorKind::ParseError(origin, reason) => {
                assert_eq!(origin, "broken.yaml");
                assert!(reason.contains("line"), "no line in {}", reason);
            }
            k => panic!("unexpected error {:?}", k),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let doc = MINIMAL.replace("  healthCheckPath: /healthz", "  healthCheckPath: /healthz\n  healthcheckPath: /h");
        let err = parse(&doc, "typo").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ParseError(..)));
    }

    #[test]
    fn unsupported_type_is_a_parse_error() {
        let doc = MINIMAL.replace("type: web", "type: worker");
        let err = parse(&doc, "worker").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ParseError(..)));
    }

    #[test]
    fn empty_documents() {
        let err = parse("  \n", "empty").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ParseError(..)));
        let err = parse("services: []\n", "none").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ValidationError(..)));
    }
}

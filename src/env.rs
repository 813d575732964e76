use std::collections::BTreeMap;
use std::env;

use super::{ErrorKind, Result};
use crate::manifest::ServiceDescriptor;

/// Where operator supplied secrets are read from
///
/// The platform injects secrets out-of-band; anything that can answer a
/// lookup by key can stand in for its secret store.
pub trait SecretStore {
    /// Value of a secret, if supplied
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The environment of the current process
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl SecretStore for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl SecretStore for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl ServiceDescriptor {
    /// Keys the operator has to supply before the service starts
    pub fn secret_keys(&self) -> Vec<&str> {
        self.envVars.secret_keys()
    }

    /// Secrets the store cannot supply
    ///
    /// Empty values count as missing.
    pub fn missing_secrets<S: SecretStore>(&self, store: &S) -> Vec<String> {
        self.secret_keys()
            .into_iter()
            .filter(|k| store.lookup(k).map_or(true, |v| v.is_empty()))
            .map(String::from)
            .collect()
    }

    /// The environment the platform injects into the running service
    ///
    /// Literal values come from the descriptor, secrets from the store.
    /// Fails listing every missing secret at once.
    pub fn resolve_env<S: SecretStore>(&self, store: &S) -> Result<BTreeMap<String, String>> {
        let missing = self.missing_secrets(store);
        if !missing.is_empty() {
            bail!(ErrorKind::MissingSecrets(missing));
        }
        let mut res = BTreeMap::new();
        for e in &self.envVars {
            let value = if e.is_secret() {
                trace!("Injecting secret {} for {}", e.key, self.name);
                store.lookup(&e.key).unwrap_or_default()
            } else {
                e.value.clone().unwrap_or_default()
            };
            res.insert(e.key.clone(), value);
        }
        debug!("Resolved {} env vars for {}", res.len(), self.name);
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{ProcessEnv, SecretStore};
    use crate::structs::{EnvVar, EnvVars, Plan, ServiceType};
    use crate::{ErrorKind, ServiceDescriptor};

    fn svc() -> ServiceDescriptor {
        ServiceDescriptor {
            kind: ServiceType::Web,
            name: "bot".into(),
            env: "python".into(),
            buildCommand: "pip install -r requirements.txt".into(),
            startCommand: "python main.py".into(),
            envVars: EnvVars::new(vec![
                EnvVar::secret("BOT_TOKEN"),
                EnvVar::secret("TELEGRAM_BOT_TOKEN"),
                EnvVar::literal("PORT", "10000"),
            ]),
            autoDeploy: true,
            disk: None,
            healthCheckPath: "/health".into(),
            plan: Plan::Free,
            region: None,
            branch: None,
            rootDir: None,
            numInstances: None,
        }
    }

    fn store(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn resolves_literals_and_secrets() {
        let s = store(&[("BOT_TOKEN", "1:a"), ("TELEGRAM_BOT_TOKEN", "2:b"), ("UNRELATED", "x")]);
        let env = svc().resolve_env(&s).unwrap();
        assert_eq!(env.len(), 3);
        assert_eq!(env["BOT_TOKEN"], "1:a");
        assert_eq!(env["PORT"], "10000");
        assert!(!env.contains_key("UNRELATED"));
    }

    #[test]
    fn reports_every_missing_secret() {
        let s = store(&[("BOT_TOKEN", "")]);
        assert_eq!(svc().missing_secrets(&s), vec!["BOT_TOKEN", "TELEGRAM_BOT_TOKEN"]);
        match svc().resolve_env(&s).unwrap_err().kind() {
            ErrorKind::MissingSecrets(keys) => assert_eq!(keys.len(), 2),
            k => panic!("unexpected error {:?}", k),
        }
    }

    #[test]
    fn process_env_lookup() {
        // PATH is set in any reasonable test environment
        assert!(ProcessEnv.lookup("PATH").is_some());
        assert!(ProcessEnv.lookup("RENDERCAT_SURELY_UNSET_VARIABLE").is_none());
    }
}

use regex::Regex;
use std::collections::BTreeSet;

use super::Result;
use crate::invalid;
use crate::structs::{Disk, EnvVars, Plan, ServiceType, Verify};

/// Runtimes the platform provides native images for
const KNOWN_RUNTIMES: &[&str] = &["python", "node", "ruby", "go", "rust", "elixir", "docker", "image"];

/// Keys every service entry must carry, with accepted aliases
///
/// The first name of each entry is the one reported when it is missing.
pub(crate) const REQUIRED_KEYS: &[&[&str]] = &[
    &["type"],
    &["name"],
    &["env", "runtime"],
    &["buildCommand"],
    &["startCommand"],
    &["healthCheckPath"],
];

/// A single service, serializable from an entry of `services` in render.yaml
///
/// ```yaml
/// - type: web
///   name: telegram-deployment-bot
///   env: python
///   buildCommand: pip install -r requirements.txt
///   startCommand: python main.py
///   envVars:
///   - key: BOT_TOKEN
///     sync: false
///   - key: PORT
///     value: 10000
///   autoDeploy: true
///   disk:
///     name: bot-data
///     mountPath: /opt/render/project/src/data
///     sizeGB: 1
///   healthCheckPath: /health
///   plan: free
/// ```
///
/// The descriptor is only ever read; the running service sees it solely
/// through the environment the platform injects from `envVars`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServiceDescriptor {
    /// Kind of service
    #[serde(rename = "type")]
    pub kind: ServiceType,

    /// Name of the service
    ///
    /// Unique within the hosting account, and used for the default subdomain.
    pub name: String,

    /// Language runtime image (e.g. python)
    #[serde(alias = "runtime")]
    pub env: String,

    /// Command run once per deploy to prepare dependencies
    pub buildCommand: String,

    /// Command launching the long running process
    pub startCommand: String,

    /// Environment variable bindings, in declaration order
    #[serde(default, skip_serializing_if = "EnvVars::is_empty")]
    pub envVars: EnvVars,

    /// Whether pushes to the tracked branch trigger a deploy
    #[serde(default = "auto_deploy_default")]
    pub autoDeploy: bool,

    /// Persistent disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<Disk>,

    /// Http path polled by the platform to judge liveness
    pub healthCheckPath: String,

    /// Billing and resource tier
    #[serde(default)]
    pub plan: Plan,

    /// Deployment region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Git branch to deploy from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Repository subdirectory the commands run in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rootDir: Option<String>,

    /// Number of instances to run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numInstances: Option<u32>,
}
fn auto_deploy_default() -> bool { true }

impl ServiceDescriptor {
    /// Print the descriptor to debug output
    pub fn print(&self) -> Result<()> {
        let encoded = serde_yaml::to_string(self)?;
        debug!("{}\n", encoded);
        Ok(())
    }

    /// Verify the invariants of a service entry
    ///
    /// `at` is the position of the entry, e.g. `services[0]`.
    pub fn verify(&self, at: &str) -> Result<()> {
        let field = |f: &str| format!("{}.{}", at, f);

        if self.name.trim().is_empty() {
            bail!(invalid(field("name"), "service name cannot be empty"));
        }
        // subdomains are derived from the name
        let re = Regex::new(r"^[a-z0-9]([a-z0-9\-]*[a-z0-9])?$").unwrap();
        if !re.is_match(&self.name) {
            warn!("{} is not a lower case, dash separated name", self.name);
        }

        if self.env.trim().is_empty() {
            bail!(invalid(field("env"), "runtime cannot be empty"));
        }
        if !KNOWN_RUNTIMES.contains(&self.env.as_str()) {
            warn!("{} uses an unknown runtime {}", self.name, self.env);
        }
        if self.buildCommand.trim().is_empty() {
            bail!(invalid(field("buildCommand"), "build command cannot be empty"));
        }
        if self.startCommand.trim().is_empty() {
            bail!(invalid(field("startCommand"), "start command cannot be empty"));
        }

        self.envVars.verify(&field("envVars"))?;
        self.verify_literals(at)?;

        if !self.healthCheckPath.starts_with('/') {
            bail!(invalid(field("healthCheckPath"),
                format!("health check path must start with / - got {}", self.healthCheckPath)));
        }
        if self.healthCheckPath.chars().any(char::is_whitespace) {
            bail!(invalid(field("healthCheckPath"), "health check path cannot contain whitespace"));
        }

        if let Some(ref disk) = self.disk {
            disk.verify(&field("disk"))?;
            if !self.plan.supports_disks() {
                warn!("{} attaches disk {} on the {} plan which cannot hold disks",
                    self.name, disk.name, self.plan);
            }
        }
        if let Some(n) = self.numInstances {
            if n == 0 {
                bail!(invalid(field("numInstances"), "need at least one instance"));
            }
            if n > 1 && self.disk.is_some() {
                bail!(invalid(field("numInstances"),
                    format!("services with a disk run a single instance - got {}", n)));
            }
        }
        if let Some(ref dir) = self.rootDir {
            if dir.starts_with('/') {
                bail!(invalid(field("rootDir"), format!("root dir must be relative - got {}", dir)));
            }
        }
        Ok(())
    }

    /// Sanity checks on literal values the service is known to read
    fn verify_literals(&self, at: &str) -> Result<()> {
        for (i, e) in self.envVars.iter().enumerate() {
            let v = match e.value {
                Some(ref v) if !e.is_secret() => v,
                _ => continue,
            };
            match e.key.as_str() {
                "PORT" => {
                    if v.parse::<u16>().is_err() {
                        bail!(invalid(format!("{}.envVars[{}].value", at, i),
                            format!("PORT must be a port number - got {}", v)));
                    }
                }
                "WEBHOOK_URL" => {
                    if !v.is_empty() && !v.starts_with("https://") {
                        warn!("{} sets a WEBHOOK_URL without https: {}", self.name, v);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// The blueprint document: every service described by one render.yaml
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Blueprint {
    /// Services described by the blueprint
    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,
}

impl Blueprint {
    pub fn new(services: Vec<ServiceDescriptor>) -> Self {
        Blueprint { services }
    }

    /// Verify every service and the uniqueness of their names
    pub fn verify(&self) -> Result<()> {
        if self.services.is_empty() {
            bail!(invalid("services", "no services defined"));
        }
        let mut names = BTreeSet::new();
        for (i, svc) in self.services.iter().enumerate() {
            let at = format!("services[{}]", i);
            svc.verify(&at)?;
            if !names.insert(svc.name.as_str()) {
                bail!(invalid(format!("{}.name", at), format!("duplicate service name {}", svc.name)));
            }
        }
        Ok(())
    }

    /// Find a service by name
    pub fn service(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Take the only service out of a blueprint
    pub fn into_single(mut self) -> Result<ServiceDescriptor> {
        if self.services.len() != 1 {
            bail!(invalid("services",
                format!("expected exactly one service, found {}", self.services.len())));
        }
        Ok(self.services.remove(0))
    }
}

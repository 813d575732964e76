use std::fmt;

/// Kind of service described by a blueprint entry
///
/// Only http facing web services are supported.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Web,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceType::Web => write!(f, "web service"),
        }
    }
}

/// Billing and resource tier of a service
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Free,
    Starter,
    Standard,
    Pro,
    ProPlus,
    ProMax,
    ProUltra,
}

impl Default for Plan {
    fn default() -> Self { Plan::Starter }
}

impl Plan {
    /// Whether the platform allows attaching persistent disks on this tier
    pub fn supports_disks(self) -> bool {
        self != Plan::Free
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Plan::Free => "free",
            Plan::Starter => "starter",
            Plan::Standard => "standard",
            Plan::Pro => "pro",
            Plan::ProPlus => "pro_plus",
            Plan::ProMax => "pro_max",
            Plan::ProUltra => "pro_ultra",
        };
        write!(f, "{}", s)
    }
}

use super::traits::Verify;
use super::Result;
use crate::invalid;

/// Persistent disk mounted into the service
///
/// ```yaml
/// disk:
///   name: bot-data
///   mountPath: /opt/render/project/src/data
///   sizeGB: 1
/// ```
///
/// The size is signed so that a negative size is reported as an invalid
/// field rather than a malformed document.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Disk {
    /// Name of the disk
    pub name: String,
    /// Absolute path the disk is mounted at
    pub mountPath: String,
    /// Size in gigabytes
    pub sizeGB: i64,
}

impl Verify for Disk {
    fn verify(&self, at: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!(invalid(format!("{}.name", at), "disk name cannot be empty"));
        }
        if !self.mountPath.starts_with('/') {
            bail!(invalid(format!("{}.mountPath", at),
                format!("mount path must be absolute - got {}", self.mountPath)));
        }
        if self.sizeGB <= 0 {
            bail!(invalid(format!("{}.sizeGB", at),
                format!("disk size must be positive - got {}", self.sizeGB)));
        }
        Ok(())
    }
}

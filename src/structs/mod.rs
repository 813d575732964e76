/// Allow normal error handling from structs
pub use super::Result;

/// Traits that the structs can implement
pub mod traits;
pub use self::traits::Verify;

/// Service kinds and billing plans
mod plan;
pub use self::plan::{Plan, ServiceType};

/// Environment variable bindings
mod envvar;
pub use self::envvar::{EnvSource, EnvVar, EnvVars};

/// Persistent disks
mod disk;
pub use self::disk::Disk;

use std::{env, path::{Path, PathBuf}, sync::Once};

static START: Once = Once::new();

/// Set cwd to tests directory to be able to read the blueprint fixtures
///
/// The manifests directory provides the bot blueprint and broken variants of it
pub fn setup() {
    START.call_once(|| {
        let pth = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests");
        println!("Initializing tests - using testdir {}", pth.display());
        assert!(env::set_current_dir(pth).is_ok());
    });
}

/// Path to a fixture relative to the tests directory
#[allow(dead_code)]
pub fn manifest(name: &str) -> PathBuf {
    Path::new("manifests").join(name)
}

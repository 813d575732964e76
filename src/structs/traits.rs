use super::Result;

pub trait Verify {
    /// Verifying that this struct is sane
    ///
    /// `at` is the field path of the struct within the blueprint,
    /// e.g. `services[0].disk`, and prefixes every reported field.
    fn verify(&self, at: &str) -> Result<()>;
}

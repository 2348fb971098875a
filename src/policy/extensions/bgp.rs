use crate::policy::PolicyExtension;

/// The baseline decision process: loop prevention, valley-free export,
/// and the standard three-comparator Gao-Rexford chain. Every other
/// extension overrides one or two hooks on top of this.
pub struct BgpPolicy;

impl PolicyExtension for BgpPolicy {
    fn name(&self) -> &str {
        "BGP"
    }
}

use crate::announcement::Announcement;
use crate::as_graph::AS;
use crate::policy::PolicyExtension;
use crate::shared::Relationships;

/// Route Origin Validation: rejects any announcement whose flat ROA
/// fields mark it invalid, on top of the baseline's loop prevention.
pub struct RovPolicy;

impl PolicyExtension for RovPolicy {
    fn valid_ann(&self, ann: &Announcement, recv_rel: Relationships, as_obj: &AS) -> bool {
        if ann.invalid_by_roa() {
            return false;
        }
        !ann.as_path.contains(&as_obj.asn) && recv_rel != Relationships::Unknown
    }

    fn name(&self) -> &str {
        "ROV"
    }
}

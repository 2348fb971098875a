use crate::announcement::Announcement;
use crate::as_graph::AS;
use crate::policy::PolicyExtension;
use crate::shared::Relationships;

const OTC_COMMUNITY: &str = "only-to-customers";

/// Tags any route learned from a peer or provider with an
/// `only-to-customers` community, then refuses to export a so-tagged
/// route anywhere but to customers - even on a later hop where the
/// baseline export rule would otherwise allow it toward a peer.
pub struct OnlyToCustomersPolicy;

impl PolicyExtension for OnlyToCustomersPolicy {
    fn copy_and_process(&self, ann: &Announcement, as_obj: &AS, recv_rel: Relationships) -> Announcement {
        let mut new_path = Vec::with_capacity(ann.as_path.len() + 1);
        new_path.push(as_obj.asn);
        new_path.extend(&ann.as_path);

        let mut communities = ann.communities.clone();
        if matches!(recv_rel, Relationships::Peers | Relationships::Providers)
            && !communities.iter().any(|c| c == OTC_COMMUNITY)
        {
            communities.push(OTC_COMMUNITY.to_string());
        }

        Announcement {
            prefix: ann.prefix.clone(),
            as_path: new_path,
            timestamp: ann.timestamp,
            seed_asn: ann.seed_asn,
            roa_valid_length: ann.roa_valid_length,
            roa_origin: ann.roa_origin,
            recv_relationship: recv_rel,
            withdraw: ann.withdraw,
            traceback_end: ann.traceback_end,
            communities,
        }
    }

    fn policy_propagate(
        &self,
        _neighbor: u32,
        ann: &Announcement,
        target_rel: Relationships,
        _outgoing: &mut Vec<(u32, Announcement)>,
    ) -> bool {
        let tagged = ann.communities.iter().any(|c| c == OTC_COMMUNITY);
        // Returning true suppresses the default export step. Suppress
        // whenever the route is tagged and the target isn't customers.
        tagged && target_rel != Relationships::Customers
    }

    fn name(&self) -> &str {
        "OnlyToCustomers"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::as_graph::ASBuilder;

    #[test]
    fn tags_routes_learned_from_peers() {
        let policy = OnlyToCustomersPolicy;
        let as_obj = ASBuilder::new(1).build();
        let ann = Announcement::new("1.0.0.0/24".to_string(), vec![2], 0, Relationships::Peers);
        let processed = policy.copy_and_process(&ann, &as_obj, Relationships::Peers);
        assert!(processed.communities.contains(&OTC_COMMUNITY.to_string()));
    }

    #[test]
    fn suppresses_export_to_peers_and_providers_when_tagged() {
        let policy = OnlyToCustomersPolicy;
        let mut outgoing = Vec::new();
        let mut ann = Announcement::new("1.0.0.0/24".to_string(), vec![2, 1], 0, Relationships::Peers);
        ann.communities.push(OTC_COMMUNITY.to_string());
        assert!(policy.policy_propagate(3, &ann, Relationships::Peers, &mut outgoing));
        assert!(policy.policy_propagate(3, &ann, Relationships::Providers, &mut outgoing));
        assert!(!policy.policy_propagate(3, &ann, Relationships::Customers, &mut outgoing));
    }
}

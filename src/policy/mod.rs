pub mod extensions;

use std::collections::HashMap;

use crate::announcement::{Announcement, LocalRib, Prefix, RecvQueue};
use crate::as_graph::{AS, ASN};
use crate::error::SimError;
use crate::shared::Relationships;

/// Which side of a Gao-Rexford comparison wins. `None` means the
/// comparator is tied and the next one in the chain decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Current,
    New,
}

pub type GaoRexfordComparator = fn(&Announcement, &Announcement) -> Option<Preference>;

fn local_pref_comparator(current: &Announcement, new: &Announcement) -> Option<Preference> {
    if current.recv_relationship == new.recv_relationship {
        None
    } else if new.recv_relationship > current.recv_relationship {
        Some(Preference::New)
    } else {
        Some(Preference::Current)
    }
}

fn path_length_comparator(current: &Announcement, new: &Announcement) -> Option<Preference> {
    if current.as_path.len() == new.as_path.len() {
        None
    } else if new.as_path.len() < current.as_path.len() {
        Some(Preference::New)
    } else {
        Some(Preference::Current)
    }
}

fn neighbor_tiebreak_comparator(current: &Announcement, new: &Announcement) -> Option<Preference> {
    let neighbor_asn = |ann: &Announcement| -> ASN {
        if ann.as_path.len() >= 2 {
            ann.as_path[1]
        } else {
            ann.as_path[0]
        }
    };
    let (c, n) = (neighbor_asn(current), neighbor_asn(new));
    if n < c {
        Some(Preference::New)
    } else {
        Some(Preference::Current)
    }
}

/// The overridable capability set of a BGP decision process. All methods
/// have a baseline default; extensions override the ones they change.
pub trait PolicyExtension {
    /// Loop prevention (and anything an extension adds to it).
    fn valid_ann(&self, ann: &Announcement, _recv_rel: Relationships, as_obj: &AS) -> bool {
        !ann.as_path.contains(&as_obj.asn)
    }

    /// Builds the announcement a neighbor would see: prepend the local
    /// ASN, stamp the receive relationship, copy everything else.
    fn copy_and_process(&self, ann: &Announcement, as_obj: &AS, recv_rel: Relationships) -> Announcement {
        let mut new_path = Vec::with_capacity(ann.as_path.len() + 1);
        new_path.push(as_obj.asn);
        new_path.extend(&ann.as_path);
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
            communities: ann.communities.clone(),
        }
    }

    /// Comparator chain for route selection, run in order until one
    /// decides. The baseline chain's last comparator always decides.
    fn gao_rexford_comparators(&self) -> Vec<GaoRexfordComparator> {
        vec![local_pref_comparator, path_length_comparator, neighbor_tiebreak_comparator]
    }

    /// Extension hook: if this returns true, the extension has fully
    /// handled dispatch to `neighbor` for `ann` and the default outgoing
    /// step is skipped.
    fn policy_propagate(
        &self,
        _neighbor: ASN,
        _ann: &Announcement,
        _target_rel: Relationships,
        _outgoing: &mut Vec<(ASN, Announcement)>,
    ) -> bool {
        false
    }

    /// Extension hook: suppress re-sending an announcement already sent
    /// to this neighbor. Baseline never suppresses.
    fn prev_sent(&self, _neighbor: ASN, _ann: &Announcement) -> bool {
        false
    }

    /// Extension hook applied to the announcement actually placed on the
    /// wire to a neighbor, after the default export decision. Identity by
    /// default; path extension happens on the receiver's `copy_and_process`.
    fn process_outgoing_ann(&self, _neighbor: ASN, ann: &Announcement) -> Announcement {
        ann.clone()
    }

    fn name(&self) -> &str;
}

fn allowed_recv_rels(target_rel: Relationships) -> &'static [Relationships] {
    match target_rel {
        Relationships::Providers | Relationships::Peers => {
            &[Relationships::Origin, Relationships::Customers]
        }
        Relationships::Customers => &[
            Relationships::Origin,
            Relationships::Customers,
            Relationships::Peers,
            Relationships::Providers,
        ],
        _ => &[],
    }
}

/// One AS's decision state: its local RIB, its receive queue, and the
/// extension object implementing its decision process.
pub struct Policy {
    pub asn: ASN,
    pub local_rib: LocalRib,
    pub recv_queue: RecvQueue,
    pub extension: Box<dyn PolicyExtension>,
}

impl Policy {
    pub fn new(asn: ASN, extension: Box<dyn PolicyExtension>) -> Self {
        Policy {
            asn,
            local_rib: LocalRib::new(),
            recv_queue: RecvQueue::new(),
            extension,
        }
    }

    pub fn receive_ann(&mut self, ann: Announcement) {
        self.recv_queue.add(ann);
    }

    fn gao_rexford(&self, current: Option<&Announcement>, new: Announcement) -> Result<Announcement, SimError> {
        let current = match current {
            None => return Ok(new),
            Some(c) => c,
        };
        for comparator in self.extension.gao_rexford_comparators() {
            match comparator(current, &new) {
                Some(Preference::New) => return Ok(new),
                Some(Preference::Current) => return Ok(current.clone()),
                None => continue,
            }
        }
        Err(SimError::GaoRexfordTie)
    }

    /// Drains the receive queue, selecting a new best path per prefix via
    /// the Gao-Rexford chain. Seeded prefixes are never overwritten.
    ///
    /// `round` mirrors the engine's current round so extensions that are
    /// round-sensitive can be added later; the baseline decision process
    /// doesn't consult it.
    pub fn process_incoming_anns(
        &mut self,
        from_rel: Relationships,
        round: i64,
        as_obj: &AS,
        reset_queue: bool,
    ) -> Result<(), SimError> {
        let _ = round;
        let queue_entries: Vec<(Prefix, Vec<Announcement>)> = self
            .recv_queue
            .entries()
            .map(|(p, list)| (p.clone(), list.clone()))
            .collect();

        for (prefix, ann_list) in queue_entries {
            if let Some(existing) = self.local_rib.get(&prefix) {
                if existing.seed_asn.is_some() {
                    continue;
                }
            }

            let og = self.local_rib.get(&prefix).cloned();
            let mut current = og.clone();

            for new_ann in ann_list {
                if !self.extension.valid_ann(&new_ann, from_rel, as_obj) {
                    continue;
                }
                let processed = self.extension.copy_and_process(&new_ann, as_obj, from_rel);
                current = Some(self.gao_rexford(current.as_ref(), processed)?);
            }

            if current != og {
                if let Some(winner) = current {
                    self.local_rib.add(winner);
                }
            }
        }

        if reset_queue {
            self.recv_queue.clear();
        }
        Ok(())
    }

    /// Computes the `(neighbor, announcement)` pairs to dispatch toward
    /// `target_rel`. Dispatch itself is the caller's job (the engine),
    /// since a policy never holds a live handle to its neighbors' state.
    pub fn propagate(&self, target_rel: Relationships, as_obj: &AS) -> Vec<(ASN, Announcement)> {
        let neighbors = as_obj.get_neighbors(target_rel);
        let allowed = allowed_recv_rels(target_rel);
        let mut outgoing = Vec::new();

        for &neighbor in neighbors {
            for (_, ann) in self.local_rib.entries() {
                if !allowed.contains(&ann.recv_relationship) {
                    continue;
                }
                if self.extension.prev_sent(neighbor, ann) {
                    continue;
                }
                if self.extension.policy_propagate(neighbor, ann, target_rel, &mut outgoing) {
                    continue;
                }
                outgoing.push((neighbor, self.extension.process_outgoing_ann(neighbor, ann)));
            }
        }
        outgoing
    }

    pub fn propagate_to_providers(&self, as_obj: &AS) -> Vec<(ASN, Announcement)> {
        self.propagate(Relationships::Providers, as_obj)
    }

    pub fn propagate_to_peers(&self, as_obj: &AS) -> Vec<(ASN, Announcement)> {
        self.propagate(Relationships::Peers, as_obj)
    }

    pub fn propagate_to_customers(&self, as_obj: &AS) -> Vec<(ASN, Announcement)> {
        self.propagate(Relationships::Customers, as_obj)
    }
}

/// Owning arena of every AS's `Policy`, built 1:1 with an `ASGraph`.
#[derive(Default)]
pub struct PolicyStore {
    policies: HashMap<ASN, Policy>,
}

impl PolicyStore {
    pub fn new() -> Self {
        PolicyStore { policies: HashMap::new() }
    }

    pub fn insert(&mut self, policy: Policy) {
        self.policies.insert(policy.asn, policy);
    }

    pub fn get(&self, asn: ASN) -> Option<&Policy> {
        self.policies.get(&asn)
    }

    pub fn get_mut(&mut self, asn: ASN) -> Option<&mut Policy> {
        self.policies.get_mut(&asn)
    }

    pub fn asns(&self) -> impl Iterator<Item = ASN> + '_ {
        self.policies.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

type PolicyFactory = fn(ASN) -> Box<dyn PolicyExtension>;

/// Name -> constructor registry, consumed by `SimulationEngine::setup`.
#[derive(Default)]
pub struct PolicyRegistry {
    factories: HashMap<String, PolicyFactory>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        let mut registry = PolicyRegistry { factories: HashMap::new() };
        registry.register("BGP", |_asn| Box::new(extensions::bgp::BgpPolicy));
        registry.register("ROV", |_asn| Box::new(extensions::rov::RovPolicy));
        registry.register("OnlyToCustomers", |_asn| Box::new(extensions::only_to_customers::OnlyToCustomersPolicy));
        registry
    }

    pub fn register(&mut self, name: &str, factory: PolicyFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str, asn: ASN) -> Result<Box<dyn PolicyExtension>, SimError> {
        match self.factories.get(name) {
            Some(factory) => Ok(factory(asn)),
            None => Err(SimError::UnknownPolicy(name.to_string())),
        }
    }
}

use std::collections::HashMap;

use crate::announcement::Announcement;
use crate::as_graph::{ASGraph, ASN};
use crate::error::SimError;
use crate::policy::{Policy, PolicyRegistry, PolicyStore};
use crate::shared::Relationships;

/// Drives the three-stage propagation round over a read-only topology.
pub struct SimulationEngine<'a> {
    as_graph: &'a ASGraph,
    policy_store: PolicyStore,
    ready_to_run_round: i64,
}

impl<'a> SimulationEngine<'a> {
    /// Assigns a policy to every AS (by name, with per-ASN overrides) and
    /// seeds the initial announcements directly into their owning AS's
    /// local RIB, bypassing the receive queue.
    pub fn setup(
        as_graph: &'a ASGraph,
        seeds: Vec<Announcement>,
        base_policy: &str,
        overrides: &HashMap<ASN, String>,
        registry: &PolicyRegistry,
    ) -> Result<Self, SimError> {
        let mut policy_store = PolicyStore::new();
        for as_obj in as_graph.iter() {
            let name = overrides.get(&as_obj.asn).map(|s| s.as_str()).unwrap_or(base_policy);
            let extension = registry.create(name, as_obj.asn)?;
            policy_store.insert(Policy::new(as_obj.asn, extension));
        }

        let mut engine = SimulationEngine {
            as_graph,
            policy_store,
            ready_to_run_round: 0,
        };

        for ann in seeds {
            let asn = ann.seed_asn.ok_or(SimError::MissingSeedAsn)?;
            if as_graph.get(asn).is_none() {
                return Err(SimError::UnknownSeedAsn(asn));
            }
            let policy = engine
                .policy_store
                .get_mut(asn)
                .ok_or(SimError::StaleReference(asn))?;
            if policy.local_rib.get(&ann.prefix).is_some() {
                return Err(SimError::SeedConflict {
                    asn,
                    prefix: ann.prefix.clone(),
                });
            }
            policy.local_rib.add(ann);
        }

        Ok(engine)
    }

    pub fn policy_store(&self) -> &PolicyStore {
        &self.policy_store
    }

    pub fn ready_to_run_round(&self) -> i64 {
        self.ready_to_run_round
    }

    /// Snapshots every AS's local RIB as nested JSON: ASN -> prefix ->
    /// the announcement installed for it.
    pub fn to_json(&self) -> serde_json::Value {
        let mut asns: Vec<ASN> = self.policy_store.asns().collect();
        asns.sort_unstable();

        let mut ribs = serde_json::Map::new();
        for asn in asns {
            let policy = match self.policy_store.get(asn) {
                Some(policy) => policy,
                None => continue,
            };
            let mut prefixes = serde_json::Map::new();
            for (prefix, ann) in policy.local_rib.entries() {
                let value = serde_json::to_value(ann).unwrap_or(serde_json::Value::Null);
                prefixes.insert(prefix.clone(), value);
            }
            ribs.insert(asn.to_string(), serde_json::Value::Object(prefixes));
        }
        serde_json::Value::Object(ribs)
    }

    /// Runs one full round: up to providers by ascending rank, flat peer
    /// exchange, then down to customers by descending rank.
    pub fn run(&mut self, round: i64) -> Result<(), SimError> {
        if round != self.ready_to_run_round {
            return Err(SimError::WrongRound {
                expected: self.ready_to_run_round,
                got: round,
            });
        }

        self.phase_up_to_providers(round)?;
        self.phase_peers(round)?;
        self.phase_down_to_customers(round)?;

        self.ready_to_run_round += 1;
        Ok(())
    }

    fn dispatch(&mut self, outgoing: Vec<(ASN, Announcement)>) -> Result<(), SimError> {
        for (neighbor, ann) in outgoing {
            match self.policy_store.get_mut(neighbor) {
                Some(policy) => policy.receive_ann(ann),
                None => return Err(SimError::StaleReference(neighbor)),
            }
        }
        Ok(())
    }

    fn phase_up_to_providers(&mut self, round: i64) -> Result<(), SimError> {
        for rank in 0..=self.as_graph.max_rank() {
            let asns = self.as_graph.propagation_ranks[rank].clone();

            if rank > 0 {
                for &asn in &asns {
                    let as_obj = self.as_graph.get(asn).ok_or(SimError::StaleReference(asn))?;
                    self.policy_store
                        .get_mut(asn)
                        .ok_or(SimError::StaleReference(asn))?
                        .process_incoming_anns(Relationships::Customers, round, as_obj, true)?;
                }
            }

            for &asn in &asns {
                let as_obj = self.as_graph.get(asn).ok_or(SimError::StaleReference(asn))?;
                let outgoing = self
                    .policy_store
                    .get(asn)
                    .ok_or(SimError::StaleReference(asn))?
                    .propagate_to_providers(as_obj);
                self.dispatch(outgoing)?;
            }
        }
        Ok(())
    }

    fn phase_peers(&mut self, round: i64) -> Result<(), SimError> {
        let mut asns: Vec<ASN> = self.as_graph.iter().map(|a| a.asn).collect();
        asns.sort_unstable();

        for &asn in &asns {
            let as_obj = self.as_graph.get(asn).ok_or(SimError::StaleReference(asn))?;
            let outgoing = self
                .policy_store
                .get(asn)
                .ok_or(SimError::StaleReference(asn))?
                .propagate_to_peers(as_obj);
            self.dispatch(outgoing)?;
        }

        for &asn in &asns {
            let as_obj = self.as_graph.get(asn).ok_or(SimError::StaleReference(asn))?;
            self.policy_store
                .get_mut(asn)
                .ok_or(SimError::StaleReference(asn))?
                .process_incoming_anns(Relationships::Peers, round, as_obj, true)?;
        }
        Ok(())
    }

    fn phase_down_to_customers(&mut self, round: i64) -> Result<(), SimError> {
        let max_rank = self.as_graph.max_rank();
        for rank in (0..=max_rank).rev() {
            let asns = self.as_graph.propagation_ranks[rank].clone();

            if rank != max_rank {
                for &asn in &asns {
                    let as_obj = self.as_graph.get(asn).ok_or(SimError::StaleReference(asn))?;
                    self.policy_store
                        .get_mut(asn)
                        .ok_or(SimError::StaleReference(asn))?
                        .process_incoming_anns(Relationships::Providers, round, as_obj, true)?;
                }
            }

            for &asn in &asns {
                let as_obj = self.as_graph.get(asn).ok_or(SimError::StaleReference(asn))?;
                let outgoing = self
                    .policy_store
                    .get(asn)
                    .ok_or(SimError::StaleReference(asn))?
                    .propagate_to_customers(as_obj);
                self.dispatch(outgoing)?;
            }
        }
        Ok(())
    }
}

use std::collections::HashMap;

use crate::shared::Relationships;

pub type ASN = u32;

/// A single Autonomous System. Neighbors are stored as ASNs, never as
/// owning or weak pointers — resolving one always goes through the
/// `ASGraph` that owns the full arena.
#[derive(Debug, Clone)]
pub struct AS {
    pub asn: ASN,
    pub peers: Vec<ASN>,
    pub providers: Vec<ASN>,
    pub customers: Vec<ASN>,
    pub input_clique: bool,
    pub ixp: bool,
    pub stub: bool,
    pub multihomed: bool,
    pub transit: bool,
    pub customer_cone_size: u64,
    pub propagation_rank: u32,
}

impl AS {
    pub fn new(asn: ASN) -> Self {
        AS {
            asn,
            peers: Vec::new(),
            providers: Vec::new(),
            customers: Vec::new(),
            input_clique: false,
            ixp: false,
            stub: false,
            multihomed: false,
            transit: false,
            customer_cone_size: 0,
            propagation_rank: 0,
        }
    }

    pub fn get_neighbors(&self, rel: Relationships) -> &[ASN] {
        match rel {
            Relationships::Providers => &self.providers,
            Relationships::Peers => &self.peers,
            Relationships::Customers => &self.customers,
            _ => &[],
        }
    }
}

/// Fluent builder for hand-written test/demo topologies, mirroring the
/// `with_*` idiom used for announcement and engine configuration.
#[derive(Debug, Clone)]
pub struct ASBuilder {
    inner: AS,
}

impl ASBuilder {
    pub fn new(asn: ASN) -> Self {
        ASBuilder { inner: AS::new(asn) }
    }

    pub fn with_peers(mut self, peers: Vec<ASN>) -> Self {
        self.inner.peers = peers;
        self
    }

    pub fn with_providers(mut self, providers: Vec<ASN>) -> Self {
        self.inner.providers = providers;
        self
    }

    pub fn with_customers(mut self, customers: Vec<ASN>) -> Self {
        self.inner.customers = customers;
        self
    }

    pub fn with_propagation_rank(mut self, rank: u32) -> Self {
        self.inner.propagation_rank = rank;
        self
    }

    pub fn with_input_clique(mut self, v: bool) -> Self {
        self.inner.input_clique = v;
        self
    }

    pub fn with_ixp(mut self, v: bool) -> Self {
        self.inner.ixp = v;
        self
    }

    pub fn build(self) -> AS {
        self.inner
    }
}

/// Owning arena of every `AS` in the topology, plus the propagation-rank
/// buckets the engine walks round by round.
#[derive(Debug, Clone, Default)]
pub struct ASGraph {
    pub as_dict: HashMap<ASN, AS>,
    pub propagation_ranks: Vec<Vec<ASN>>,
}

impl ASGraph {
    pub fn new() -> Self {
        ASGraph {
            as_dict: HashMap::new(),
            propagation_ranks: Vec::new(),
        }
    }

    pub fn get(&self, asn: ASN) -> Option<&AS> {
        self.as_dict.get(&asn)
    }

    pub fn get_mut(&mut self, asn: ASN) -> Option<&mut AS> {
        self.as_dict.get_mut(&asn)
    }

    pub fn insert(&mut self, as_obj: AS) {
        self.as_dict.insert(as_obj.asn, as_obj);
    }

    pub fn iter(&self) -> impl Iterator<Item = &AS> {
        self.as_dict.values()
    }

    pub fn len(&self) -> usize {
        self.as_dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_dict.is_empty()
    }

    /// Buckets ASNs by their already-assigned `propagation_rank`, sorting
    /// each bucket ascending. Ranks are a property of the input file, not
    /// something this graph infers from topology.
    pub fn calculate_propagation_ranks(&mut self) {
        let max_rank = self
            .as_dict
            .values()
            .map(|a| a.propagation_rank)
            .max()
            .unwrap_or(0);

        let mut ranks: Vec<Vec<ASN>> = vec![Vec::new(); (max_rank + 1) as usize];
        for a in self.as_dict.values() {
            ranks[a.propagation_rank as usize].push(a.asn);
        }
        for bucket in &mut ranks {
            bucket.sort_unstable();
        }
        self.propagation_ranks = ranks;
    }

    pub fn max_rank(&self) -> usize {
        self.propagation_ranks.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_bucket_by_existing_field() {
        let mut g = ASGraph::new();
        g.insert(ASBuilder::new(1).with_propagation_rank(0).build());
        g.insert(ASBuilder::new(2).with_propagation_rank(1).build());
        g.insert(ASBuilder::new(3).with_propagation_rank(1).build());
        g.calculate_propagation_ranks();

        assert_eq!(g.propagation_ranks.len(), 2);
        assert_eq!(g.propagation_ranks[0], vec![1]);
        assert_eq!(g.propagation_ranks[1], vec![2, 3]);
        assert_eq!(g.max_rank(), 1);
    }

    #[test]
    fn get_neighbors_by_relationship() {
        let a = ASBuilder::new(1)
            .with_peers(vec![2])
            .with_providers(vec![3])
            .with_customers(vec![4, 5])
            .build();
        assert_eq!(a.get_neighbors(Relationships::Peers), &[2]);
        assert_eq!(a.get_neighbors(Relationships::Providers), &[3]);
        assert_eq!(a.get_neighbors(Relationships::Customers), &[4, 5]);
        assert_eq!(a.get_neighbors(Relationships::Origin), &[] as &[ASN]);
    }
}

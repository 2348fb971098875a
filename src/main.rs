use std::collections::HashMap;

use bgp_propagation_sim::{ASBuilder, ASGraph, AnnouncementBuilder, PolicyRegistry, Relationships, SimulationEngine};

/// A single runnable walkthrough: a small topology, one seeded route, a
/// few propagation rounds, and the resulting per-AS best paths.
fn main() {
    println!("BGP route propagation walkthrough\n");

    let as_graph = build_topology();
    let registry = PolicyRegistry::new();

    let seed = AnnouncementBuilder::new("198.51.100.0/24".to_string(), vec![1], 0, Relationships::Origin)
        .with_seed_asn(1)
        .build();

    let mut engine = SimulationEngine::setup(&as_graph, vec![seed], "BGP", &HashMap::new(), &registry)
        .expect("setup should succeed for a well-formed topology");

    for round in 0..3 {
        engine.run(round).expect("round should run to completion");
    }

    for asn in [1u32, 2, 3, 4, 5] {
        let policy = engine.policy_store().get(asn).expect("every AS has a policy");
        match policy.local_rib.get("198.51.100.0/24") {
            Some(ann) => println!("AS{asn}: path={:?} via={}", ann.as_path, ann.recv_relationship),
            None => println!("AS{asn}: no route"),
        }
    }

    println!("\nRIB snapshot:");
    println!("{}", serde_json::to_string_pretty(&engine.to_json()).expect("snapshot serializes"));
}

/// Tier-1 pair (1, 2) as peers; 3 and 4 are customers of 1; 5 is a
/// customer of both 3 and 4 (multihomed stub).
fn build_topology() -> ASGraph {
    let mut g = ASGraph::new();
    g.insert(
        ASBuilder::new(1)
            .with_peers(vec![2])
            .with_customers(vec![3, 4])
            .with_propagation_rank(2)
            .build(),
    );
    g.insert(
        ASBuilder::new(2)
            .with_peers(vec![1])
            .with_propagation_rank(2)
            .build(),
    );
    g.insert(
        ASBuilder::new(3)
            .with_providers(vec![1])
            .with_customers(vec![5])
            .with_propagation_rank(1)
            .build(),
    );
    g.insert(
        ASBuilder::new(4)
            .with_providers(vec![1])
            .with_customers(vec![5])
            .with_propagation_rank(1)
            .build(),
    );
    g.insert(
        ASBuilder::new(5)
            .with_providers(vec![3, 4])
            .with_propagation_rank(0)
            .build(),
    );
    g.calculate_propagation_ranks();
    g
}

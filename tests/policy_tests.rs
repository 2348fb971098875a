use bgp_propagation_sim::policy::extensions::bgp::BgpPolicy;
use bgp_propagation_sim::policy::extensions::only_to_customers::OnlyToCustomersPolicy;
use bgp_propagation_sim::policy::extensions::rov::RovPolicy;
use bgp_propagation_sim::policy::{Policy, PolicyRegistry};
use bgp_propagation_sim::{ASBuilder, Announcement, AnnouncementBuilder, PolicyExtension, Relationships};

fn test_as() -> bgp_propagation_sim::AS {
    ASBuilder::new(1)
        .with_peers(vec![2, 3])
        .with_providers(vec![4])
        .with_customers(vec![5, 6])
        .build()
}

#[test]
fn bgp_policy_rejects_loops_but_accepts_otherwise() {
    let policy = BgpPolicy;
    let as_obj = test_as();

    let ann = Announcement::new("10.0.0.0/24".to_string(), vec![2, 7], 0, Relationships::Peers);
    assert!(policy.valid_ann(&ann, Relationships::Peers, &as_obj));

    let looped = Announcement::new("10.0.0.0/24".to_string(), vec![2, 1, 7], 0, Relationships::Peers);
    assert!(!policy.valid_ann(&looped, Relationships::Peers, &as_obj));
}

#[test]
fn bgp_policy_copy_and_process_prepends_local_asn() {
    let policy = BgpPolicy;
    let as_obj = test_as();
    let ann = Announcement::new("10.0.0.0/24".to_string(), vec![7], 0, Relationships::Customers);

    let processed = policy.copy_and_process(&ann, &as_obj, Relationships::Customers);
    assert_eq!(processed.as_path, vec![1, 7]);
    assert_eq!(processed.recv_relationship, Relationships::Customers);
}

#[test]
fn rov_policy_rejects_invalid_origin_but_accepts_unknown() {
    let policy = RovPolicy;
    let as_obj = test_as();

    let invalid = AnnouncementBuilder::new("10.0.0.0/24".to_string(), vec![2, 99], 0, Relationships::Peers)
        .with_roa(7, true)
        .build();
    assert!(!policy.valid_ann(&invalid, Relationships::Peers, &as_obj));

    let unknown = Announcement::new("10.0.0.0/24".to_string(), vec![2, 99], 0, Relationships::Peers);
    assert!(policy.valid_ann(&unknown, Relationships::Peers, &as_obj));
}

#[test]
fn only_to_customers_suppresses_export_to_peers_and_providers() {
    let policy = OnlyToCustomersPolicy;
    let as_obj = test_as();

    let incoming = Announcement::new("10.0.0.0/24".to_string(), vec![2], 0, Relationships::Peers);
    let tagged = policy.copy_and_process(&incoming, &as_obj, Relationships::Peers);
    assert!(tagged.communities.iter().any(|c| c == "only-to-customers"));

    let mut outgoing = Vec::new();
    assert!(policy.policy_propagate(4, &tagged, Relationships::Providers, &mut outgoing));
    assert!(!policy.policy_propagate(5, &tagged, Relationships::Customers, &mut outgoing));
}

#[test]
fn process_incoming_anns_installs_the_gao_rexford_winner() {
    let as_obj = test_as();
    let mut policy = Policy::new(1, Box::new(BgpPolicy));

    policy.receive_ann(Announcement::new("10.0.0.0/24".to_string(), vec![2, 99], 0, Relationships::Peers));
    policy.receive_ann(Announcement::new("10.0.0.0/24".to_string(), vec![5, 99], 0, Relationships::Customers));
    policy.process_incoming_anns(Relationships::Customers, 0, &as_obj, true).unwrap();

    let winner = policy.local_rib.get("10.0.0.0/24").unwrap();
    assert_eq!(winner.recv_relationship, Relationships::Customers);
    assert_eq!(winner.as_path, vec![1, 5, 99]);
}

#[test]
fn registry_creates_registered_policies_and_rejects_unknown_names() {
    let registry = PolicyRegistry::new();
    assert_eq!(registry.create("BGP", 1).unwrap().name(), "BGP");
    assert_eq!(registry.create("ROV", 1).unwrap().name(), "ROV");
    assert_eq!(registry.create("OnlyToCustomers", 1).unwrap().name(), "OnlyToCustomers");
    assert!(registry.create("NoSuchPolicy", 1).is_err());
}

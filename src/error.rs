use std::fmt;

/// Every fatal condition the simulation engine and its input loader can raise.
#[derive(Debug)]
pub enum SimError {
    /// `setup` was asked for a policy name not in the registry.
    UnknownPolicy(String),
    /// A seed announcement's `seed_asn` does not match any AS in the graph.
    UnknownSeedAsn(u32),
    /// A seed announcement was supplied with no `seed_asn`.
    MissingSeedAsn,
    /// The seed AS's local RIB already holds an entry for the seeded prefix.
    SeedConflict { asn: u32, prefix: String },
    /// `run(round)` was called out of order.
    WrongRound { expected: i64, got: i64 },
    /// The relationship file's header line didn't match the expected columns.
    MalformedHeader(String),
    /// A column expected to be an integer wasn't.
    MalformedInteger(String),
    /// A neighbor-set column wasn't wrapped in `{}`.
    MalformedAsnSet(String),
    /// A policy held a neighbor ASN the graph/store no longer has.
    StaleReference(u32),
    /// The Gao-Rexford comparator chain was exhausted without a winner.
    GaoRexfordTie,
    /// An announcement with an empty AS path reached a point that required one.
    EmptyAsPath,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnknownPolicy(name) => write!(f, "unknown policy: {name}"),
            SimError::UnknownSeedAsn(asn) => write!(f, "seed ASN {asn} not present in graph"),
            SimError::MissingSeedAsn => write!(f, "seed announcement has no seed_asn"),
            SimError::SeedConflict { asn, prefix } => {
                write!(f, "AS{asn} already has a local RIB entry for {prefix}")
            }
            SimError::WrongRound { expected, got } => {
                write!(f, "expected round {expected}, got {got}")
            }
            SimError::MalformedHeader(h) => write!(f, "malformed relationship file header: {h}"),
            SimError::MalformedInteger(s) => write!(f, "malformed integer column: {s}"),
            SimError::MalformedAsnSet(s) => write!(f, "malformed ASN set column: {s}"),
            SimError::StaleReference(asn) => write!(f, "stale reference to AS{asn}"),
            SimError::GaoRexfordTie => write!(f, "Gao-Rexford comparator chain failed to decide"),
            SimError::EmptyAsPath => write!(f, "announcement has an empty AS path"),
        }
    }
}

impl std::error::Error for SimError {}

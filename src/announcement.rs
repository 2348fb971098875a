use std::collections::BTreeMap;

use crate::as_graph::ASN;
use crate::error::SimError;
use crate::shared::Relationships;

/// Prefixes are opaque tokens to the core — never parsed or interpreted
/// as an IP network.
pub type Prefix = String;

/// An immutable route record. Nothing mutates a shared `Announcement` in
/// place; `copy_and_process` always allocates a new one.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Announcement {
    pub prefix: Prefix,
    pub as_path: Vec<ASN>,
    pub timestamp: i64,
    pub seed_asn: Option<ASN>,
    pub roa_valid_length: Option<bool>,
    pub roa_origin: Option<ASN>,
    pub recv_relationship: Relationships,
    pub withdraw: bool,
    pub traceback_end: bool,
    pub communities: Vec<String>,
}

impl Announcement {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        prefix: Prefix,
        as_path: Vec<ASN>,
        timestamp: i64,
        recv_relationship: Relationships,
    ) -> Self {
        Announcement {
            prefix,
            as_path,
            timestamp,
            seed_asn: None,
            roa_valid_length: None,
            roa_origin: None,
            recv_relationship,
            withdraw: false,
            traceback_end: false,
            communities: Vec::new(),
        }
    }

    /// The origin ASN: the last hop of the path. Every announcement that
    /// reaches a RIB or queue must have a non-empty path.
    pub fn origin(&self) -> Result<ASN, SimError> {
        self.as_path.last().copied().ok_or(SimError::EmptyAsPath)
    }

    pub fn prefix_path_attributes_eq(&self, other: &Announcement) -> bool {
        self.prefix == other.prefix && self.as_path == other.as_path
    }

    pub fn invalid_by_roa(&self) -> bool {
        match (self.roa_origin, self.as_path.last()) {
            (Some(roa_origin), Some(&origin)) => {
                origin != roa_origin || self.roa_valid_length == Some(false)
            }
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    pub fn valid_by_roa(&self) -> bool {
        match (self.roa_origin, self.as_path.last()) {
            (Some(roa_origin), Some(&origin)) => {
                origin == roa_origin && self.roa_valid_length == Some(true)
            }
            _ => false,
        }
    }

    pub fn unknown_by_roa(&self) -> bool {
        !self.invalid_by_roa() && !self.valid_by_roa()
    }

    pub fn covered_by_roa(&self) -> bool {
        !self.unknown_by_roa()
    }

    pub fn roa_routed(&self) -> bool {
        matches!(self.roa_origin, Some(origin) if origin != 0)
    }
}

/// Fluent builder for announcements, matching this crate's `with_*`
/// builder idiom used elsewhere for AS and engine configuration.
#[derive(Debug, Clone)]
pub struct AnnouncementBuilder {
    inner: Announcement,
}

impl AnnouncementBuilder {
    pub fn new(prefix: Prefix, as_path: Vec<ASN>, timestamp: i64, recv_relationship: Relationships) -> Self {
        AnnouncementBuilder {
            inner: Announcement::new(prefix, as_path, timestamp, recv_relationship),
        }
    }

    pub fn with_seed_asn(mut self, asn: ASN) -> Self {
        self.inner.seed_asn = Some(asn);
        self
    }

    pub fn with_roa(mut self, origin: ASN, valid_length: bool) -> Self {
        self.inner.roa_origin = Some(origin);
        self.inner.roa_valid_length = Some(valid_length);
        self
    }

    pub fn with_withdraw(mut self, v: bool) -> Self {
        self.inner.withdraw = v;
        self
    }

    pub fn with_traceback_end(mut self, v: bool) -> Self {
        self.inner.traceback_end = v;
        self
    }

    pub fn with_communities(mut self, communities: Vec<String>) -> Self {
        self.inner.communities = communities;
        self
    }

    pub fn build(self) -> Announcement {
        self.inner
    }
}

/// Per-AS best-path table, one entry per prefix. Backed by a `BTreeMap`
/// so iteration is ascending-lexicographic by construction.
#[derive(Debug, Clone, Default)]
pub struct LocalRib {
    entries: BTreeMap<Prefix, Announcement>,
}

impl LocalRib {
    pub fn new() -> Self {
        LocalRib { entries: BTreeMap::new() }
    }

    pub fn get(&self, prefix: &str) -> Option<&Announcement> {
        self.entries.get(prefix)
    }

    pub fn add(&mut self, ann: Announcement) {
        self.entries.insert(ann.prefix.clone(), ann);
    }

    pub fn remove(&mut self, prefix: &str) -> Option<Announcement> {
        self.entries.remove(prefix)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Prefix, &Announcement)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-AS staging area for announcements received during the current
/// stage, grouped by prefix in receipt order.
#[derive(Debug, Clone, Default)]
pub struct RecvQueue {
    entries: BTreeMap<Prefix, Vec<Announcement>>,
}

impl RecvQueue {
    pub fn new() -> Self {
        RecvQueue { entries: BTreeMap::new() }
    }

    pub fn add(&mut self, ann: Announcement) {
        self.entries.entry(ann.prefix.clone()).or_default().push(ann);
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Prefix, &Vec<Announcement>)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub mod announcement;
pub mod as_graph;
pub mod engine;
pub mod error;
pub mod graph_loader;
pub mod policy;
pub mod shared;

pub use announcement::{Announcement, AnnouncementBuilder, LocalRib, Prefix, RecvQueue};
pub use as_graph::{AS, ASBuilder, ASGraph, ASN};
pub use engine::SimulationEngine;
pub use error::SimError;
pub use policy::{Policy, PolicyExtension, PolicyRegistry, PolicyStore, Preference};
pub use shared::Relationships;

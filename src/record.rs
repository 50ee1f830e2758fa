use ahash::AHashSet;
use particle_id::ParticleID;

use crate::{
    mass::{ELECTRON, PHOTON, POSITRON},
    vector::ThreeVector,
};

/// One generated particle, as found in the input stream
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParticleRecord {
    pub event: i64,
    pub id: ParticleID,
    /// Type of the parent particle, 0 for primary particles
    pub parent: ParticleID,
    pub p: ThreeVector,
    pub energy: f64,
    /// Production vertex
    pub vertex: ThreeVector,
}

/// How a record is routed by the dispatcher
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Class {
    /// Primary electron, defines the virtual photon of its event
    ScatteredLepton,
    Hadron,
    /// Neither the scattered lepton nor a hadron
    Excluded,
}

/// Particle classification rule
///
/// A record is the scattered lepton if it is a primary electron. Any
/// other record whose type is in the exclusion set is dropped, and all
/// remaining records are hadrons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    excluded: AHashSet<i32>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            excluded: AHashSet::from_iter([ELECTRON, POSITRON, PHOTON]),
        }
    }
}

impl Selection {
    /// Also drop particles of type `id`
    pub fn exclude(mut self, id: ParticleID) -> Self {
        self.excluded.insert(id.id());
        self
    }

    /// Treat particles of type `id` as hadrons
    pub fn keep(mut self, id: ParticleID) -> Self {
        self.excluded.remove(&id.id());
        self
    }

    pub fn is_excluded(&self, id: ParticleID) -> bool {
        self.excluded.contains(&id.id())
    }

    pub fn classify(&self, record: &ParticleRecord) -> Class {
        if record.id.id() == ELECTRON && record.parent.id() == 0 {
            Class::ScatteredLepton
        } else if self.is_excluded(record.id) {
            Class::Excluded
        } else {
            Class::Hadron
        }
    }
}

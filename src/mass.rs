use ahash::AHashMap;
use particle_id::ParticleID;

use crate::error::ConfigError;

// PDG Monte Carlo particle numbers
pub const PHOTON: i32 = 22;
pub const ELECTRON: i32 = 11;
pub const POSITRON: i32 = -11;
pub const MUON_MINUS: i32 = 13;
pub const MUON_PLUS: i32 = -13;
pub const PI_ZERO: i32 = 111;
pub const PI_PLUS: i32 = 211;
pub const PI_MINUS: i32 = -211;
pub const K_ZERO_LONG: i32 = 130;
pub const K_ZERO_SHORT: i32 = 310;
pub const K_ZERO: i32 = 311;
pub const K_PLUS: i32 = 321;
pub const K_MINUS: i32 = -321;
pub const ETA: i32 = 221;
pub const OMEGA: i32 = 223;
pub const PROTON: i32 = 2212;
pub const NEUTRON: i32 = 2112;

/// Rest masses in GeV
pub mod gev {
    pub const PHOTON: f64 = 0.;
    pub const ELECTRON: f64 = 5.109998e-4;
    pub const MUON: f64 = 0.105658;
    pub const PI_ZERO: f64 = 0.134977;
    pub const PI_CHARGED: f64 = 0.139570;
    pub const K_ZERO: f64 = 0.497614;
    pub const K_CHARGED: f64 = 0.493677;
    pub const ETA: f64 = 0.547853;
    pub const OMEGA: f64 = 0.782650;
    pub const PROTON: f64 = 0.938272;
    pub const NEUTRON: f64 = 0.939565;
}

const DEFAULT_MASSES: [(i32, f64); 17] = [
    (PHOTON, gev::PHOTON),
    (ELECTRON, gev::ELECTRON),
    (POSITRON, gev::ELECTRON),
    (MUON_MINUS, gev::MUON),
    (MUON_PLUS, gev::MUON),
    (PI_ZERO, gev::PI_ZERO),
    (PI_PLUS, gev::PI_CHARGED),
    (PI_MINUS, gev::PI_CHARGED),
    (K_ZERO_LONG, gev::K_ZERO),
    (K_ZERO_SHORT, gev::K_ZERO),
    (K_ZERO, gev::K_ZERO),
    (K_PLUS, gev::K_CHARGED),
    (K_MINUS, gev::K_CHARGED),
    (ETA, gev::ETA),
    (OMEGA, gev::OMEGA),
    (PROTON, gev::PROTON),
    (NEUTRON, gev::NEUTRON),
];

/// Rest masses by particle type
///
/// The table is closed: any particle type it does not list is treated as
/// massless. This is intentional, bookkeeping entries in generator output
/// have no meaningful mass.
#[derive(Clone, Debug, PartialEq)]
pub struct MassTable {
    masses: AHashMap<i32, f64>,
}

impl Default for MassTable {
    fn default() -> Self {
        Self {
            masses: AHashMap::from_iter(DEFAULT_MASSES),
        }
    }
}

impl MassTable {
    /// Override or add the mass of one particle type
    pub fn with_mass(mut self, id: ParticleID, mass: f64) -> Result<Self, ConfigError> {
        if !mass.is_finite() || mass < 0. {
            return Err(ConfigError::Mass { pid: id.id(), mass });
        }
        self.masses.insert(id.id(), mass);
        Ok(self)
    }

    /// Rest mass in GeV, zero for unlisted particle types
    pub fn mass_of(&self, id: ParticleID) -> f64 {
        self.masses.get(&id.id()).copied().unwrap_or_default()
    }

    /// The target mass entering Xb and W
    pub fn proton(&self) -> f64 {
        self.mass_of(ParticleID::new(PROTON))
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}

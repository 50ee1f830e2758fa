use crate::{error::ConfigError, mass::MassTable, vector::ThreeVector};

/// Beam energy of the original CLAS12 simulation, in GeV
pub const DEFAULT_BEAM_ENERGY: f64 = 11.;

/// Fixed run conditions shared by all calculators
///
/// The incoming lepton is taken to be massless and to travel along +z
/// with momentum equal to the beam energy.
#[derive(Clone, Debug, PartialEq)]
pub struct BeamConfig {
    energy: f64,
    masses: MassTable,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            energy: DEFAULT_BEAM_ENERGY,
            masses: MassTable::default(),
        }
    }
}

impl BeamConfig {
    pub fn new(energy: f64) -> Result<Self, ConfigError> {
        if !energy.is_finite() || energy <= 0. {
            return Err(ConfigError::BeamEnergy(energy));
        }
        Ok(Self {
            energy,
            ..Default::default()
        })
    }

    pub fn with_masses(self, masses: MassTable) -> Self {
        Self { masses, ..self }
    }

    /// Beam energy in GeV
    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn masses(&self) -> &MassTable {
        &self.masses
    }

    /// Momentum of the incoming lepton
    pub fn momentum(&self) -> ThreeVector {
        ThreeVector::new(0., 0., self.energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_beam() {
        let beam = BeamConfig::default();
        assert_eq!(beam.energy(), 11.);
        assert_eq!(beam.momentum(), ThreeVector::new(0., 0., 11.));
        assert_eq!(beam.masses(), &MassTable::default());
    }

    #[test]
    fn reject_bad_energy() {
        for e in [0., -1., f64::NAN, f64::INFINITY] {
            assert!(BeamConfig::new(e).is_err());
        }
        assert_eq!(BeamConfig::new(10.6).unwrap().energy(), 10.6);
    }
}

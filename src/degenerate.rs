use thiserror::Error;

/// Kinematic configurations where a derived quantity is undefined
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Degenerate {
    /// Scattered lepton momentum equals the beam energy, Xb and Zh divide by zero
    #[error("no energy transfer (Nu = 0)")]
    ZeroEnergyTransfer,
    /// W² = M² + 2MNu - Q² is negative
    #[error("unphysical hadronic final state (W² < 0)")]
    UnphysicalW,
    /// Rounding pushed cos(θ_PQ) outside [-1, 1]
    #[error("cos(ThetaPQ) outside [-1, 1]")]
    CosineOutOfRange,
    /// Hadron or virtual photon at rest, angles to the photon undefined
    #[error("vanishing momentum")]
    ZeroMomentum,
    #[error("non-finite momentum component")]
    NonFinite,
}

impl Degenerate {
    pub const ALL: [Degenerate; 5] = [
        Degenerate::ZeroEnergyTransfer,
        Degenerate::UnphysicalW,
        Degenerate::CosineOutOfRange,
        Degenerate::ZeroMomentum,
        Degenerate::NonFinite,
    ];

    /// Bit used in the `flags` output column
    pub const fn bit(self) -> u8 {
        match self {
            Degenerate::ZeroEnergyTransfer => 1,
            Degenerate::UnphysicalW => 1 << 1,
            Degenerate::CosineOutOfRange => 1 << 2,
            Degenerate::ZeroMomentum => 1 << 3,
            Degenerate::NonFinite => 1 << 4,
        }
    }
}

/// Set of degeneracies that affected one derived record
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Degeneracies(u8);

impl Degeneracies {
    pub fn insert(&mut self, d: Degenerate) {
        self.0 |= d.bit();
    }

    pub fn contains(&self, d: Degenerate) -> bool {
        self.0 & d.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Degenerate> {
        let set = *self;
        Degenerate::ALL.into_iter().filter(move |d| set.contains(*d))
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn without(self, d: Degenerate) -> Self {
        Self(self.0 & !d.bit())
    }
}

impl FromIterator<Degenerate> for Degeneracies {
    fn from_iter<T: IntoIterator<Item = Degenerate>>(iter: T) -> Self {
        let mut res = Self::default();
        for d in iter {
            res.insert(d);
        }
        res
    }
}

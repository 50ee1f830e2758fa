use particle_id::ParticleID;

use crate::{
    beam::BeamConfig,
    degenerate::{Degeneracies, Degenerate},
    lepton::LeptonKinematics,
    vector::{Angles, ThreeVector},
};

/// Semi-inclusive kinematics of a hadron
///
/// Quantities labelled "PQ" are measured relative to the virtual photon
/// of the lepton the hadron was paired with. Angles are in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HadronKinematics {
    id: ParticleID,
    momentum: ThreeVector,
    p: f64,
    theta_lab: f64,
    phi_lab: f64,
    cos_theta_pq: Option<f64>,
    theta_pq: Option<f64>,
    phi_pq: f64,
    pt2: Option<f64>,
    pl2: Option<f64>,
    zh: Option<f64>,
    degeneracies: Degeneracies,
}

impl HadronKinematics {
    /// Derive the kinematics of a hadron with lab momentum `momentum`
    ///
    /// `lepton` must come from the same event, this is not checked here.
    /// The hadron energy entering Zh uses the mass table of `beam`, so
    /// particle types missing from the table count as massless.
    pub fn derive(
        momentum: ThreeVector,
        id: ParticleID,
        lepton: &LeptonKinematics,
        beam: &BeamConfig,
    ) -> Self {
        let mut degeneracies = Degeneracies::default();
        if !momentum.all_finite() {
            degeneracies.insert(Degenerate::NonFinite);
        }
        let p = momentum.norm();
        let p2 = p * p;
        let photon = lepton.photon();

        let denom = lepton.photon_momentum() * p;
        let cos_theta_pq = if denom == 0. {
            degeneracies.insert(Degenerate::ZeroMomentum);
            None
        } else {
            let cos = momentum.dot(&photon) / denom;
            // reported as is, the flag tells the caller not to trust it
            if cos.abs() > 1. {
                degeneracies.insert(Degenerate::CosineOutOfRange);
            }
            Some(cos)
        };
        let theta_pq = cos_theta_pq.map(|_| photon.opening_angle(&momentum).to_degrees());
        let phi_pq = photon.rotate_into_frame(&momentum).phi().to_degrees();
        let pt2 = cos_theta_pq.map(|cos| p2 * (1. - cos * cos));
        let pl2 = cos_theta_pq.map(|cos| p2 * cos * cos);

        let nu = lepton.nu();
        let zh = if nu == 0. {
            degeneracies.insert(Degenerate::ZeroEnergyTransfer);
            None
        } else {
            let m = beam.masses().mass_of(id);
            Some((m * m + p2).sqrt() / nu).filter(|z| z.is_finite())
        };

        Self {
            id,
            momentum,
            p,
            theta_lab: momentum.theta().to_degrees(),
            phi_lab: momentum.phi().to_degrees(),
            cos_theta_pq,
            theta_pq,
            phi_pq,
            pt2,
            pl2,
            zh,
            degeneracies,
        }
    }

    pub fn id(&self) -> ParticleID {
        self.id
    }

    pub fn momentum(&self) -> ThreeVector {
        self.momentum
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn theta_lab(&self) -> f64 {
        self.theta_lab
    }

    pub fn phi_lab(&self) -> f64 {
        self.phi_lab
    }

    /// Cosine of the angle to the virtual photon
    ///
    /// `None` if the hadron or the photon has vanishing momentum. Values
    /// marginally outside [-1, 1] are kept and flagged.
    pub fn cos_theta_pq(&self) -> Option<f64> {
        self.cos_theta_pq
    }

    /// Polar angle to the virtual photon
    pub fn theta_pq(&self) -> Option<f64> {
        self.theta_pq
    }

    /// Azimuth around the virtual photon, 0 when the hadron lies in the
    /// lepton scattering plane on the photon side
    pub fn phi_pq(&self) -> f64 {
        self.phi_pq
    }

    /// Squared momentum transverse to the virtual photon
    pub fn pt2(&self) -> Option<f64> {
        self.pt2
    }

    /// Squared momentum along the virtual photon
    pub fn pl2(&self) -> Option<f64> {
        self.pl2
    }

    /// Fraction of the energy transfer carried by the hadron
    pub fn zh(&self) -> Option<f64> {
        self.zh
    }

    pub fn degeneracies(&self) -> Degeneracies {
        self.degeneracies
    }
}

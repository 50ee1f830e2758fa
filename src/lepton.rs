use crate::{
    beam::BeamConfig,
    degenerate::{Degeneracies, Degenerate},
    vector::{Angles, ThreeVector},
};

/// Inclusive DIS kinematics from the scattered lepton
///
/// Angles are in degrees, energies and momenta in GeV.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LeptonKinematics {
    momentum: ThreeVector,
    photon: ThreeVector,
    p: f64,
    theta_lab: f64,
    phi_lab: f64,
    q2: f64,
    nu: f64,
    xb: Option<f64>,
    w: Option<f64>,
    y: f64,
    degeneracies: Degeneracies,
}

impl LeptonKinematics {
    /// Derive the kinematics of a scattered lepton with lab momentum `momentum`
    ///
    /// Q² is computed as 4 E_beam P sin²(θ/2) with the scattered momentum
    /// P standing in for the scattered energy. The zero vector is accepted
    /// and gives P = 0 with both angles 0. Non-finite components are
    /// flagged as [Degenerate::NonFinite].
    pub fn derive(momentum: ThreeVector, beam: &BeamConfig) -> Self {
        let mut degeneracies = Degeneracies::default();
        if !momentum.all_finite() {
            degeneracies.insert(Degenerate::NonFinite);
        }
        let e_beam = beam.energy();
        let m_target = beam.masses().proton();

        let p = momentum.norm();
        let theta = momentum.theta();
        let phi = momentum.phi();

        let q2 = 4. * e_beam * p * (theta / 2.).sin().powi(2);
        let nu = e_beam - p;
        let xb = if nu == 0. {
            degeneracies.insert(Degenerate::ZeroEnergyTransfer);
            None
        } else {
            Some(q2 / (2. * m_target * nu))
        };
        let w2 = m_target * m_target + 2. * m_target * nu - q2;
        let w = if w2 >= 0. {
            Some(w2.sqrt())
        } else {
            // NaN lands here too, but is already flagged as non-finite
            if w2 < 0. {
                degeneracies.insert(Degenerate::UnphysicalW);
            }
            None
        };
        let y = nu / e_beam;

        Self {
            momentum,
            photon: beam.momentum() - momentum,
            p,
            theta_lab: theta.to_degrees(),
            phi_lab: phi.to_degrees(),
            q2,
            nu,
            xb: xb.filter(|x| x.is_finite()),
            w,
            y,
            degeneracies,
        }
    }

    /// Lab-frame momentum of the scattered lepton
    pub fn momentum(&self) -> ThreeVector {
        self.momentum
    }

    /// Virtual photon momentum, beam minus scattered lepton
    pub fn photon(&self) -> ThreeVector {
        self.photon
    }

    /// Momentum magnitude
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Lab polar angle in degrees
    pub fn theta_lab(&self) -> f64 {
        self.theta_lab
    }

    /// Lab azimuthal angle in degrees
    pub fn phi_lab(&self) -> f64 {
        self.phi_lab
    }

    pub fn q2(&self) -> f64 {
        self.q2
    }

    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// Bjorken x, `None` if Nu = 0
    pub fn xb(&self) -> Option<f64> {
        self.xb
    }

    /// Invariant mass of the hadronic final state, `None` if W² < 0
    pub fn w(&self) -> Option<f64> {
        self.w
    }

    /// Inelasticity
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Magnitude of the virtual photon momentum, sqrt(Nu² + Q²)
    pub fn photon_momentum(&self) -> f64 {
        (self.nu * self.nu + self.q2).sqrt()
    }

    pub fn degeneracies(&self) -> Degeneracies {
        self.degeneracies
    }
}

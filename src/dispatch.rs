use std::ops::AddAssign;

use log::debug;

use crate::{
    beam::BeamConfig,
    degenerate::{Degeneracies, Degenerate},
    hadron::HadronKinematics,
    lepton::LeptonKinematics,
    record::{Class, ParticleRecord, Selection},
};

/// Lepton information available for the current event
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum LeptonState {
    /// No scattered lepton seen in this event yet
    #[default]
    AwaitingLepton,
    HasLepton(LeptonKinematics),
}

/// Kinematics derived from a single particle record
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Derived {
    Lepton(LeptonKinematics),
    Hadron(HadronRecord),
}

/// A hadron together with the lepton of its event
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HadronRecord {
    pub lepton: LeptonKinematics,
    pub hadron: HadronKinematics,
}

impl Derived {
    /// Degeneracies affecting the columns of this record's output row
    ///
    /// Hadron rows inherit the lepton flags except [Degenerate::UnphysicalW],
    /// as the hadron table has no W column.
    pub fn degeneracies(&self) -> Degeneracies {
        match self {
            Derived::Lepton(lk) => lk.degeneracies(),
            Derived::Hadron(rec) => rec
                .lepton
                .degeneracies()
                .without(Degenerate::UnphysicalW)
                .union(rec.hadron.degeneracies()),
        }
    }
}

/// Record counts for one run
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DispatchStats {
    pub records: usize,
    pub leptons: usize,
    pub hadrons: usize,
    pub excluded: usize,
    /// Hadrons skipped because their event had no scattered lepton before them
    pub unpaired: usize,
    /// Derived records with at least one undefined quantity
    pub degenerate: usize,
}

impl AddAssign for DispatchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.records += rhs.records;
        self.leptons += rhs.leptons;
        self.hadrons += rhs.hadrons;
        self.excluded += rhs.excluded;
        self.unpaired += rhs.unpaired;
        self.degenerate += rhs.degenerate;
    }
}

/// Routes particle records to the lepton and hadron calculators
///
/// Records must arrive in stream order: all records of an event are
/// contiguous and the scattered lepton comes before the hadrons that
/// refer to it. A change of event index discards the lepton of the
/// previous event.
#[derive(Clone, Debug)]
pub struct Dispatcher<'a> {
    beam: &'a BeamConfig,
    selection: &'a Selection,
    event: Option<i64>,
    state: LeptonState,
    stats: DispatchStats,
}

impl<'a> Dispatcher<'a> {
    pub fn new(beam: &'a BeamConfig, selection: &'a Selection) -> Self {
        Self {
            beam,
            selection,
            event: None,
            state: LeptonState::AwaitingLepton,
            stats: DispatchStats::default(),
        }
    }

    pub fn state(&self) -> &LeptonState {
        &self.state
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Process the next record in the stream
    ///
    /// Returns `None` for excluded particles and for hadrons that have no
    /// lepton in their event, the latter are counted as unpaired.
    pub fn process(&mut self, record: &ParticleRecord) -> Option<Derived> {
        self.stats.records += 1;
        if self.event != Some(record.event) {
            self.event = Some(record.event);
            self.state = LeptonState::AwaitingLepton;
        }
        let derived = match self.selection.classify(record) {
            Class::ScatteredLepton => {
                let lk = LeptonKinematics::derive(record.p, self.beam);
                self.state = LeptonState::HasLepton(lk);
                self.stats.leptons += 1;
                Derived::Lepton(lk)
            }
            Class::Excluded => {
                self.stats.excluded += 1;
                return None;
            }
            Class::Hadron => {
                let LeptonState::HasLepton(lepton) = self.state else {
                    debug!(
                        "event {}: skipping particle {} without scattered lepton",
                        record.event,
                        record.id.id()
                    );
                    self.stats.unpaired += 1;
                    return None;
                };
                let hadron = HadronKinematics::derive(record.p, record.id, &lepton, self.beam);
                self.stats.hadrons += 1;
                Derived::Hadron(HadronRecord { lepton, hadron })
            }
        };
        let degeneracies = derived.degeneracies();
        if !degeneracies.is_empty() {
            self.stats.degenerate += 1;
            for d in degeneracies.iter() {
                debug!("event {}: particle {}: {d}", record.event, record.id.id());
            }
        }
        Some(derived)
    }
}

/// Derive kinematics for a whole record stream
pub fn derive_all<'r, I>(
    beam: &BeamConfig,
    selection: &Selection,
    records: I,
) -> (Vec<Derived>, DispatchStats)
where
    I: IntoIterator<Item = &'r ParticleRecord>,
{
    let mut dispatcher = Dispatcher::new(beam, selection);
    let derived = records
        .into_iter()
        .filter_map(|r| dispatcher.process(r))
        .collect();
    (derived, dispatcher.stats())
}

/// Derive kinematics for a whole record stream, one event per task
///
/// Records only depend on earlier records of the same event, so runs of
/// equal event index can be processed independently. The output order
/// is the same as for [derive_all].
#[cfg(feature = "rayon")]
pub fn derive_parallel(
    beam: &BeamConfig,
    selection: &Selection,
    records: &[ParticleRecord],
) -> (Vec<Derived>, DispatchStats) {
    use itertools::Itertools;
    use rayon::prelude::*;

    let mut events: Vec<Vec<&ParticleRecord>> = Vec::new();
    for (_, event) in &records.iter().chunk_by(|r| r.event) {
        events.push(event.collect());
    }

    let results: Vec<_> = events
        .into_par_iter()
        .map(|event| derive_all(beam, selection, event))
        .collect();

    let mut stats = DispatchStats::default();
    let mut derived = Vec::with_capacity(records.len());
    for (event_derived, event_stats) in results {
        derived.extend(event_derived);
        stats += event_stats;
    }
    (derived, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mass::{ELECTRON, PHOTON, PI_MINUS, PI_PLUS, PROTON},
        vector::ThreeVector,
    };
    use particle_id::ParticleID;

    fn record(event: i64, id: i32, parent: i32, p: [f64; 3]) -> ParticleRecord {
        ParticleRecord {
            event,
            id: ParticleID::new(id),
            parent: ParticleID::new(parent),
            p: p.into(),
            energy: ThreeVector::from(p).norm(),
            vertex: ThreeVector::zeros(),
        }
    }

    #[test]
    fn lepton_then_hadron() {
        let beam = BeamConfig::new(11.).unwrap();
        let selection = Selection::default();
        let records = [
            record(1, ELECTRON, 0, [0., 0., 5.]),
            record(1, PI_PLUS, 0, [1., 0., 3.]),
            record(2, PI_PLUS, 0, [1., 1., 1.]),
        ];
        let (derived, stats) = derive_all(&beam, &selection, &records);
        assert_eq!(derived.len(), 2);
        let Derived::Lepton(lk) = derived[0] else {
            panic!("expected lepton, got {:?}", derived[0]);
        };
        assert_eq!(lk.nu(), 6.);
        let Derived::Hadron(rec) = derived[1] else {
            panic!("expected hadron, got {:?}", derived[1]);
        };
        assert_eq!(rec.lepton, lk);
        assert_eq!(rec.hadron.id(), ParticleID::new(PI_PLUS));
        assert_eq!(
            stats,
            DispatchStats {
                records: 3,
                leptons: 1,
                hadrons: 1,
                unpaired: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn state_transitions() {
        let beam = BeamConfig::default();
        let selection = Selection::default();
        let mut dispatcher = Dispatcher::new(&beam, &selection);
        assert_eq!(dispatcher.state(), &LeptonState::AwaitingLepton);

        dispatcher.process(&record(7, ELECTRON, 0, [0.5, 0., 4.]));
        assert!(matches!(dispatcher.state(), LeptonState::HasLepton(_)));

        // excluded particles do not touch the lepton state
        assert_eq!(dispatcher.process(&record(7, PHOTON, 111, [0., 0., 1.])), None);
        assert!(matches!(dispatcher.state(), LeptonState::HasLepton(_)));

        // a new event resets even if its first record is excluded
        assert_eq!(dispatcher.process(&record(8, PHOTON, 111, [0., 0., 1.])), None);
        assert_eq!(dispatcher.state(), &LeptonState::AwaitingLepton);
        assert_eq!(dispatcher.stats().excluded, 2);
    }

    #[test]
    fn lepton_does_not_leak_across_events() {
        let beam = BeamConfig::default();
        let selection = Selection::default();
        let records = [
            record(1, ELECTRON, 0, [0., 1., 4.]),
            record(1, PI_MINUS, 0, [0.1, 0.2, 1.]),
            record(2, PROTON, 0, [0.3, 0.2, 1.]),
            record(2, ELECTRON, 0, [0., -2., 6.]),
            record(2, PI_PLUS, 0, [0.3, 0.2, 1.]),
        ];
        let (derived, stats) = derive_all(&beam, &selection, &records);
        assert_eq!(derived.len(), 4);
        assert_eq!(stats.unpaired, 1);
        let Derived::Hadron(first) = derived[1] else { panic!() };
        let Derived::Hadron(second) = derived[3] else { panic!() };
        assert_eq!(first.lepton.momentum(), ThreeVector::new(0., 1., 4.));
        assert_eq!(second.lepton.momentum(), ThreeVector::new(0., -2., 6.));
    }

    #[test]
    fn latest_lepton_wins() {
        let beam = BeamConfig::default();
        let selection = Selection::default();
        let records = [
            record(3, ELECTRON, 0, [0., 1., 4.]),
            record(3, ELECTRON, 0, [1., 0., 5.]),
            record(3, PI_PLUS, 0, [0.3, 0.2, 1.]),
        ];
        let (derived, stats) = derive_all(&beam, &selection, &records);
        assert_eq!(stats.leptons, 2);
        let Derived::Hadron(rec) = derived[2] else { panic!() };
        assert_eq!(rec.lepton.momentum(), ThreeVector::new(1., 0., 5.));
    }

    #[test]
    fn degenerate_records_are_kept() {
        let beam = BeamConfig::new(11.).unwrap();
        let selection = Selection::default();
        let records = [
            record(1, ELECTRON, 0, [0., 0., 11.]),
            record(1, PI_PLUS, 0, [0.2, 0., 1.]),
            record(1, PI_PLUS, 0, [0.4, 0.1, 2.]),
        ];
        let (derived, stats) = derive_all(&beam, &selection, &records);
        assert_eq!(derived.len(), 3);
        assert_eq!(stats.degenerate, 3);
        for d in &derived {
            assert!(d.degeneracies().contains(Degenerate::ZeroEnergyTransfer));
        }
    }

    #[test]
    fn hadron_rows_drop_w_flag() {
        let beam = BeamConfig::new(11.).unwrap();
        let selection = Selection::default();
        let records = [
            record(1, ELECTRON, 0, [0., 3., 4.]),
            record(1, PI_PLUS, 0, [0.2, 0., 1.]),
        ];
        let (derived, stats) = derive_all(&beam, &selection, &records);
        assert!(derived[0].degeneracies().contains(Degenerate::UnphysicalW));
        let Derived::Hadron(rec) = derived[1] else { panic!() };
        assert!(rec.lepton.degeneracies().contains(Degenerate::UnphysicalW));
        assert!(derived[1].degeneracies().is_empty());
        assert_eq!(stats.degenerate, 1);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_matches_sequential() {
        let beam = BeamConfig::default();
        let selection = Selection::default();
        let mut records = Vec::new();
        for event in 0..50 {
            if event % 7 != 3 {
                records.push(record(event, ELECTRON, 0, [0.1 * event as f64, 0.5, 5.]));
            }
            records.push(record(event, PI_PLUS, 0, [0.2, -0.1 * event as f64, 1.5]));
            records.push(record(event, PHOTON, 111, [0., 0., 0.3]));
            records.push(record(event, PROTON, 0, [-0.3, 0.2, 0.9]));
        }
        let sequential = derive_all(&beam, &selection, &records);
        let parallel = derive_parallel(&beam, &selection, &records);
        assert_eq!(sequential, parallel);
    }
}

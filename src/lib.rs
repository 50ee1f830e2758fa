pub mod beam;
pub mod dat;
pub mod degenerate;
pub mod dispatch;
pub mod error;
pub mod hadron;
pub mod lepton;
pub mod mass;
pub mod record;
pub mod tuple;
pub mod vector;

pub use crate::beam::BeamConfig;
pub use crate::dispatch::{DispatchStats, Derived, Dispatcher};
pub use crate::error::Error;
pub use crate::hadron::HadronKinematics;
pub use crate::lepton::LeptonKinematics;
pub use crate::record::{ParticleRecord, Selection};

use crate::tuple::{Row, Sink};

/// Derive kinematics for a stream of records and fill them into `sink`
///
/// Stops at the first error from `records` or `sink`.
pub fn derive_into<I, S>(
    beam: &BeamConfig,
    selection: &Selection,
    records: I,
    sink: &mut S,
) -> Result<DispatchStats, Error>
where
    I: IntoIterator<Item = Result<ParticleRecord, Error>>,
    S: Sink + ?Sized,
{
    let mut dispatcher = Dispatcher::new(beam, selection);
    for record in records {
        if let Some(derived) = dispatcher.process(&record?) {
            sink.fill(&Row::from(&derived))?;
        }
    }
    sink.flush()?;
    Ok(dispatcher.stats())
}

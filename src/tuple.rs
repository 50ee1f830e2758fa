use std::io::Write;

use ahash::AHashMap;
use itertools::{izip, Itertools};

use crate::{dispatch::Derived, error::Error};

/// Columns of the scattered-lepton table
pub const ELECTRON_COLUMNS: [&str; 12] = [
    "Q2", "Xb", "Nu", "ThetaLab", "PhiLab", "P", "Px", "Py", "Pz", "W", "y", "flags",
];

/// Columns of the hadron table
pub const HADRON_COLUMNS: [&str; 23] = [
    "Q2",
    "Xb",
    "Nu",
    "Zh",
    "Pt2",
    "Pl2",
    "ThetaPQ",
    "PhiPQ",
    "ThetaLab",
    "PhiLab",
    "P",
    "Px",
    "Py",
    "Pz",
    "ThetaLab_el",
    "PhiLab_el",
    "P_el",
    "Px_el",
    "Py_el",
    "Pz_el",
    "PID",
    "CosThetaPQ",
    "flags",
];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Table {
    Electrons,
    Hadrons,
}

impl Table {
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Electrons => &ELECTRON_COLUMNS,
            Table::Hadrons => &HADRON_COLUMNS,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Table::Electrons => "electrons",
            Table::Hadrons => "hadrons",
        }
    }
}

/// One output row, undefined values are NaN
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub table: Table,
    pub values: Vec<f64>,
}

impl From<&Derived> for Row {
    fn from(derived: &Derived) -> Self {
        let undefined = f64::NAN;
        let flags = derived.degeneracies().bits() as f64;
        match derived {
            Derived::Lepton(lk) => {
                let p = lk.momentum();
                Row {
                    table: Table::Electrons,
                    values: vec![
                        lk.q2(),
                        lk.xb().unwrap_or(undefined),
                        lk.nu(),
                        lk.theta_lab(),
                        lk.phi_lab(),
                        lk.p(),
                        p.x,
                        p.y,
                        p.z,
                        lk.w().unwrap_or(undefined),
                        lk.y(),
                        flags,
                    ],
                }
            }
            Derived::Hadron(rec) => {
                let (lk, hk) = (&rec.lepton, &rec.hadron);
                let p = hk.momentum();
                let p_el = lk.momentum();
                Row {
                    table: Table::Hadrons,
                    values: vec![
                        lk.q2(),
                        lk.xb().unwrap_or(undefined),
                        lk.nu(),
                        hk.zh().unwrap_or(undefined),
                        hk.pt2().unwrap_or(undefined),
                        hk.pl2().unwrap_or(undefined),
                        hk.theta_pq().unwrap_or(undefined),
                        hk.phi_pq(),
                        hk.theta_lab(),
                        hk.phi_lab(),
                        hk.p(),
                        p.x,
                        p.y,
                        p.z,
                        lk.theta_lab(),
                        lk.phi_lab(),
                        lk.p(),
                        p_el.x,
                        p_el.y,
                        p_el.z,
                        hk.id().id() as f64,
                        hk.cos_theta_pq().unwrap_or(undefined),
                        flags,
                    ],
                }
            }
        }
    }
}

/// Append-only destination for derived rows
pub trait Sink {
    fn fill(&mut self, row: &Row) -> Result<(), Error>;

    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Tab-separated text output, one writer per table
///
/// Each writer starts with a header line of column names.
#[derive(Debug)]
pub struct TsvSink<W: Write> {
    electrons: W,
    hadrons: W,
}

impl<W: Write> TsvSink<W> {
    pub fn new(mut electrons: W, mut hadrons: W) -> Result<Self, Error> {
        writeln!(electrons, "{}", ELECTRON_COLUMNS.iter().join("\t"))?;
        writeln!(hadrons, "{}", HADRON_COLUMNS.iter().join("\t"))?;
        Ok(Self { electrons, hadrons })
    }

    pub fn into_inner(self) -> (W, W) {
        (self.electrons, self.hadrons)
    }
}

fn format_value(value: &f64) -> String {
    if value.is_nan() {
        "nan".to_owned()
    } else {
        value.to_string()
    }
}

impl<W: Write> Sink for TsvSink<W> {
    fn fill(&mut self, row: &Row) -> Result<(), Error> {
        let out = match row.table {
            Table::Electrons => &mut self.electrons,
            Table::Hadrons => &mut self.hadrons,
        };
        writeln!(out, "{}", row.values.iter().map(format_value).join("\t"))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.electrons.flush()?;
        self.hadrons.flush()?;
        Ok(())
    }
}

/// In-memory columnar store
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Columns {
    tables: AHashMap<Table, AHashMap<&'static str, Vec<f64>>>,
}

impl Columns {
    /// All values of one column, `None` if the column does not exist
    pub fn column(&self, table: Table, name: &str) -> Option<&[f64]> {
        if !table.columns().iter().any(|c| *c == name) {
            return None;
        }
        let values = self
            .tables
            .get(&table)
            .and_then(|t| t.get(name))
            .map(|v| v.as_slice())
            .unwrap_or_default();
        Some(values)
    }

    /// Number of rows in a table
    pub fn len(&self, table: Table) -> usize {
        self.column(table, "flags").map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len(Table::Electrons) == 0 && self.len(Table::Hadrons) == 0
    }
}

impl Sink for Columns {
    fn fill(&mut self, row: &Row) -> Result<(), Error> {
        let table = self.tables.entry(row.table).or_default();
        for (&name, &value) in izip!(row.table.columns(), &row.values) {
            table.entry(name).or_default().push(value);
        }
        Ok(())
    }
}

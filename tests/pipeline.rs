use approx::{assert_abs_diff_eq, assert_relative_eq};
use diskin::{
    dat::DatReader,
    degenerate::Degenerate,
    derive_into,
    tuple::{Columns, Table, TsvSink},
    BeamConfig, DispatchStats, Error, Selection,
};

const LEPTO_OUT: &str = "\
# event_index PID parent_PID Px Py Pz E x y z
1 11 0 0.0 0.0 5.0 5.0 0 0 -1.2
1 211 0 1.0 0.0 3.0 3.163 0 0 -1.2
2 211 0 1.0 1.0 1.0 1.738 0 0 0.4
3 11 0 0.512 -0.874 6.201 6.283 0 0 2.1
3 22 111 0.1 0.05 0.9 0.907 0 0 2.1
3 -211 113 -0.231 0.408 1.977 2.037 0 0 2.1
3 2212 2 0.302 -0.117 0.811 1.294 0 0 2.1
3 92 0 0.0 0.0 0.5 1.0 0 0 2.1
3 -11 22 0.01 0.02 0.3 0.300 0 0 2.1
4.0 11.0 0.0 0.0 0.0 -11.0 11.0 0 0 0
4.0 321.0 0.0 0.2 0.1 1.2 1.3 0 0 0
";

fn run(input: &str) -> (Columns, DispatchStats) {
    let beam = BeamConfig::default();
    let selection = Selection::default();
    let mut columns = Columns::default();
    let stats = derive_into(
        &beam,
        &selection,
        DatReader::new(input.as_bytes()),
        &mut columns,
    )
    .unwrap();
    (columns, stats)
}

#[test]
fn counts() {
    let (columns, stats) = run(LEPTO_OUT);
    assert_eq!(
        stats,
        DispatchStats {
            records: 11,
            leptons: 3,
            hadrons: 5,
            excluded: 2,
            unpaired: 1,
            degenerate: 2,
        }
    );
    assert_eq!(columns.len(Table::Electrons), 3);
    assert_eq!(columns.len(Table::Hadrons), 5);
}

#[test]
fn hadrons_use_their_own_event() {
    let (columns, _) = run(LEPTO_OUT);
    let pz_el = columns.column(Table::Hadrons, "Pz_el").unwrap();
    assert_eq!(pz_el, [5.0, 6.201, 6.201, 6.201, -11.0]);
    let pid = columns.column(Table::Hadrons, "PID").unwrap();
    assert_eq!(pid, [211., -211., 2212., 92., 321.]);
}

#[test]
fn hadron_invariants() {
    let (columns, _) = run(LEPTO_OUT);
    let col = |name| columns.column(Table::Hadrons, name).unwrap();
    let (p, pt2, pl2) = (col("P"), col("Pt2"), col("Pl2"));
    let (cos, theta) = (col("CosThetaPQ"), col("ThetaPQ"));
    for i in 0..p.len() {
        assert_relative_eq!(pt2[i] + pl2[i], p[i] * p[i], max_relative = 1e-12);
        assert_abs_diff_eq!(theta[i], cos[i].acos().to_degrees(), epsilon = 1e-6);
    }
}

#[test]
fn massless_unknown_hadron() {
    let (columns, _) = run(LEPTO_OUT);
    let zh = columns.column(Table::Hadrons, "Zh").unwrap();
    let p = columns.column(Table::Hadrons, "P").unwrap();
    let nu = columns.column(Table::Hadrons, "Nu").unwrap();
    // particle type 92 is not in the mass table
    assert_relative_eq!(zh[3], p[3] / nu[3]);
}

#[test]
fn degenerate_rows_are_flagged() {
    let (columns, _) = run(LEPTO_OUT);
    let flags = columns.column(Table::Electrons, "flags").unwrap();
    let xb = columns.column(Table::Electrons, "Xb").unwrap();
    let w = columns.column(Table::Electrons, "W").unwrap();
    let no_nu = Degenerate::ZeroEnergyTransfer.bit();
    // backscattered at the beam energy, so W² = M² - Q² < 0 as well
    assert_eq!(flags[2], (no_nu | Degenerate::UnphysicalW.bit()) as f64);
    assert!(xb[2].is_nan());
    assert!(w[2].is_nan());
    assert_eq!(xb[0], 0.);
    assert!(flags[..2].iter().all(|&f| f == 0.));

    // the hadron table has no W column
    let flags = columns.column(Table::Hadrons, "flags").unwrap();
    let zh = columns.column(Table::Hadrons, "Zh").unwrap();
    assert_eq!(flags[4], no_nu as f64);
    assert!(zh[4].is_nan());
    assert!(flags[..4].iter().all(|&f| f == 0.));
}

#[test]
fn parse_error_aborts() {
    let beam = BeamConfig::default();
    let selection = Selection::default();
    let mut columns = Columns::default();
    let input = "1 11 0 0 0 5 5 0 0 0\n1 211 0 1 0\n";
    let err = derive_into(&beam, &selection, DatReader::new(input.as_bytes()), &mut columns)
        .unwrap_err();
    match err {
        Error::Parse(err) => assert_eq!(err.line, 2),
        other => panic!("expected parse error, got {other}"),
    }
    assert_eq!(columns.len(Table::Electrons), 1);
}

#[test]
fn tsv_tables() {
    let beam = BeamConfig::default();
    let selection = Selection::default();
    let mut sink = TsvSink::new(Vec::new(), Vec::new()).unwrap();
    derive_into(&beam, &selection, DatReader::new(LEPTO_OUT.as_bytes()), &mut sink).unwrap();
    let (electrons, hadrons) = sink.into_inner();
    let electrons = String::from_utf8(electrons).unwrap();
    let hadrons = String::from_utf8(hadrons).unwrap();
    assert_eq!(electrons.lines().count(), 4);
    assert_eq!(hadrons.lines().count(), 6);
    assert!(hadrons.lines().next().unwrap().starts_with("Q2\tXb\tNu\tZh\tPt2\tPl2"));
    let last = electrons.lines().last().unwrap();
    assert!(last.starts_with("484\tnan\t0\t180\t"));
}

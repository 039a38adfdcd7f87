use std::fs::read_to_string;

use insta::assert_snapshot;
use test_case::test_case;

use crate::{Key, Overrides, parse, to_string};

#[test_case("testfiles/water.gjf", 2)]
#[test_case("testfiles/gen.com", 1)]
#[test_case("testfiles/ethylene.gjf", 3)]
fn round_trip(path: &str, jobs: usize) {
    let input = read_to_string(path).unwrap();
    let decks = parse(&input).unwrap();
    assert_eq!(decks.len(), jobs);
    assert_eq!(to_string(&decks), input);
}

#[test]
fn round_trip_normalizes_trailing_whitespace() {
    let input = "# HF\n\nt\n\n0 1\nH\n\nextra";
    let got = to_string(&parse(input).unwrap());
    assert_eq!(got, "# HF\n\nt\n\n0 1\nH\n\nextra\n\n");
    // and the normalized form is stable
    assert_eq!(to_string(&parse(&got).unwrap()), got);
}

#[test]
fn separators_give_jobs() {
    let job = "# HF\n\nt\n\n0 1\nH\n\n";
    for n in 0..5 {
        let input = vec![job; n + 1].join("--Link1--\n");
        assert_eq!(parse(&input).unwrap().len(), n + 1);
    }
}

#[test]
fn rewrite_water() {
    let input = read_to_string("testfiles/water.gjf").unwrap();
    let mut decks = parse(&input).unwrap();
    Overrides::new("water.chk")
        .nproc(2)
        .mem("8GB")
        .keyword("SCF=XQC")
        .apply(&mut decks, 2)
        .unwrap();
    for deck in &decks {
        for key in [Key::Mem, Key::NProc, Key::Chk] {
            assert_eq!(deck.link0.count(&key), 1);
        }
    }
    assert_snapshot!(to_string(&decks), @r"
    %Chk=water.chk
    %NProcShared=2
    %Mem=8GB
    # B3LYP/6-31G(d) Opt
    SCF=XQC

    water optimization

    0 1
    O    0.000000    0.000000    0.117790
    H    0.000000    0.755453   -0.471161
    H    0.000000   -0.755453   -0.471161

    --Link1--
    %Chk=water.chk
    %NProcShared=2
    %Mem=8GB
    # B3LYP/6-31G(d) Freq Geom=AllCheck Guess=Read
    SCF=XQC
    ");
}

use nucnet::nuc::Nuc;
use nucnet::species::Species;
use nucnet::{read_nuc_xml, write_nuc_xml};

use rstest::{fixture, rstest};

const NUCLEAR_DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/nuclear_data.xml");

#[fixture]
fn nuc() -> Nuc {
    read_nuc_xml(NUCLEAR_DATA, "").unwrap()
}

#[rstest]
fn reads_every_species(nuc: Nuc) {
    assert_eq!(nuc.len(), 16);

    // ranked by Z, then A, then name
    let names: Vec<&str> = nuc.iter().map(Species::name).collect();
    assert_eq!(names[0], "n");
    assert_eq!(names[15], "fe56");
    assert_eq!(names[13..15], ["al26g", "al26m"]);

    for (i, species) in nuc.iter().enumerate() {
        assert_eq!(species.index(), i);
    }
}

#[rstest]
fn largest_numbers(nuc: Nuc) {
    assert_eq!(nuc.largest_nucleon_number("z").unwrap(), 26);
    assert_eq!(nuc.largest_nucleon_number("a").unwrap(), 56);
    assert_eq!(nuc.largest_nucleon_number("n").unwrap(), 30);
    assert!(nuc.largest_nucleon_number("q").is_err());
}

#[rstest]
fn states(nuc: Nuc) {
    let ground = nuc.species_by_name("al26g").unwrap();
    assert_eq!(ground.state(), Some("g"));
    assert_eq!(ground.spin(), 5.0);
    assert_eq!(nuc.species_by_za(13, 26, Some("m")).unwrap().spin(), 0.0);
    assert!(nuc.species_by_name("al26").is_none());
}

#[rstest]
fn partition_functions(nuc: Nuc) {
    let fe56 = nuc.species_by_name("fe56").unwrap();
    assert_eq!(fe56.partition_function(2.0).unwrap(), 10f64.powf(0.0086));
    assert_eq!(fe56.partition_function(20.0).unwrap(), 10f64.powf(0.7709));

    // no table, just the ground state weight
    let h2 = nuc.species_by_name("h2").unwrap();
    assert_eq!(h2.partition_function(5.0).unwrap(), 3.0);
}

#[rstest]
fn binding_energy(nuc: Nuc) {
    let he4 = nuc.species_by_name("he4").unwrap();
    let expected = 2.0 * 7.28897 + 2.0 * 8.0713 - 2.42491;
    assert!((nuc.binding_energy(he4).unwrap() - expected).abs() < 1e-9);
}

#[rstest]
#[case("", 16)]
#[case("z <= 2", 5)]
#[case("z = 13", 2)]
#[case("a > 20 and not(state = 'm')", 4)]
#[case("name = 'o17' or name = 'na22'", 2)]
fn filtered(#[case] filter: &str, #[case] expected: usize) {
    let nuc = read_nuc_xml(NUCLEAR_DATA, filter).unwrap();
    assert_eq!(nuc.len(), expected);
}

#[rstest]
fn subsets_and_views(nuc: Nuc) {
    let subset = nuc.extract_subset("z >= 8").unwrap();
    let view = nuc.view("z >= 8").unwrap();
    assert_eq!(subset.len(), view.len());

    // the subset is ranked afresh, the view keeps the parent ranks
    assert_eq!(subset.species_by_name("o16").unwrap().index(), 0);
    assert_eq!(view.species_by_name("o16").unwrap().index(), 9);
}

#[rstest]
fn update_from_another_file(nuc: Nuc) {
    let mut light = read_nuc_xml(NUCLEAR_DATA, "z <= 2").unwrap();
    light.update_from_xml(NUCLEAR_DATA, "z = 26").unwrap();
    assert_eq!(light.len(), 6);

    let fe56 = light.species_by_name("fe56").unwrap();
    let before = nuc.species_by_name("fe56").unwrap();
    assert_eq!(fe56.index(), 5);
    assert_eq!(fe56.mass_excess(), before.mass_excess());
    assert_eq!(fe56.partf(), before.partf());
}

#[rstest]
fn write_and_read_back(nuc: Nuc) {
    let path = std::env::temp_dir().join("nucnet_nuclear_data_round_trip.xml");
    write_nuc_xml(&nuc, &path).unwrap();

    let copy = read_nuc_xml(&path, "").unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(copy.len(), nuc.len());
    for species in &nuc {
        assert_eq!(copy.species_by_name(species.name()), Some(species));
    }
}

#[rstest]
fn custom_ranking(mut nuc: Nuc) {
    nuc.set_species_compare(|l, r| l.mass_excess().total_cmp(&r.mass_excess()));
    assert_eq!(nuc.iter().next().unwrap().name(), "fe56");
    assert_eq!(nuc.species_by_name("fe56").unwrap().index(), 0);

    nuc.clear_species_compare();
    assert_eq!(nuc.species_by_name("fe56").unwrap().index(), 15);
}

#[test]
fn missing_file() {
    assert!(read_nuc_xml("no_such_file.xml", "").is_err());
}

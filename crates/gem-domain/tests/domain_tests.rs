use gem_domain::{CompoundKey, Direction, FluxBound, Medium, MetabolicNetwork, Participant, Reaction, UptakeBound};

fn key(raw: &str) -> CompoundKey {
    CompoundKey::parse(raw).unwrap()
}

fn simple_reaction(id: &str, substrate: &str, product: &str, direction: Direction) -> Reaction {
    Reaction::with_default_bound(id,
                                 vec![Participant::substrate(key(substrate), 1.0),
                                      Participant::product(key(product), 1.0)],
                                 direction).unwrap()
}

#[test]
fn test_network_roundtrip_through_serde() {
    // A network serialized and deserialized should preserve fingerprint,
    // objective and reaction ordering
    let mut net = MetabolicNetwork::new("model_serde.draft").unwrap();
    net.add_reaction(simple_reaction("rxn00200", "cpd00027_c0", "cpd00061_c0", Direction::Bidirectional)).unwrap();
    net.add_reaction(simple_reaction("bio1", "cpd00061_c0", "cpd11416_c0", Direction::Forward)).unwrap();
    net.set_objective("bio1").unwrap();

    let json = serde_json::to_string(&net).unwrap();
    let back: MetabolicNetwork = serde_json::from_str(&json).unwrap();
    assert_eq!(back.fingerprint(), net.fingerprint());
    assert_eq!(back.objective(), Some("bio1"));
    let ids: Vec<&str> = back.reactions().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["rxn00200", "bio1"]);
}

#[test]
fn test_medium_serde_preserves_insertion_order() {
    let m = Medium::new("glc_min",
                        vec![(key("cpd00027_e0"), UptakeBound::new(-5.0, 100.0).unwrap()),
                             (key("cpd00007_e0"), UptakeBound::new(-10.0, 100.0).unwrap()),
                             (key("cpd00001_e0"), UptakeBound::new(-100.0, 100.0).unwrap())]).unwrap();
    let json = serde_json::to_string(&m).unwrap();
    let back: Medium = serde_json::from_str(&json).unwrap();
    let keys: Vec<String> = back.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys, vec!["cpd00027_e0", "cpd00007_e0", "cpd00001_e0"]);
}

#[test]
fn test_deep_clone_isolation() {
    // Mutating the derived copy must not touch the source network
    let mut original = MetabolicNetwork::new("model_iso.draft").unwrap();
    original.add_reaction(simple_reaction("rxn00001", "cpd00027_c0", "cpd00061_c0", Direction::Forward)).unwrap();
    let before = original.fingerprint();

    let mut derived = original.deep_clone_as("model_iso.draft.gf").unwrap();
    derived.add_reaction(simple_reaction("rxn00002", "cpd00061_c0", "cpd00009_c0", Direction::Forward)).unwrap();

    assert_eq!(original.fingerprint(), before);
    assert_ne!(derived.fingerprint(), before);
    assert_eq!(original.reaction_count(), 1);
    assert_eq!(derived.reaction_count(), 2);
}

#[test]
fn test_reaction_direction_and_explicit_bounds() {
    let r = Reaction::new("rxn_ex",
                          vec![Participant::substrate(key("cpd00027_e0"), 1.0),
                               Participant::product(key("cpd00027_c0"), 1.0)],
                          Direction::Bidirectional,
                          FluxBound::new(-25.0, 25.0).unwrap()).unwrap();
    assert_eq!(r.bound().lower(), -25.0);
    assert_eq!(r.bound().upper(), 25.0);
    assert_eq!(r.direction(), Direction::Bidirectional);
    assert_eq!(r.substrates().count(), 1);
    assert_eq!(r.products().count(), 1);
}

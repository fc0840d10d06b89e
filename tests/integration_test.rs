use cognate_core::*;

fn table() -> IpaTable {
    IpaTable::bundled().unwrap()
}

#[test]
fn test_lev_distance_reference_values() {
    let table = table();
    let ti = table.phones(&["t", "i"]).unwrap();
    let di = table.phones(&["d", "i"]).unwrap();
    let ai = table.phones(&["a", "i"]).unwrap();
    let at = table.phones(&["a", "t"]).unwrap();
    let ta = table.phones(&["t", "a"]).unwrap();

    let near = lev_distance(&ti, &di);
    assert!(near > 0.0 && near < 0.5);
    assert_eq!(lev_distance(&ti, &ai), 0.5);
    assert_eq!(lev_distance(&at, &ta), 1.0);
}

#[test]
fn test_align_leading_gap_scenario() {
    let table = table();
    let apa = table.phones(&["a", "p", "a"]).unwrap();
    let pa = table.phones(&["p", "a"]).unwrap();

    let alignment = align(&apa, &pa);
    assert_eq!(table.render(&alignment.source), vec!["#", "a", "p", "a"]);
    assert_eq!(table.render(&alignment.target), vec!["#", "*", "p", "a"]);

    // same columns when the longer word comes second
    let mirrored = align(&pa, &apa);
    assert_eq!(mirrored.source, alignment.target);
    assert_eq!(mirrored.target, alignment.source);
    assert_eq!(mirrored.operations[1], EditOp::Insert);
}

#[test]
fn test_phone_distance_partition() {
    let table = table();
    let t = table.lookup("t").unwrap();
    let a = table.lookup("a").unwrap();
    let boundary = table.lookup("#").unwrap();
    let gap = table.lookup("*").unwrap();

    assert_eq!(phone_distance(&t, &a), 1.0);
    assert_eq!(phone_distance(&t, &boundary), 1.0);
    assert_eq!(phone_distance(&a, &gap), 1.0);
    assert_eq!(phone_distance(&boundary, &boundary), 0.0);
    assert_eq!(boundary, Phone::boundary());
    assert!(gap.is_gap());
}

#[test]
fn test_aligned_words_have_equal_length() {
    let table = table();
    let words = ["mʲesʲat͡s", "mʲisʲat͡sʲ", "sobaka", "pɛs", "hɛɐ̯pst", ""];

    for a in &words {
        for b in &words {
            let word_a = table.word(a).unwrap();
            let word_b = table.word(b).unwrap();
            let alignment = align(&word_a, &word_b);

            assert_eq!(alignment.source.len(), alignment.target.len());
            assert_eq!(alignment.source.len(), alignment.operations.len());
            assert!(alignment.len() >= word_a.len().max(word_b.len()));
            assert!(alignment.source[0].is_boundary());
            assert!(alignment.target[0].is_boundary());
        }
    }
}

#[test]
fn test_identical_words_align_without_gaps() {
    let table = table();
    for ipa in ["sobaka", "hɛɐ̯pst", "tʲɪt͡ʃʲeˑnʲijə", ""] {
        let word = table.word(ipa).unwrap();
        let alignment = align(&word, &word);

        assert_eq!(alignment.source, word);
        assert_eq!(alignment.target, word);
        assert!(alignment.operations.iter().all(|op| *op == EditOp::Match));
        assert_eq!(lev_distance(&alignment.source, &alignment.target), 0.0);
    }
}

#[test]
fn test_cognate_pipeline() {
    let table = table();
    let config = CognateConfig::from_json(r#"{ "threshold": 0.4 }"#).unwrap();
    let detector = CognateDetector::new(&table, config);

    let pairs = vec![
        WordPair::new(1, "ruka", "ruka"),
        WordPair::new(2, "sobaka", "pɛs"),
        WordPair::new(3, "pater", "fader"),
        WordPair::new(4, "tata", "tada"),
    ];
    let split = detector.partition(&pairs).unwrap();
    assert_eq!(split.len(), 4);

    let cognate_ids: Vec<_> = split.cognates.iter().map(|p| p.concept_id).collect();
    assert!(cognate_ids.contains(&1));
    assert!(cognate_ids.contains(&4));
    assert!(!cognate_ids.contains(&2));

    let correspondences = sound_correspondences(split.cognate_alignments());
    let t = table.lookup("t").unwrap();
    let d = table.lookup("d").unwrap();
    assert_eq!((correspondences[0].0, correspondences[0].1), (t, d));
}

#[test]
fn test_unknown_symbol_is_a_lookup_error() {
    let table = table();
    let err = table.word("ru§a").unwrap_err();
    assert!(err.is_lookup());
    assert!(matches!(err, PhoneticError::UnknownSymbol(_)));
}

#[test]
fn test_unknown_diacritic_fails_the_pair() {
    let table = table();
    let detector = CognateDetector::new(&table, CognateConfig::default());
    let err = detector.assess(&WordPair::new(5, "n\u{0329}a", "na")).unwrap_err();
    assert!(err.is_lookup());
}

#[test]
fn test_aligned_affricates_render() {
    let table = table();
    let detector = CognateDetector::new(&table, CognateConfig::default());
    let pair = detector.assess(&WordPair::new(4, "mʲesʲat͡s", "mʲisʲat͡ʃʲ")).unwrap();

    assert_eq!(
        table.render(&pair.alignment.source),
        vec!["#", "mʲ", "e", "sʲ", "a", "t͡s"]
    );
    assert_eq!(
        table.render(&pair.alignment.target),
        vec!["#", "mʲ", "i", "sʲ", "a", "t͡ʃʲ"]
    );
}

#[test]
fn test_custom_table_round_trip() {
    let table = table();
    let text = table.to_numerical_csv();
    let reloaded = IpaTable::from_numerical_csv(&text).unwrap();

    assert_eq!(reloaded.len(), table.len());
    assert_eq!(reloaded.lookup("t").unwrap(), table.lookup("t").unwrap());
    assert_eq!(reloaded.to_phone("t͡sʲ").unwrap(), table.to_phone("t͡sʲ").unwrap());
}

#[test]
fn test_prediction_scoring() {
    let table = table();
    let predicted = table.word("mʲesʲat͡s").unwrap();
    let target = table.word("mʲisʲat͡sʲ").unwrap();

    let mean = mean_prediction_distance(&[
        (predicted.clone(), predicted.clone()),
        (predicted, target),
    ])
    .unwrap();
    assert!(mean > 0.0 && mean < 0.5);
}

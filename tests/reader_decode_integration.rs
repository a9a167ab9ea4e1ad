use hmm_viterbi::hmm::{read_experiment, read_model};
use hmm_viterbi::{decode, DecodeError, Error, ExperimentData, ValidationError};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Exon/intron toy gene model over a four-letter alphabet (a, b, c, d).
const GENE_MODEL: &str = "
    4 start exon intron stop
    4
    7
    start exon 1.0
    exon exon 0.8
    exon intron 0.15
    exon stop 0.05
    intron intron 0.7
    intron exon 0.25
    intron stop 0.05
    8
    exon a 0.1
    exon b 0.4
    exon c 0.4
    exon d 0.1
    intron a 0.45
    intron b 0.05
    intron c 0.05
    intron d 0.45
";

const GENE_RUN: &str = "
    10
    0 exon b
    1 exon c
    2 exon b
    3 intron a
    4 intron d
    5 intron a
    6 intron d
    7 exon c
    8 exon b
    9 exon c
";

#[test]
fn decodes_read_experiment_against_ground_truth() {
    init_logger();
    let model = read_model(GENE_MODEL).unwrap();
    let data = read_experiment(&model, GENE_RUN).unwrap();

    let path = decode(&model, &data).unwrap();

    assert_eq!(path.len(), data.len());
    assert_eq!(Some(path.clone()), data.ground_truth());
    assert_eq!(
        model.path_names(&path[..4]),
        vec!["exon", "exon", "exon", "intron"]
    );
}

#[test]
fn known_linear_path() {
    init_logger();
    let model = read_model("3 start mid end 1 2 start mid 1.0 mid end 1.0 1 mid a 1.0").unwrap();
    let data = read_experiment(&model, "1 0 mid a").unwrap();
    assert_eq!(decode(&model, &data).unwrap(), vec![1]);
}

#[test]
fn one_model_serves_many_runs() {
    init_logger();
    let model = read_model(GENE_MODEL).unwrap();
    let runs = [vec![1, 2, 1], vec![0, 3, 0, 3], vec![2]];
    std::thread::scope(|scope| {
        let handles: Vec<_> = runs
            .iter()
            .map(|symbols| {
                let model = &model;
                scope.spawn(move || decode(model, &ExperimentData::from_symbols(symbols)))
            })
            .collect();
        for (handle, symbols) in handles.into_iter().zip(runs.iter()) {
            let path = handle.join().unwrap().unwrap();
            assert_eq!(path.len(), symbols.len());
            assert_eq!(path, decode(&model, &ExperimentData::from_symbols(symbols)).unwrap());
        }
    });
}

#[test]
fn empty_experiment_is_rejected() {
    init_logger();
    let model = read_model(GENE_MODEL).unwrap();
    let data = read_experiment(&model, "0").unwrap();
    assert!(data.is_empty());
    assert_eq!(decode(&model, &data), Err(DecodeError::EmptyObservations));
}

#[test]
fn boundary_violations_abort_reading() {
    init_logger();
    let from_end = "3 start mid end 1 1 end mid 0.5 0";
    let to_start = "3 start mid end 1 1 mid start 0.5 0";
    let emit_start = "3 start mid end 1 0 1 start a 0.5";
    let emit_end = "3 start mid end 1 0 1 end a 0.5";

    assert!(matches!(
        read_model(from_end),
        Err(Error::Validation(ValidationError::TransitionFromEnd { .. }))
    ));
    assert!(matches!(
        read_model(to_start),
        Err(Error::Validation(ValidationError::TransitionToStart { .. }))
    ));
    for source in [emit_start, emit_end] {
        assert!(matches!(
            read_model(source),
            Err(Error::Validation(ValidationError::BoundaryEmission { .. }))
        ));
    }
}

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use hmm_viterbi::{Emission, ExperimentData, Model, Transition, Viterbi, ViterbiConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Fully connected model over `nstates` states with random weights.
fn random_model(rng: &mut StdRng, nstates: usize, alphabet: usize) -> Model {
    let names: Vec<String> = (0..nstates).map(|i| format!("s{i}")).collect();
    let mut transitions = Vec::new();
    for from in 0..nstates - 1 {
        for to in 1..nstates {
            transitions.push(Transition::new(
                names[from].clone(),
                names[to].clone(),
                rng.gen::<f64>() / nstates as f64,
            ));
        }
    }
    let mut emissions = Vec::new();
    for state in 1..nstates - 1 {
        for symbol in 0..alphabet {
            emissions.push(Emission::new(
                names[state].clone(),
                symbol,
                rng.gen::<f64>() / alphabet as f64,
            ));
        }
    }
    Model::build(&names[..], alphabet, &transitions, &emissions).unwrap()
}

fn random_symbols(rng: &mut StdRng, len: usize, alphabet: usize) -> ExperimentData {
    let symbols: Vec<usize> = (0..len).map(|_| rng.gen_range(0..alphabet)).collect();
    ExperimentData::from_symbols(&symbols)
}

fn bench_viterbi(c: &mut Criterion) {
    let mut group = c.benchmark_group("viterbi");
    for &nstates in &[8usize, 32, 128] {
        let mut rng = StdRng::seed_from_u64(42);
        let model = random_model(&mut rng, nstates, 4);
        for (label, config) in [
            ("sequential", ViterbiConfig::new()),
            (
                "parallel",
                ViterbiConfig::new()
                    .with_parallel(true)
                    .with_parallel_min_states(1),
            ),
        ] {
            let decoder = Viterbi::new(&model).with_config(config);
            group.bench_with_input(BenchmarkId::new(label, nstates), &nstates, |b, _| {
                b.iter_batched(
                    || random_symbols(&mut StdRng::seed_from_u64(7), 50, 4),
                    |data| black_box(decoder.decode(&data).unwrap()),
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_viterbi);
criterion_main!(benches);

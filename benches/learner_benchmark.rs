//! Throughput of the two learners

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sandbox_rl::bandit::{DriftSchedule, DriftingBandit, EpsilonGreedy, GaussianBandit, UpdateRule};
use sandbox_rl::grid::{random_policy_reference, GridWorld};
use sandbox_rl::td::{PolicyKind, TdLearner};

fn bench_bandit(c: &mut Criterion) {
    let mut group = c.benchmark_group("bandit_learn");

    for &num_arms in &[10usize, 100] {
        group.bench_with_input(BenchmarkId::new("stationary", num_arms), &num_arms, |b, &num_arms| {
            b.iter(|| {
                let source = GaussianBandit::from_means(Array1::linspace(-1.0, 1.0, num_arms), 1.0).unwrap();
                let mut learner = EpsilonGreedy::new(source, 0.1, UpdateRule::SampleAverage, StdRng::seed_from_u64(0)).unwrap();
                black_box(learner.learn(1_000))
            })
        });

        group.bench_with_input(BenchmarkId::new("drifting", num_arms), &num_arms, |b, &num_arms| {
            b.iter(|| {
                let base = GaussianBandit::from_means(Array1::linspace(-1.0, 1.0, num_arms), 1.0).unwrap();
                let source = DriftingBandit::new(base, DriftSchedule::Linear { slope: 0.001 }.into_fn());
                let mut learner = EpsilonGreedy::new(source, 0.1, UpdateRule::FixedStep { alpha: 0.1 }, StdRng::seed_from_u64(0)).unwrap();
                black_box(learner.learn(1_000))
            })
        });
    }

    group.finish();
}

fn bench_td(c: &mut Criterion) {
    let mut group = c.benchmark_group("td_run");
    let reference = random_policy_reference();

    for kind in [PolicyKind::Random, PolicyKind::ValueWeighted] {
        group.bench_function(format!("{:?}", kind), |b| {
            b.iter(|| {
                let rng = StdRng::seed_from_u64(0);
                let mut learner = TdLearner::new(GridWorld::book_world(), 0.05, 0.75, kind.build(), rng).unwrap();
                black_box(learner.run(1_000, None).unwrap())
            })
        });
    }

    group.bench_function("random_with_mse", |b| {
        b.iter(|| {
            let rng = StdRng::seed_from_u64(0);
            let mut learner = TdLearner::new(GridWorld::book_world(), 0.05, 0.75, PolicyKind::Random.build(), rng).unwrap();
            black_box(learner.run(1_000, Some(reference.view())).unwrap())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_bandit, bench_td);
criterion_main!(benches);

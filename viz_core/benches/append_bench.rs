use criterion::{black_box, criterion_group, criterion_main, Criterion};
use viz_core::store::SeriesStore;
use viz_core::types::{Sample, State6, IDENTITY_QUAT};

fn make_samples(n_bodies: usize, v: f64) -> Vec<Option<Sample>> {
    (0..n_bodies)
        .map(|i| {
            Some(Sample::new(
                State6::new(7000.0 + i as f64, v, -v, 0.0, 7.5, 0.1),
                IDENTITY_QUAT,
            ))
        })
        .collect()
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    for n_bodies in [2, 10, 50] {
        group.bench_function(format!("append_{n_bodies}_bodies"), |b| {
            b.iter(|| {
                let mut store = SeriesStore::new(n_bodies, 20_000);
                for step in 0..10_000u32 {
                    let samples = make_samples(n_bodies, step as f64);
                    store.append(step as f64, black_box(&samples));
                }
                black_box(store.len());
            });
        });
    }

    // Small capacity keeps the overflow policy engaged on nearly every
    // append — worst case for the reduction path.
    group.bench_function("append_with_constant_overflow", |b| {
        b.iter(|| {
            let mut store = SeriesStore::new(4, 64);
            for step in 0..10_000u32 {
                let samples = make_samples(4, step as f64);
                store.append(step as f64, black_box(&samples));
            }
            black_box(store.len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_append);
criterion_main!(benches);

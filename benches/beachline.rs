use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use vorotwo::{ArcList, ArcTreap, BoundingBox, Tessellation, TessellationOptions};

fn benchmark_beachline_strategies(c: &mut Criterion) {
    let bounds = BoundingBox::new([0.0, 0.0], [1000.0, 1000.0]);
    // The beachline only matters for the sweep, so skip cell assembly.
    let options = TessellationOptions::default().with_close_cells(false);
    let mut group = c.benchmark_group("beachline");

    for count in [500, 2_000, 8_000] {
        let mut treap = Tessellation::with_beachline(bounds, options, ArcTreap::default());
        treap.random_generators(count);
        group.bench_with_input(BenchmarkId::new("treap", count), &count, |b, _| {
            b.iter(|| {
                treap.calculate().unwrap();
            })
        });

        let mut list = Tessellation::with_beachline(bounds, options, ArcList::default());
        list.random_generators(count);
        group.bench_with_input(BenchmarkId::new("list", count), &count, |b, _| {
            b.iter(|| {
                list.calculate().unwrap();
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_beachline_strategies);
criterion_main!(benches);

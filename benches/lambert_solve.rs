//! Benchmarks for the universal-variable Lambert solver.
//!
//!   cargo bench --bench lambert_solve
//!   cargo bench lambert_solve -- lambert_solve/earth_mars_like

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use porkchop::constants::{AU, GM_SUN, SECONDS_PER_DAY};
use porkchop::lambert::{solve_lambert, TransferDirection};

/// Random heliocentric position on a near-ecliptic orbit of radius `r` (km).
#[inline]
fn rand_position(rng: &mut StdRng, r: f64) -> Vector3<f64> {
    let theta = rng.random::<f64>() * std::f64::consts::TAU;
    let z = rng.random_range(-0.03..0.03) * r;
    Vector3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Earth to Mars like geometry: r1 ≈ 1 AU, r2 ≈ 1.5 AU, 100 to 450 days.
fn bench_earth_mars_like(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let samples = 1_000usize;

    c.bench_function("lambert_solve/earth_mars_like", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| {
                        let a1 = AU * rng.random_range(0.98..1.02);
                        let a2 = AU * rng.random_range(1.38..1.67);
                        let r1 = rand_position(&mut rng, a1);
                        let r2 = rand_position(&mut rng, a2);
                        let tof = rng.random_range(100.0..450.0) * SECONDS_PER_DAY;
                        (r1, r2, tof)
                    })
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (r1, r2, tof) in cases {
                    // near-180° geometries are expected to fail; time them all the same
                    let res = solve_lambert(
                        black_box(&r1),
                        black_box(&r2),
                        black_box(tof),
                        GM_SUN,
                        TransferDirection::Prograde,
                    );
                    let _ = black_box(res);
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Single quarter-orbit transfer, the cheapest converging case.
fn bench_quarter_orbit(c: &mut Criterion) {
    let r1 = Vector3::new(AU, 0.0, 0.0);
    let r2 = Vector3::new(0.0, AU, 0.0);
    let year = std::f64::consts::TAU * (AU.powi(3) / GM_SUN).sqrt();

    c.bench_function("lambert_solve/quarter_orbit", |b| {
        b.iter(|| {
            solve_lambert(
                black_box(&r1),
                black_box(&r2),
                black_box(year / 4.0),
                GM_SUN,
                TransferDirection::Prograde,
            )
            .unwrap()
        })
    });
}

criterion_group!(
    name = lambert_benches;
    config = Criterion::default().sample_size(50);
    targets = bench_earth_mars_like, bench_quarter_orbit
);
criterion_main!(lambert_benches);

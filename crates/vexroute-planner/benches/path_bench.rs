use vexroute_core::{FieldPoint, ScreenPoint};
use vexroute_planner::{
    CodeEmitter, CoordinateTransform, PathSampler, ProximityProjector, WaypointStore,
};

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        sampling_long_route,
        projecting_hover_query,
        emitting_extended_code,
}

/// A zig-zag across the whole field, one waypoint every few inches.
fn zig_zag(count: usize) -> (WaypointStore, CoordinateTransform) {
    let transform = CoordinateTransform::with_image(744.0, 744.0, 12.0);
    let mut store = WaypointStore::new();
    for i in 0..count {
        let x = -70.0 + 140.0 * i as f64 / count as f64;
        let y = if i % 2 == 0 { -60.0 } else { 60.0 };
        store.push(FieldPoint::new(x, y), &transform).unwrap();
    }
    (store, transform)
}

fn sampling_long_route(c: &mut criterion::Criterion) {
    let (store, _) = zig_zag(200);
    c.bench_function("sample 1000 poses along a 200-waypoint route", |b| {
        b.iter(|| {
            let sampler = PathSampler::new(store.waypoints()).unwrap();
            (0..1000)
                .map(|i| sampler.sample_at(i as f64 / 1000.0).distance)
                .sum::<f64>()
        })
    });
}

fn projecting_hover_query(c: &mut criterion::Criterion) {
    let (store, transform) = zig_zag(200);
    let projector = ProximityProjector::default();
    let query = transform.to_screen(FieldPoint::new(0.5, 0.0));
    c.bench_function("project a hover point onto a 200-waypoint route", |b| {
        b.iter(|| projector.project(store.waypoints(), query))
    });
    c.bench_function("project a miss onto a 200-waypoint route", |b| {
        b.iter(|| projector.project(store.waypoints(), ScreenPoint::new(-500.0, -500.0)))
    });
}

fn emitting_extended_code(c: &mut criterion::Criterion) {
    let (store, _) = zig_zag(200);
    let emitter = CodeEmitter::default();
    c.bench_function("emit code for a 200-waypoint route", |b| {
        b.iter(|| emitter.emit_text(store.waypoints()))
    });
}

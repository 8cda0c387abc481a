use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{GrayImage, Luma};
use petanque_hough::{
    detect_edges, gaussian_blur, CircleDetector, HoughParams, HoughVotes, PreprocessParams,
};

fn synthetic_court(w: u32, h: u32) -> GrayImage {
    let discs = [
        (140.0f32, 120.0f32, 11.0f32),
        (320.0, 260.0, 42.0),
        (520.0, 180.0, 40.0),
        (430.0, 420.0, 44.0),
    ];
    let img = GrayImage::from_fn(w, h, |x, y| {
        // mild gravel texture
        let base = 40 + ((x * 7 + y * 13) % 11) as u8;
        let inside = discs
            .iter()
            .any(|&(cx, cy, r)| (x as f32 - cx).hypot(y as f32 - cy) <= r);
        if inside {
            Luma([200])
        } else {
            Luma([base])
        }
    });
    gaussian_blur(&img, &PreprocessParams::default())
}

fn bench_hough(c: &mut Criterion) {
    let gray = synthetic_court(720, 540);
    let params = HoughParams::default();

    c.bench_function("edges_720x540", |b| {
        b.iter(|| detect_edges(black_box(&gray), params.edge_threshold))
    });

    let edges = detect_edges(&gray, params.edge_threshold);
    c.bench_function("votes_720x540", |b| {
        b.iter(|| HoughVotes::accumulate(black_box(edges.clone()), &params))
    });

    let detector = CircleDetector::new(params.clone());
    c.bench_function("detect_720x540", |b| {
        b.iter(|| detector.detect(black_box(&gray)))
    });
}

criterion_group!(benches, bench_hough);
criterion_main!(benches);

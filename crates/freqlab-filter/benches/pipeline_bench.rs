use criterion::{criterion_group, criterion_main, Criterion};
use freqlab_filter::mask::build_mask;
use freqlab_filter::pipeline::{apply, FilterPipeline};
use freqlab_filter::source::patterns;
use freqlab_types::config::{FilterSpec, PassType, PipelineConfig};
use freqlab_types::constants::WORKING_SIZE;
use std::hint::black_box;

fn bench_mask_512(c: &mut Criterion) {
    let spec = FilterSpec::butterworth(PassType::Lowpass, 30.0, 2);
    c.bench_function("butterworth_mask_512x512", |b| {
        b.iter(|| black_box(build_mask(512, 512, &spec)))
    });
}

fn bench_apply_512(c: &mut Criterion) {
    let img = patterns::centered_rectangle(512, 512, 120, 60, 255.0);
    let config = PipelineConfig::default();
    let spec = FilterSpec::gaussian(PassType::Highpass, 30.0);

    let mut group = c.benchmark_group("apply_512x512");
    group.sample_size(10);

    group.bench_function("stateless_apply", |b| {
        b.iter(|| black_box(apply(&img, &spec, &config)))
    });

    // Only the filter changes between runs, so the forward FFT is cached
    group.bench_function("pipeline_spec_change", |b| {
        let mut pipeline = FilterPipeline::new(config.clone()).expect("valid config");
        pipeline.load_source(img.clone()).expect("valid source");
        let mut cutoff = 10.0;
        b.iter(|| {
            cutoff = if cutoff > 200.0 { 10.0 } else { cutoff + 5.0 };
            pipeline
                .set_spec(FilterSpec::ideal(PassType::Lowpass, cutoff))
                .expect("valid spec");
            black_box(pipeline.run().map(|out| out.spatial_view[[256, 256]]))
        })
    });

    group.finish();
}

fn bench_apply_working_canvas(c: &mut Criterion) {
    let n = WORKING_SIZE;
    let img = patterns::vertical_bars(n, n, 4, 4, 255.0);
    let config = PipelineConfig::working_canvas();
    let spec = FilterSpec::butterworth(PassType::Lowpass, 30.0, 2);

    let mut group = c.benchmark_group("apply_working_canvas");
    group.sample_size(10);
    group.bench_function("butterworth_lowpass", |b| {
        b.iter(|| black_box(apply(&img, &spec, &config)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_mask_512,
    bench_apply_512,
    bench_apply_working_canvas
);
criterion_main!(benches);

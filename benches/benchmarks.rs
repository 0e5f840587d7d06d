use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use demon::{
    analytic_signal, butterworth_bandpass, hilbert_detector, lfilter, normalize, square_law,
    Decimator, Demodulator, Demon, DemonConfig, FilterSpec, IirFilter, SqrtPolicy,
};

const FS: f64 = 200_000.0;

/// AM carrier at 25 kHz, modulated at 50 Hz.
fn am_tone(samples: usize) -> Vec<f64> {
    (0..samples)
        .map(|i| {
            let t = i as f64 / FS;
            (1.0 + 0.5 * (2.0 * core::f64::consts::PI * 50.0 * t).cos())
                * (2.0 * core::f64::consts::PI * 25_000.0 * t).sin()
        })
        .collect()
}

fn bench_bandpass_design(c: &mut Criterion) {
    let mut group = c.benchmark_group("bandpass_design");

    for order in [3usize, 6, 10] {
        let spec = FilterSpec::from_hz(order, 20_000.0, 30_000.0, FS).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(order), &spec, |b, spec| {
            b.iter(|| black_box(butterworth_bandpass(black_box(spec))));
        });
    }

    group.finish();
}

fn bench_iir_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("iir_filter");
    let coeffs = butterworth_bandpass(&FilterSpec::from_hz(3, 20_000.0, 30_000.0, FS).unwrap());

    // 6-pole bandpass, one sample at a time
    let mut filter = IirFilter::new(&coeffs);
    group.bench_function("single_sample_order_3", |b| {
        b.iter(|| {
            let _ = black_box(filter.process_sample(black_box(1.0)));
        });
    });

    for size in [1_000usize, 200_000] {
        let signal = am_tone(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("lfilter", size), &signal, |b, signal| {
            b.iter(|| black_box(lfilter(&coeffs, black_box(signal))));
        });
    }

    group.finish();
}

fn bench_hilbert(c: &mut Criterion) {
    let mut group = c.benchmark_group("hilbert_transform");

    // Powers of two and an awkward length
    for size in [4_096usize, 65_536, 200_000] {
        let signal = am_tone(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("analytic_signal", size),
            &signal,
            |b, signal| {
                b.iter(|| black_box(analytic_signal(black_box(signal))));
            },
        );
    }

    group.finish();
}

fn bench_demodulators(c: &mut Criterion) {
    let mut group = c.benchmark_group("demodulator");
    let signal = am_tone(200_000);
    group.throughput(Throughput::Elements(signal.len() as u64));

    for demodulator in [Demodulator::SquareLaw, Demodulator::HilbertMagnitude] {
        group.bench_function(demodulator.name(), |b| {
            b.iter(|| black_box(demodulator.demodulate(black_box(&signal))));
        });
    }

    group.finish();
}

fn bench_decimator(c: &mut Criterion) {
    let mut group = c.benchmark_group("decimator");
    let signal: Vec<f64> = am_tone(200_000).iter().map(|x| x * x).collect();
    group.throughput(Throughput::Elements(signal.len() as u64));

    for factor in [4usize, 25, 100] {
        let decimator = Decimator::new(factor);
        group.bench_with_input(
            BenchmarkId::new("zero_phase", factor),
            &signal,
            |b, signal| {
                b.iter(|| black_box(decimator.process(black_box(signal))));
            },
        );
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let envelope: Vec<f64> = (0..2_000).map(|i| 1.0 + (i as f64 * 0.157).cos()).collect();

    group.bench_function("2000_samples", |b| {
        b.iter(|| black_box(normalize(black_box(&envelope), SqrtPolicy::Reject)));
    });

    group.finish();
}

// Full pipeline on one second of input at the default configuration
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("demon_pipeline");
    group.sample_size(10);

    let config = DemonConfig::default();
    let signal = am_tone(200_000);
    group.throughput(Throughput::Elements(signal.len() as u64));

    group.bench_function("square_law_1s", |b| {
        b.iter(|| black_box(square_law(black_box(&signal), &config)));
    });

    group.bench_function("hilbert_1s", |b| {
        b.iter(|| black_box(hilbert_detector(black_box(&signal), &config)));
    });

    // Design once, run many
    let demon = Demon::new(config).unwrap();
    group.bench_function("reused_square_law_1s", |b| {
        b.iter(|| black_box(demon.run(black_box(&signal), Demodulator::SquareLaw)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_bandpass_design,
    bench_iir_filter,
    bench_hilbert,
    bench_demodulators,
    bench_decimator,
    bench_normalize,
    bench_pipeline
);
criterion_main!(benches);

//! Benchmarks for Head & Shoulders detection.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hspd::prelude::*;

/// Simple test bar structure
#[derive(Debug, Clone, Copy)]
struct TestBar {
  o: f64,
  h: f64,
  l: f64,
  c: f64,
  v: f64,
}

impl OHLCV for TestBar {
  fn open(&self) -> f64 {
    self.o
  }

  fn high(&self) -> f64 {
    self.h
  }

  fn low(&self) -> f64 {
    self.l
  }

  fn close(&self) -> f64 {
    self.c
  }

  fn volume(&self) -> Option<f64> {
    Some(self.v)
  }
}

/// Generate choppy bars with a swing every few bars
fn generate_bars(n: usize) -> Vec<TestBar> {
  let mut bars = Vec::with_capacity(n);
  let mut price = 100.0;

  for i in 0..n {
    let change = ((i * 7 + 13) % 100) as f64 / 50.0 - 1.0; // Deterministic "random"
    let swing = if i % 8 == 0 { 3.0 } else { 0.0 };
    let volatility = 2.0 + ((i * 3) % 10) as f64 / 5.0;

    let o = price;
    let c = price + change + swing;
    let h = o.max(c) + volatility * 0.5;
    let l = o.min(c) - volatility * 0.5;
    let v = 1000.0 + ((i * 37) % 500) as f64;

    bars.push(TestBar { o, h, l, c, v });
    price = c - swing;
  }

  bars
}

fn bench_detect(c: &mut Criterion) {
  let bars = generate_bars(1000);

  let engine = EngineBuilder::new().build().unwrap();

  c.bench_function("detect_1000_bars", |b| {
    b.iter(|| {
      let _ = black_box(engine.detect(black_box(&bars)));
    })
  });
}

fn bench_candidates(c: &mut Criterion) {
  let bars = generate_bars(1000);

  let engine = EngineBuilder::new().build().unwrap();

  c.bench_function("candidates_1000_bars", |b| {
    b.iter(|| {
      let _ = black_box(engine.candidates(black_box(&bars)));
    })
  });
}

fn bench_scaling(c: &mut Criterion) {
  let sequential = EngineBuilder::new().build().unwrap();
  let parallel = EngineBuilder::new().parallel(true).build().unwrap();

  let mut group = c.benchmark_group("scaling");

  for size in [100, 1000, 10000, 100000].iter() {
    let bars = generate_bars(*size);

    group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, _| {
      b.iter(|| {
        let _ = black_box(sequential.detect(black_box(&bars)));
      })
    });

    group.bench_with_input(BenchmarkId::new("parallel", size), size, |b, _| {
      b.iter(|| {
        let _ = black_box(parallel.detect(black_box(&bars)));
      })
    });
  }

  group.finish();
}

fn bench_parallel_scan(c: &mut Criterion) {
  let bars1 = generate_bars(1000);
  let bars2 = generate_bars(1000);
  let bars3 = generate_bars(1000);
  let bars4 = generate_bars(1000);

  let engine = EngineBuilder::new().validate_data(true).build().unwrap();

  let instruments: Vec<(&str, &[TestBar])> =
    vec![("BTC", &bars1), ("ETH", &bars2), ("SOL", &bars3), ("ADA", &bars4)];

  c.bench_function("parallel_scan_4_instruments", |b| {
    b.iter(|| {
      let _ = black_box(scan_parallel(black_box(&engine), black_box(instruments.clone())));
    })
  });
}

fn bench_find_local_peak(c: &mut Criterion) {
  let bars = generate_bars(1000);
  let prices: Vec<f64> = bars.iter().map(|b| b.c).collect();

  c.bench_function("find_local_peak_window", |b| {
    b.iter(|| {
      let _ = black_box(find_local_peak(black_box(&prices), black_box(492), black_box(496)));
    })
  });
}

criterion_group!(
  benches,
  bench_detect,
  bench_candidates,
  bench_scaling,
  bench_parallel_scan,
  bench_find_local_peak,
);

criterion_main!(benches);

use ndarray::{Array1, Array2};
use rand::prelude::*;

use crate::data::RawRecord;

/// Generate plausible raw records with a known daily-rate relationship.
///
/// Each record covers 1-14 collection days. Per-day visits are uniform in
/// `[20, 200)`; inquiries, quotes and orders are random fractions of the
/// previous counter. The target is
/// `days · (0.02·visits + 0.1·inquiries + 0.5·quotes)/day` plus noise of up to
/// 5% of that value. `orders` is written as a text cell to exercise coercion.
pub fn synthetic_records(n: usize, seed: u64) -> Vec<RawRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let days = rng.gen_range(1..=14) as f64;
            let visits = rng.gen_range(20.0..200.0);
            let inquiries = visits * rng.gen_range(0.1..0.3);
            let quotes = inquiries * rng.gen_range(0.3..0.6);
            let orders = quotes * rng.gen_range(0.2..0.5);
            let rate = 0.02 * visits + 0.1 * inquiries + 0.5 * quotes;
            let noise = rng.gen_range(-0.05..0.05) * rate;

            RawRecord::new()
                .with("collection_days", days)
                .with("visits", (visits * days).round())
                .with("inquiries", (inquiries * days).round())
                .with("quotes", (quotes * days).round())
                .with("orders", format!("{}", (orders * days).round()))
                .with("yield", ((rate + noise) * days).max(0.0))
        })
        .collect()
}

/// Random features uniform in `[min, max)` and linear targets with uniform
/// noise of amplitude `noise`.
///
/// Returns `(features, targets, weights, bias)`.
pub fn synthetic_linear(
    rows: usize,
    cols: usize,
    seed: u64,
    min: f64,
    max: f64,
    noise: f64,
) -> (Array2<f64>, Array1<f64>, Vec<f64>, f64) {
    assert!(max > min);
    let mut rng = StdRng::seed_from_u64(seed);
    let features = Array2::from_shape_fn((rows, cols), |_| rng.gen_range(min..max));

    let weights: Vec<f64> = (0..cols).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let bias = rng.gen_range(-0.25..0.25);
    let targets = features
        .rows()
        .into_iter()
        .map(|row| {
            let y: f64 = bias + row.iter().zip(&weights).map(|(x, w)| x * w).sum::<f64>();
            if noise > 0.0 { y + rng.gen_range(-noise..noise) } else { y }
        })
        .collect();

    (features, targets, weights, bias)
}

/// Deterministic train/valid split indices.
///
/// Returns `(train_idx, valid_idx)`.
pub fn split_indices(rows: usize, valid_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    assert!((0.0..1.0).contains(&valid_fraction));
    let mut idx: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let valid_len = ((rows as f64) * valid_fraction).round() as usize;
    let (valid, train) = idx.split_at(valid_len.min(rows));
    (train.to_vec(), valid.to_vec())
}

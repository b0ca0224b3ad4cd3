#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]

//! Sweeps load factor ceilings and plots how clustering and chain length respond.

use std::error::Error;

use log::info;
use plotters::prelude::*;
use primemap::{LinearProbingMap, SeparateChainingMap, TableStats};
use rand::Rng;

const KEY_COUNT: usize = 100_000;
const EXPECTED_COUNT: usize = 1_000;
const NUM_LOAD_FACTORS: usize = 9;

// Open addressing needs a ceiling below 1.0; chaining is swept over a wider range
const PROBING_RANGE: (f64, f64) = (0.1, 0.9);
const CHAINING_RANGE: (f64, f64) = (0.5, 8.0);

struct Sample {
    limit_factor: f64,
    stats: TableStats,
}

fn sweep(range: (f64, f64)) -> Vec<f64> {
    (0..NUM_LOAD_FACTORS)
        .map(|i| range.0 + (range.1 - range.0) * (i as f64) / ((NUM_LOAD_FACTORS - 1) as f64))
        .collect()
}

fn run_probing(keys: &[u64]) -> Result<Vec<Sample>, Box<dyn Error>> {
    let mut samples = Vec::with_capacity(NUM_LOAD_FACTORS);
    for limit_factor in sweep(PROBING_RANGE) {
        let mut map = LinearProbingMap::try_new(EXPECTED_COUNT, limit_factor)?;
        for &key in keys {
            map.put(key, ())?;
        }
        let stats = map.stats();
        info!(
            "linear probing  limit {:.2}: capacity {}, load {:.3}, longest cluster {}",
            limit_factor, stats.capacity, stats.load_factor, stats.longest_run
        );
        samples.push(Sample { limit_factor, stats });
    }
    Ok(samples)
}

fn run_chaining(keys: &[u64]) -> Result<Vec<Sample>, Box<dyn Error>> {
    let mut samples = Vec::with_capacity(NUM_LOAD_FACTORS);
    for limit_factor in sweep(CHAINING_RANGE) {
        let mut map = SeparateChainingMap::try_new(EXPECTED_COUNT, limit_factor)?;
        map.extend(keys.iter().map(|&key| (key, ())));
        let stats = map.stats();
        info!(
            "separate chaining limit {:.2}: capacity {}, load {:.3}, longest chain {}",
            limit_factor, stats.capacity, stats.load_factor, stats.longest_run
        );
        samples.push(Sample { limit_factor, stats });
    }
    Ok(samples)
}

fn plot(
    file: &str,
    title: &str,
    y_desc: &str,
    samples: &[Sample],
    metric: impl Fn(&TableStats) -> f64,
) -> Result<(), Box<dyn Error>> {
    let font_family = "sans-serif";
    let color = RGBColor(50, 90, 220);

    let root = BitMapBackend::new(file, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_min = samples.first().map_or(0.0, |s| s.limit_factor);
    let x_max = samples.last().map_or(1.0, |s| s.limit_factor);
    let y_max = samples.iter().map(|s| metric(&s.stats)).fold(0.0, f64::max) * 1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max.max(1.0))?;

    chart
        .configure_mesh()
        .x_desc("Load Factor Ceiling")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    let line_style = ShapeStyle::from(&color).stroke_width(2);
    chart.draw_series(LineSeries::new(
        samples.iter().map(|s| (s.limit_factor, metric(&s.stats))),
        line_style,
    ))?;
    chart.draw_series(
        samples.iter().map(|s| Circle::new((s.limit_factor, metric(&s.stats)), 4, color.filled())),
    )?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut rng = rand::rng();
    let keys: Vec<u64> = (0..KEY_COUNT).map(|_| rng.random()).collect();
    info!("inserting {} random keys per run", keys.len());

    let probing = run_probing(&keys)?;
    let chaining = run_chaining(&keys)?;

    plot(
        "linear_probing_clusters.png",
        "Longest Cluster under Linear Probing",
        "Longest Run of Non-Empty Slots",
        &probing,
        |stats| stats.longest_run as f64,
    )?;
    plot(
        "separate_chaining_chains.png",
        "Longest Chain under Separate Chaining",
        "Longest Chain Length",
        &chaining,
        |stats| stats.longest_run as f64,
    )?;
    plot(
        "linear_probing_capacity.png",
        "Final Capacity under Linear Probing",
        "Slots",
        &probing,
        |stats| stats.capacity as f64,
    )?;

    info!(
        "wrote linear_probing_clusters.png, separate_chaining_chains.png, linear_probing_capacity.png"
    );
    Ok(())
}

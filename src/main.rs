mod config;

use std::{convert::Infallible, env, path::Path, sync::Arc, time::Duration};

use anyhow::{Context, bail};
use log::{info, warn};
use ndarray::ArrayView1;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};

use automaton::LifeEngine;
use clustering::KMeans;
use regression::{Curve, Line, Mse, Parabola, SampleSet, Trainer};
use ticker::{Ticker, interval_from_speed};

use crate::config::PlaygroundConfig;

/// Generations the automaton demo runs before the host pauses it.
const LIFE_TICKS: u32 = 40;
/// Training steps the curve-fitting demo performs.
const TRAIN_TICKS: u32 = 100;
/// Suggested points fed to the clustering demo.
const CLUSTER_POINTS: usize = 30;
/// Iteration cap so a pathological dataset cannot spin forever.
const MAX_LLOYD_ROUNDS: usize = 50;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => PlaygroundConfig::load(Path::new(&path))
            .with_context(|| format!("loading config from {path}"))?,
        None => PlaygroundConfig::default(),
    };
    config.validate().context("validating config")?;

    let mut root_rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // Automaton on its own tick driver, paced by the speed knob.
    let life = Arc::new(Mutex::new(LifeEngine::new(
        config.life.num_rows,
        config.life.num_cols,
        config.life.birth_rate,
        config.life.death_rate,
    )?));
    let life_period = interval_from_speed(config.life.speed);
    let life_ticker = spawn_life(
        life.clone(),
        &config,
        StdRng::from_rng(&mut root_rng),
        life_period,
    );

    // Curve fitting on its fixed training cadence.
    let curve: Box<dyn Curve> = match config.fit.degree {
        1 => Box::new(Line),
        2 => Box::new(Parabola),
        other => bail!("unsupported polynomial degree {other}"),
    };
    let samples = match config.fit.degree {
        1 => SampleSet::linear_demo(),
        _ => SampleSet::quadratic_demo(),
    };
    let mut fit = Trainer::new(curve, Mse::new(), config.fit.learning_rate)?.with_samples(samples);
    fit.toggle_training();
    info!(degree = config.fit.degree; "training started");

    let trainer = Arc::new(Mutex::new(fit));
    let fit_ticker = {
        let trainer = trainer.clone();
        Ticker::spawn(
            Duration::from_millis(config.fit.train_interval_ms),
            move || trainer.lock().train_step().map(drop),
        )
    };

    // Clustering is stepped on demand, not scheduled: drive it to
    // convergence right away while the tickers run.
    run_clustering(&config, StdRng::from_rng(&mut root_rng))?;

    // Let the scheduled engines play out their demo windows, then wind down.
    let life_window = life_period * LIFE_TICKS;
    let train_window = Duration::from_millis(config.fit.train_interval_ms) * TRAIN_TICKS;
    tokio::time::sleep(life_window.max(train_window)).await;

    life_ticker
        .stop()
        .await
        .context("stopping the automaton driver")?;
    fit_ticker
        .stop()
        .await
        .context("stopping the training driver")?;

    info!(live = life.lock().live_count(); "automaton paused");
    report_fit(&trainer.lock(), config.fit.degree)?;

    // Coefficients are a scoped resource: release them at teardown.
    trainer.lock().release();

    Ok(())
}

fn spawn_life(
    engine: Arc<Mutex<LifeEngine>>,
    config: &PlaygroundConfig,
    mut rng: StdRng,
    period: Duration,
) -> Ticker<Infallible> {
    let total_cells = (config.life.num_rows * config.life.num_cols) as f32;
    let mut last_count = usize::MAX;

    Ticker::spawn(period, move || {
        let live_count = engine.lock().tick(&mut rng);
        if live_count != last_count {
            last_count = live_count;
            info!(
                live = live_count;
                "population at {:.2}%",
                live_count as f32 / total_cells * 100.0
            );
        }
        Ok(())
    })
}

fn run_clustering(config: &PlaygroundConfig, mut rng: StdRng) -> anyhow::Result<()> {
    let k = config.cluster.cluster_count;
    let mut kmeans = KMeans::new(k)?;

    // The playground suggests random inputs in [0, 10) with a random label.
    for _ in 0..CLUSTER_POINTS {
        let x = rng.random_range(0..10) as f32;
        let y = rng.random_range(0..10) as f32;
        let label = rng.random_range(1..=k);
        kmeans.add_point(x, y, label)?;
    }

    let mut rounds = 0;
    let converged = loop {
        rounds += 1;
        if kmeans.iterate() {
            break true;
        }
        if rounds >= MAX_LLOYD_ROUNDS {
            break false;
        }
    };

    if converged {
        info!(rounds = rounds; "clustering converged");
    } else {
        warn!(rounds = rounds; "clustering stopped before converging");
    }

    for (idx, centroid) in kmeans.centroids().iter().enumerate() {
        info!("centroid {}: ({:.2}, {:.2})", idx + 1, centroid.x, centroid.y);
    }

    Ok(())
}

fn report_fit(trainer: &Trainer<Box<dyn Curve>, Mse>, degree: u8) -> anyhow::Result<()> {
    let coefficients = trainer.coefficients()?.to_vec();
    info!(loss = trainer.last_loss(); "training paused, coefficients {coefficients:?}");

    // Preview series for a renderer: the chart endpoints for a line, a
    // 21-point sweep of [-1, 1] for a parabola.
    let preview_xs: Vec<f32> = if degree == 1 {
        vec![-1.0, 1.0]
    } else {
        (0..=20).map(|i| -1.0 + 0.1 * i as f32).collect()
    };
    let preview_ys = trainer.predict(ArrayView1::from(&preview_xs))?;
    info!("preview curve: {:?}", preview_ys.to_vec());

    Ok(())
}

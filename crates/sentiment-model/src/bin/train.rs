use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sentiment_model::{training, ArtifactStore, TrainingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Fit the review sentiment classifier and write its artifacts.
#[derive(Debug, Parser)]
#[command(name = "train")]
struct Args {
    /// CSV file with `review` and `sentiment` columns.
    #[arg(long, default_value = "dataset/reviews.csv")]
    dataset: PathBuf,
    /// Directory receiving vectorizer.json and classifier.json.
    #[arg(long, default_value = "artifacts")]
    out: PathBuf,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Fraction of rows held out for evaluation.
    #[arg(long, default_value_t = 0.2)]
    test_size: f32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let store = ArtifactStore::new(&args.out);
    let config = TrainingConfig {
        test_size: args.test_size,
        seed: args.seed,
    };

    tracing::info!(dataset = %args.dataset.display(), out = %args.out.display(), "training");
    let report = training::train_from_file(&args.dataset, &store, &config)
        .with_context(|| format!("training on {} failed", args.dataset.display()))?;

    println!("Accuracy: {:.4}", report.accuracy);
    println!("Model and vectorizer saved to {}", store.dir().display());
    Ok(())
}

use anyhow::Context;
use clap::Parser;
use spamserve::config::TrainConfig;
use spamserve::{telemetry, training};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init();

    let config = TrainConfig::parse();
    let report = training::run(&config.options())
        .with_context(|| format!("training on {} failed", config.csv_path.display()))?;

    tracing::info!(
        rows = report.n_rows,
        train = report.n_train,
        test = report.n_test,
        skipped_labels = report.skipped_labels,
        vocabulary_size = report.vocabulary_size,
        accuracy = report.test_accuracy.unwrap_or(f64::NAN),
        "training finished"
    );
    for path in [
        &report.vectorizer_path,
        &report.classifier_path,
        &report.pipeline_path,
    ] {
        tracing::info!(path = %path.display(), "wrote artifact");
    }
    Ok(())
}

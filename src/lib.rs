pub mod classify;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod plan;
pub mod rank;
pub mod session;
pub mod table;
pub mod transform;

use std::{env, fs, io::Write as _, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info, warn};

use crate::{
    cli::{ApplyArgs, Cli, ColumnsArgs, Commands, PreviewArgs, UniquesArgs},
    dataset::Dataset,
    plan::CleaningPlan,
    session::DatasetSession,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_refine", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Preview(args) => handle_preview(&args),
        Commands::Columns(args) => handle_columns(&args),
        Commands::Uniques(args) => handle_uniques(&args),
        Commands::Apply(args) => handle_apply(&args),
    }
}

fn load_dataset(path: &std::path::Path) -> Result<Dataset> {
    let bytes = fs::read(path).with_context(|| format!("Reading input file {path:?}"))?;
    let dataset =
        Dataset::parse(&bytes).with_context(|| format!("Parsing input file {path:?}"))?;
    Ok(dataset)
}

fn handle_preview(args: &PreviewArgs) -> Result<()> {
    let dataset = load_dataset(&args.input)?;
    let headers = dataset.column_names();
    let shown = dataset.row_count().min(args.rows);
    let mut rows = Vec::with_capacity(shown);
    for row in 0..shown {
        rows.push(
            dataset
                .columns()
                .iter()
                .map(|c| c.cells[row].clone().unwrap_or_default())
                .collect::<Vec<_>>(),
        );
    }
    table::print_table(&headers, &rows);
    info!("Displayed {} row(s) from {:?}", shown, args.input);
    Ok(())
}

fn handle_columns(args: &ColumnsArgs) -> Result<()> {
    let mut session = DatasetSession::new();
    let bytes = fs::read(&args.input)
        .with_context(|| format!("Reading input file {input:?}", input = args.input))?;
    session
        .load(&bytes)
        .with_context(|| format!("Parsing input file {input:?}", input = args.input))?;

    if let Some(plan_path) = &args.plan {
        let plan = CleaningPlan::load(plan_path)?;
        let assignments = plan
            .classify
            .iter()
            .map(|(name, kind)| (name.clone(), *kind))
            .collect::<Vec<_>>();
        session
            .classify(&assignments)
            .context("Applying plan classifications")?;
    }

    let with_empty = session.columns_with_empty()?;
    let dataset = session.current()?;
    let mut rows = Vec::with_capacity(dataset.column_count());
    for (idx, (name, classification)) in dataset.classifications().into_iter().enumerate() {
        let empties = if with_empty.contains(&name) { "yes" } else { "" };
        rows.push(vec![
            (idx + 1).to_string(),
            name,
            classification,
            empties.to_string(),
        ]);
    }
    let headers = vec![
        "#".to_string(),
        "name".to_string(),
        "classification".to_string(),
        "has_empty".to_string(),
    ];
    table::print_table(&headers, &rows);
    info!(
        "Listed {} column(s) from {:?}",
        dataset.column_count(),
        args.input
    );
    Ok(())
}

fn handle_uniques(args: &UniquesArgs) -> Result<()> {
    let dataset = load_dataset(&args.input)?;
    let mut rows = Vec::new();
    for name in &args.columns {
        let values = dataset
            .unique_values(name)
            .with_context(|| format!("Listing distinct values of '{name}'"))?;
        for value in values {
            rows.push(vec![name.clone(), value]);
        }
    }
    let headers = vec!["column".to_string(), "value".to_string()];
    table::print_table(&headers, &rows);
    Ok(())
}

fn handle_apply(args: &ApplyArgs) -> Result<()> {
    let plan = CleaningPlan::load(&args.plan)?;
    let mut session = DatasetSession::new();
    let bytes = fs::read(&args.input)
        .with_context(|| format!("Reading input file {input:?}", input = args.input))?;
    session
        .load(&bytes)
        .with_context(|| format!("Parsing input file {input:?}", input = args.input))?;

    let report = plan.execute(&mut session)?;
    for failure in &report.failures {
        warn!("Column '{}' skipped: {}", failure.column, failure.reason);
    }
    if args.report_json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Serializing batch report")?;
        eprintln!("{rendered}");
    }

    let cleaned = session.download()?;
    match &args.output {
        Some(path) => {
            fs::write(path, &cleaned)
                .with_context(|| format!("Writing cleaned dataset to {path:?}"))?;
            info!(
                "Wrote cleaned dataset ({} byte(s)) to {:?} with {} failed column request(s)",
                cleaned.len(),
                path,
                report.failures.len()
            );
        }
        None => {
            std::io::stdout()
                .write_all(&cleaned)
                .context("Writing cleaned dataset to stdout")?;
        }
    }
    Ok(())
}

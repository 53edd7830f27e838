use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use workbench_result_metrics::result_metrics_impl::TargetVsAchieved;
use workbench_result_metrics::result_structs::processing_result_struct::ProcessingResult;
use workbench_submission::submission_state::SubmissionOutcome;

use crate::execution_context::ExecutionContext;
use crate::job_file::load_job;

mod execution_context;
mod job_file;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Settings document, a file path or an http(s) URL
    #[arg(long, global = true, default_value = "config.json")]
    settings: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the datasets known to the engine
    Datasets,
    /// Show the columns and first rows of a dataset
    Dataset {
        #[arg(long, required = true)]
        id: String,
        /// Number of rows to preview
        #[arg(long, default_value = "5")]
        rows: usize,
    },
    /// Upload a CSV or Excel file as a new dataset
    Upload {
        /// Example: data/payroll.csv
        path: PathBuf,
    },
    /// Persist a configuration and run the anonymization
    Submit {
        #[arg(long, required = true)]
        dataset_id: String,
        /// Job file in the draft TOML layout. Sections it leaves out keep the
        /// saved draft's values
        #[arg(long)]
        job: Option<PathBuf>,
        /// Only persist the configuration, do not process it
        #[arg(long)]
        save_only: bool,
        /// Write the anonymized rows to this file after processing
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// List persisted configurations
    Configs {
        #[arg(long)]
        dataset_id: Option<String>,
    },
    /// List processing results, or show one in detail
    Results {
        #[arg(long, conflicts_with = "id")]
        dataset_id: Option<String>,
        #[arg(long)]
        id: Option<String>,
        /// Page of anonymized rows to show (20 rows per page)
        #[arg(long, requires = "id", default_value = "1")]
        page: usize,
        /// Write the anonymized rows of the result to this file
        #[arg(long, requires = "id")]
        export: Option<PathBuf>,
    },
    /// Show engine statistics
    Stats,
    /// Inspect or discard the saved draft of a dataset
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    Show {
        #[arg(long, required = true)]
        dataset_id: String,
    },
    Clear {
        #[arg(long, required = true)]
        dataset_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let context = ExecutionContext::load(&cli.settings).await?;
    info!(
        "{}",
        format!("Using engine at {}", context.engine().base_url())
            .bold()
            .green()
    );

    match cli.command {
        Commands::Datasets => list_datasets(&context).await,
        Commands::Dataset { id, rows } => show_dataset(&context, &id, rows).await,
        Commands::Upload { path } => upload(&context, &path).await,
        Commands::Submit {
            dataset_id,
            job,
            save_only,
            export,
        } => submit(&context, &dataset_id, job.as_deref(), save_only, export.as_deref()).await,
        Commands::Configs { dataset_id } => list_configs(&context, dataset_id.as_deref()).await,
        Commands::Results {
            id: Some(id),
            page,
            export,
            ..
        } => show_result(&context, &id, page, export.as_deref()).await,
        Commands::Results {
            dataset_id,
            id: None,
            ..
        } => list_results(&context, dataset_id.as_deref()).await,
        Commands::Stats => stats(&context).await,
        Commands::Draft { action } => draft(&context, action),
    }
}

async fn list_datasets(context: &ExecutionContext) -> Result<()> {
    let datasets = context.engine().list_datasets().await?;
    if datasets.is_empty() {
        println!("No datasets yet, upload one with `upload <file>`.");
        return Ok(());
    }

    for dataset in datasets {
        println!(
            "{}  {}  {} rows, {} columns{}",
            dataset.id.bold(),
            dataset.name,
            dataset.rows(),
            dataset.columns(),
            dataset
                .created_at
                .map(|created_at| format!("  ({created_at})"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

async fn show_dataset(context: &ExecutionContext, dataset_id: &str, rows: usize) -> Result<()> {
    let dataset = context.engine().get_dataset(dataset_id).await?;

    println!("{} ({})", dataset.name.bold(), dataset.id);
    println!("Columns: {}", dataset.column_names.join(", "));
    for row in dataset.data.iter().take(rows) {
        println!("{}", serde_json::to_string(row)?);
    }
    if dataset.rows() > rows as u64 {
        println!("... {} rows in total", dataset.rows());
    }
    Ok(())
}

async fn upload(context: &ExecutionContext, path: &Path) -> Result<()> {
    let size = fs::metadata(path)
        .with_context(|| format!("Failed to read {path:?}"))?
        .len();
    context.settings().upload.check_file(path, size)?;

    let dataset = context.engine().upload_dataset(path).await?;
    println!(
        "{} {} as dataset {} ({} rows)",
        "Uploaded".bold().green(),
        dataset.name,
        dataset.id.bold(),
        dataset.rows()
    );
    Ok(())
}

async fn submit(
    context: &ExecutionContext,
    dataset_id: &str,
    job: Option<&Path>,
    save_only: bool,
    export: Option<&Path>,
) -> Result<()> {
    let mut session = context.session();
    session.select_dataset(dataset_id).await?;

    if let Some(job) = job {
        let job = load_job(job)?;
        let draft = session
            .draft_mut()
            .ok_or_else(|| anyhow!("dataset {dataset_id} is not selected"))?;
        job.apply_to(draft);
    }

    if save_only {
        let config_id = session.persist_only().await?;
        println!("{} configuration {}", "Saved".bold().green(), config_id.bold());
        return Ok(());
    }

    match session.submit().await {
        Ok(SubmissionOutcome::Completed(result)) => {
            print_result(&result);
            if let Some(path) = export {
                export_rows(&result, path)?;
            }
            Ok(())
        }
        Ok(SubmissionOutcome::Discarded { dataset_id }) => {
            bail!("result for dataset {dataset_id} was discarded")
        }
        Err(e) => {
            if let Some(config_id) = session.controller().retained_config_id() {
                info!("Configuration {config_id} was persisted before processing failed");
            }
            Err(e.into())
        }
    }
}

async fn list_configs(context: &ExecutionContext, dataset_id: Option<&str>) -> Result<()> {
    let configs = context.engine().list_configs(dataset_id).await?;
    for config in configs {
        println!(
            "{}  {}  dataset {}  {} techniques  k={} l={} t={} epsilon={}",
            config.id.bold(),
            config.name,
            config.dataset_id,
            config.techniques.len(),
            config.global_params.k(),
            config.global_params.l(),
            config.global_params.t(),
            config.global_params.epsilon()
        );
    }
    Ok(())
}

async fn list_results(context: &ExecutionContext, dataset_id: Option<&str>) -> Result<()> {
    let results = context.engine().list_results(dataset_id).await?;
    for result in results {
        println!(
            "{}  dataset {}  config {}  k={} l={:.2}  loss {:.1}%  {}",
            result.id.bold(),
            result.dataset_id,
            result.config_id,
            result.achieved_k(),
            result.achieved_l(),
            result.information_loss_percentage(),
            result.processing_time_label()
        );
    }
    Ok(())
}

async fn show_result(
    context: &ExecutionContext,
    result_id: &str,
    page: usize,
    export: Option<&Path>,
) -> Result<()> {
    let result = context.engine().get_result(result_id).await?;
    print_result(&result);

    let rows = result.rows_page(page);
    if rows.is_empty() {
        println!("No anonymized rows on page {page}");
    } else {
        println!(
            "{}",
            format!("Anonymized rows, page {page}/{}", result.page_count()).bold()
        );
        for row in rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }

    if let Some(path) = export {
        export_rows(&result, path)?;
    }
    Ok(())
}

async fn stats(context: &ExecutionContext) -> Result<()> {
    let stats = context.engine().stats().await?;
    println!("Datasets: {}", stats.total_datasets);
    println!("Configurations: {}", stats.total_configs);
    println!("Results: {}", stats.total_results);
    println!("Rows processed: {}", stats.total_rows_processed);
    println!("Average processing time: {:.0}ms", stats.avg_processing_time_ms);
    Ok(())
}

fn draft(context: &ExecutionContext, action: DraftAction) -> Result<()> {
    match action {
        DraftAction::Show { dataset_id } => match context.drafts().load(&dataset_id) {
            Some(record) => println!("{}", toml::to_string_pretty(&record)?),
            None => println!("No saved draft for dataset {dataset_id}"),
        },
        DraftAction::Clear { dataset_id } => {
            context.drafts().remove(&dataset_id)?;
            println!("{} draft of dataset {dataset_id}", "Removed".bold().green());
        }
    }
    Ok(())
}

fn print_result(result: &ProcessingResult) {
    let rows = result.row_counts();
    let columns = result.column_counts();

    println!("{}", format!("Result {}", result.id).bold().green());
    println!("  Achieved k: {}", result.achieved_k());
    println!("  Achieved l: {:.2}", result.achieved_l());
    println!(
        "  Information loss: {:.1}%",
        result.information_loss_percentage()
    );
    println!("  Rows: {} -> {}", rows.original, rows.anonymized);
    println!("  Columns: {} -> {}", columns.original, columns.anonymized);
    println!("  Quasi-identifiers: {}", result.quasi_identifiers().join(", "));
    println!(
        "  Sensitive attributes: {}",
        result.sensitive_attributes().join(", ")
    );
    println!("  Processing time: {}", result.processing_time_label());

    for entry in result.explanations() {
        let title = match entry.column {
            Some(column) => format!("{} ({column})", entry.technique),
            None => entry.technique.to_string(),
        };
        println!("{}", title.bold());
        println!("  {}", entry.explanation);
        match entry.target {
            Some(TargetVsAchieved::K { target, achieved }) => {
                println!("  target k {target}, achieved {achieved}")
            }
            Some(TargetVsAchieved::L { target, achieved }) => {
                println!("  target l {target}, achieved {achieved:.2}")
            }
            None => {}
        }
        if let Some(params) = entry.params {
            println!("  parameters: {params}");
        }
        for change in entry.changes {
            println!("  - {change}");
        }
    }
}

fn export_rows(result: &ProcessingResult, path: &Path) -> Result<()> {
    result.export_anonymized_rows(path)?;
    println!(
        "{} {} anonymized rows to {path:?}",
        "Exported".bold().green(),
        result.anonymized_data.len()
    );
    Ok(())
}

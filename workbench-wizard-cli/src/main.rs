use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cliclack::{intro, log, outro, outro_cancel, outro_note};
use console::style;
use strum::IntoEnumIterator;
use workbench_anonymization_config::config_structs::column_mapping_struct::ColumnRole;
use workbench_anonymization_config::config_structs::configuration_struct::ConfigurationDraft;
use workbench_anonymization_config::config_structs::technique_struct::Technique;
use workbench_anonymization_config::wizard_step::WizardStep;
use workbench_app_settings::settings_structs::AppSettings;
use workbench_draft_cache::file_draft_store::FileDraftStore;
use workbench_engine_client::anonymization_engine::AnonymizationEngine;
use workbench_engine_client::http_engine_client::HttpEngineClient;
use workbench_result_metrics::result_metrics_impl::TargetVsAchieved;
use workbench_result_metrics::result_structs::processing_result_struct::ProcessingResult;
use workbench_submission::submission_state::SubmissionOutcome;
use workbench_submission::workbench_session::WorkbenchSession;

use crate::parameter_input::{
    GlobalParameter, parse_technique_parameters, technique_input, technique_prompt,
};

mod parameter_input;

#[derive(Parser)]
#[command(author, version, about = "Interactive anonymization configuration wizard", long_about = None)]
struct Cli {
    /// Settings document, a file path or an http(s) URL
    #[arg(long, default_value = "config.json")]
    settings: String,
    /// Skip the dataset picker
    #[arg(long)]
    dataset_id: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum WizardAction {
    Next,
    Back,
    Submit,
    SaveConfiguration,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();

    ctrlc::set_handler(move || {}).context("setting Ctrl-C handler")?;

    let cli = Cli::parse();
    let settings = AppSettings::load(&cli.settings).await;
    let engine: Arc<dyn AnonymizationEngine> = Arc::new(HttpEngineClient::new(&settings)?);
    let drafts = Arc::new(FileDraftStore::in_current_dir()?);
    let drafts_dir = drafts.root().display().to_string();

    cliclack::clear_screen()?;
    intro(
        style(format!(" {} ", settings.app.name))
            .on_cyan()
            .black(),
    )?;

    let dataset_id = match cli.dataset_id {
        Some(dataset_id) => dataset_id,
        None => match pick_dataset(engine.as_ref()).await? {
            Some(dataset_id) => dataset_id,
            None => return Ok(()),
        },
    };

    let mut session = WorkbenchSession::new(engine, drafts);
    if let Err(e) = session.select_dataset(&dataset_id).await {
        outro_cancel(e.to_string())?;
        return Ok(());
    }

    let mut step = WizardStep::default();
    loop {
        let Some(draft) = session.draft_mut() else {
            break;
        };
        log::step(format!("Step {}/3: {step}", step.number()))?;
        match step {
            WizardStep::ColumnMapping => classify_columns(draft)?,
            WizardStep::TechniqueSelection => select_techniques(draft)?,
            WizardStep::Parameters => set_parameters(draft)?,
        }

        if let Err(e) = session.save_draft() {
            log::warning(format!("Draft could not be saved: {e:#}"))?;
        }

        match choose_action(step)? {
            WizardAction::Next => step = step.next(),
            WizardAction::Back => step = step.previous(),
            WizardAction::SaveConfiguration => {
                let mut spinner = cliclack::spinner();
                spinner.start("Saving configuration...");
                match session.persist_only().await {
                    Ok(config_id) => spinner.stop(format!("Configuration saved with id {config_id}")),
                    Err(e) => spinner.error(e.to_string()),
                }
            }
            WizardAction::Submit => {
                let mut spinner = cliclack::spinner();
                spinner.start("Saving configuration and processing...");
                match session.submit().await {
                    Ok(SubmissionOutcome::Completed(result)) => {
                        spinner.stop("Anonymization completed");
                        show_result(&result)?;
                        offer_export(&result)?;
                        outro("You're all set!")?;
                        return Ok(());
                    }
                    Ok(SubmissionOutcome::Discarded { dataset_id }) => {
                        spinner.stop(format!("Result for dataset {dataset_id} discarded"));
                    }
                    Err(_) => {
                        spinner.error(session.last_error().unwrap_or("Submission failed"));
                    }
                }
            }
            WizardAction::Quit => {
                outro_note("Draft kept for next time", format!("Drafts live in {drafts_dir}"))?;
                return Ok(());
            }
        }
    }

    Ok(())
}

async fn pick_dataset(engine: &dyn AnonymizationEngine) -> Result<Option<String>> {
    let mut spinner = cliclack::spinner();
    spinner.start("Loading datasets...");
    let datasets = match engine.list_datasets().await {
        Ok(datasets) => datasets,
        Err(e) => {
            spinner.error("Could not load datasets");
            outro_cancel(e.to_string())?;
            return Ok(None);
        }
    };
    spinner.stop(format!("{} datasets available", datasets.len()));

    if datasets.is_empty() {
        outro_note(
            "No datasets yet",
            "Upload one with `anonymizer-workbench upload <file>` first.",
        )?;
        return Ok(None);
    }

    let items = datasets
        .iter()
        .map(|dataset| {
            (
                dataset.id.clone(),
                dataset.name.clone(),
                format!("{} rows, {} columns", dataset.rows(), dataset.columns()),
            )
        })
        .collect::<Vec<_>>();

    let dataset_id = cliclack::select("Select the dataset you want to anonymize:")
        .items(&items)
        .interact()?;

    Ok(Some(dataset_id))
}

fn classify_columns(draft: &mut ConfigurationDraft) -> Result<()> {
    let role_items = ColumnRole::iter()
        .map(|role| (role, role.label(), role.description()))
        .collect::<Vec<_>>();

    let columns = draft
        .column_mappings()
        .iter()
        .map(|mapping| (mapping.column.clone(), mapping.role))
        .collect::<Vec<_>>();

    for (column, current) in columns {
        let had_technique = draft.lookup(&column).is_some();
        let role = cliclack::select(format!("Role of column {}:", style(&column).bold()))
            .items(&role_items)
            .initial_value(current)
            .interact()?;

        draft.set_role(&column, role);
        if role == ColumnRole::Identifier && had_technique {
            log::warning(format!(
                "Column {column} is now an identifier, its technique was removed"
            ))?;
        }
    }

    Ok(())
}

fn select_techniques(draft: &mut ConfigurationDraft) -> Result<()> {
    let mut technique_items = vec![(
        None,
        "Leave unassigned",
        "The engine receives no technique for this column",
    )];
    technique_items.extend(
        Technique::iter()
            .map(|technique| (Some(technique), technique.label(), technique.description())),
    );

    let columns = draft
        .assignable_columns()
        .map(|mapping| (mapping.column.clone(), mapping.role))
        .collect::<Vec<_>>();

    if columns.is_empty() {
        log::info("Every column is an identifier, there is nothing to configure")?;
        return Ok(());
    }

    for (column, role) in columns {
        let current = draft.lookup(&column).map(|assignment| assignment.parameters);
        let technique = cliclack::select(format!(
            "Technique for {} ({role}):",
            style(&column).bold()
        ))
        .items(&technique_items)
        .initial_value(current.map(|p| p.technique()))
        .interact()?;

        let Some(technique) = technique else {
            draft.clear_technique(&column);
            continue;
        };

        let parameters = match technique_prompt(technique) {
            None => technique.default_parameters(),
            Some(prompt) => {
                let prefill = current
                    .filter(|p| p.technique() == technique)
                    .unwrap_or_else(|| technique.default_parameters());
                let input: String = cliclack::input(prompt)
                    .default_input(&technique_input(&prefill))
                    .validate(move |input: &String| {
                        parse_technique_parameters(technique, input).map(|_| ())
                    })
                    .interact()?;
                parse_technique_parameters(technique, &input).map_err(anyhow::Error::msg)?
            }
        };

        draft.assign(&column, parameters)?;
    }

    Ok(())
}

fn set_parameters(draft: &mut ConfigurationDraft) -> Result<()> {
    for parameter in GlobalParameter::iter() {
        let current = parameter.current(draft.global_params());
        let input: String = cliclack::input(parameter.prompt())
            .default_input(&current)
            .validate(move |input: &String| {
                let mut scratch = Default::default();
                parameter.apply(&mut scratch, input)
            })
            .interact()?;
        parameter
            .apply(draft.global_params_mut(), &input)
            .map_err(anyhow::Error::msg)?;
    }

    let name: String = cliclack::input("Configuration name:")
        .default_input(draft.name())
        .required(false)
        .interact()?;
    draft.set_name(name.trim());

    Ok(())
}

fn choose_action(step: WizardStep) -> Result<WizardAction> {
    let mut select = cliclack::select("What next?");
    if !step.is_last() {
        select = select.item(WizardAction::Next, "Next", step.next().to_string());
    }
    if step != WizardStep::ColumnMapping {
        select = select.item(WizardAction::Back, "Back", step.previous().to_string());
    }
    let action = select
        .item(
            WizardAction::Submit,
            "Submit",
            "Save the configuration and run the anonymization",
        )
        .item(
            WizardAction::SaveConfiguration,
            "Save configuration",
            "Store the configuration without processing",
        )
        .item(WizardAction::Quit, "Quit", "Keep the draft for later")
        .interact()?;

    Ok(action)
}

fn show_result(result: &ProcessingResult) -> Result<()> {
    let rows = result.row_counts();
    let columns = result.column_counts();
    let summary = format!(
        "Achieved k: {}\nAchieved l: {:.2}\nInformation loss: {:.1}%\nRows: {} -> {}\nColumns: {} -> {}\nProcessing time: {}",
        result.achieved_k(),
        result.achieved_l(),
        result.information_loss_percentage(),
        rows.original,
        rows.anonymized,
        columns.original,
        columns.anonymized,
        result.processing_time_label(),
    );
    cliclack::note(format!("Result {}", result.id), summary)?;

    for entry in result.explanations() {
        let mut text = match entry.column {
            Some(column) => format!("{} on {column}: {}", entry.technique, entry.explanation),
            None => format!("{}: {}", entry.technique, entry.explanation),
        };
        match entry.target {
            Some(TargetVsAchieved::K { target, achieved }) => {
                text.push_str(&format!(" (target k {target}, achieved {achieved})"));
            }
            Some(TargetVsAchieved::L { target, achieved }) => {
                text.push_str(&format!(" (target l {target}, achieved {achieved:.2})"));
            }
            None => {}
        }
        for change in entry.changes {
            text.push_str(&format!("\n  {change}"));
        }
        log::info(text)?;
    }

    Ok(())
}

fn offer_export(result: &ProcessingResult) -> Result<()> {
    let export = cliclack::confirm("Download the anonymized rows as JSON?")
        .initial_value(false)
        .interact()?;
    if export {
        let path = result.default_export_file_name();
        result.export_anonymized_rows(Path::new(&path))?;
        log::success(format!("Anonymized rows written to {path}"))?;
    }
    Ok(())
}

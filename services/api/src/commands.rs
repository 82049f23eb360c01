use crate::infra::{parse_payload, read_payload_file, standard_dispatcher};
use clap::Args;
use clinical_scores::catalog::{
    run_batch, BatchReport, CalculatorDispatcher, ScoreDefinition, ScoreOutcome,
};
use clinical_scores::error::AppError;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Only show scores in this category (cardiology, nephrology, pulmonology)
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Case-insensitive search over id, title and description
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DescribeArgs {
    /// Score identifier, e.g. cha2ds2_vasc
    pub(crate) score_id: String,
}

#[derive(Args, Debug)]
pub(crate) struct CalculateArgs {
    /// Score identifier, e.g. cha2ds2_vasc
    pub(crate) score_id: String,
    /// Inputs as an inline JSON object
    #[arg(long, conflicts_with = "input_file", required_unless_present = "input_file")]
    pub(crate) input: Option<String>,
    /// Path to a JSON file holding the inputs
    #[arg(long)]
    pub(crate) input_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Score identifier, e.g. curb_65
    pub(crate) score_id: String,
    /// CSV file whose header row names the score's inputs
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

pub(crate) fn run_list(args: ListArgs) -> Result<(), AppError> {
    let ListArgs { category, search } = args;
    let dispatcher = standard_dispatcher()?;
    let registry = dispatcher.registry();

    let scores: Vec<&ScoreDefinition> = match (search.as_deref(), category.as_deref()) {
        (Some(term), _) => registry.search(term).collect(),
        (None, Some(category)) => registry.by_category(category).collect(),
        (None, None) => registry.list().collect(),
    };

    if scores.is_empty() {
        println!("No scores matched.");
        return Ok(());
    }

    let width = scores.iter().map(|definition| definition.id.len()).max().unwrap_or(0);
    for definition in &scores {
        println!(
            "{:<width$}  {:<12} {}",
            definition.id,
            definition.category.label(),
            definition.title,
        );
    }
    println!("\n{} score(s)", scores.len());
    Ok(())
}

pub(crate) fn run_describe(args: DescribeArgs) -> Result<(), AppError> {
    let dispatcher = standard_dispatcher()?;
    let entry = dispatcher
        .registry()
        .lookup(&args.score_id)
        .map_err(|err| AppError::Dispatch(err.into()))?;
    let json = serde_json::to_string_pretty(entry.definition.as_ref())?;
    println!("{json}");
    Ok(())
}

pub(crate) fn run_calculate(args: CalculateArgs) -> Result<(), AppError> {
    let CalculateArgs {
        score_id,
        input,
        input_file,
    } = args;

    let payload = match (input, input_file) {
        (Some(raw), _) => parse_payload(&raw)?,
        (None, Some(path)) => read_payload_file(&path)?,
        (None, None) => parse_payload("{}")?,
    };

    let dispatcher = standard_dispatcher()?;
    let outcome = dispatcher.execute(&score_id, &payload)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

pub(crate) fn run_batch_file(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs { score_id, csv } = args;
    let dispatcher = standard_dispatcher()?;
    let reader = BufReader::new(File::open(&csv)?);

    let rows = run_batch(&dispatcher, &score_id, reader)?;
    let report = BatchReport::from_rows(&score_id, rows);
    render_batch_report(&report);
    Ok(())
}

fn render_batch_report(report: &BatchReport) {
    println!("Batch: {}", report.score_id);
    for row in &report.rows {
        match (&row.outcome, &row.error) {
            (Some(outcome), _) => println!("  row {:>3}: {}", row.row, summarize(outcome)),
            (None, Some(error)) => println!("  row {:>3}: {:?} {}", row.row, error.error, error.message),
            (None, None) => println!("  row {:>3}: no result", row.row),
        }
    }
    println!(
        "{} row(s): {} succeeded, {} failed",
        report.total, report.succeeded, report.failed
    );
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let dispatcher = standard_dispatcher()?;
    println!("Clinical score catalog demo");
    println!(
        "{} scores across {} categories\n",
        dispatcher.registry().len(),
        dispatcher.registry().categories().len()
    );

    for line in demo_lines(&dispatcher) {
        println!("{line}");
    }
    Ok(())
}

/// One line per registered score, calculated from its documented example.
pub(crate) fn demo_lines(dispatcher: &CalculatorDispatcher) -> Vec<String> {
    dispatcher
        .registry()
        .list()
        .map(|definition| {
            let summary = match definition.example.as_object() {
                Some(example) => match dispatcher.execute(definition.id, example) {
                    Ok(outcome) => summarize(&outcome),
                    Err(err) => format!("failed: {err}"),
                },
                None => "no worked example".to_string(),
            };
            format!("- {} ({}): {summary}", definition.title, definition.id)
        })
        .collect()
}

fn summarize(outcome: &ScoreOutcome) -> String {
    let result = match serde_json::to_value(&outcome.result) {
        Ok(serde_json::Value::String(label)) => label,
        Ok(value) => value.to_string(),
        Err(_) => "?".to_string(),
    };
    format!("{result} {} | {}", outcome.unit, outcome.stage)
}

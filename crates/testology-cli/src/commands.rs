use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use testology_catalog::{TestDefinition, all_tests, get_test};
use testology_core::models::answer::{RawAnswer, sequential};
use testology_core::models::chunk::InterpretationChunk;
use testology_core::models::result::ScoredResult;
use testology_core::models::snapshot::ResultSnapshot;
use testology_core::storage_keys;
use testology_interpret::InterpretationConfig;
use testology_interpret::render::{RenderFormat, render};
use testology_interpret::table::InterpretationTable;
use testology_scoring::trace::ScoreTrace;
use testology_scoring::{Scorer, ScoringConfig};

use crate::config::{OutputFormat, TestologyConfig};

/// Answers file: either bare values numbered from question 1, or explicit
/// `{question_order, value}` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswersFile {
    Values(Vec<f64>),
    Answers(Vec<RawAnswer>),
}

impl AnswersFile {
    fn into_answers(self) -> Vec<RawAnswer> {
        match self {
            AnswersFile::Values(values) => sequential(&values),
            AnswersFile::Answers(answers) => answers,
        }
    }
}

#[derive(Debug, Serialize)]
struct TestSummary<'a> {
    id: &'a str,
    name: &'a str,
    items: usize,
    dimensions: Vec<&'a str>,
}

pub fn list(format: OutputFormat) -> eyre::Result<String> {
    let tests = all_tests();
    let summaries: Vec<TestSummary<'_>> = tests
        .iter()
        .map(|test| {
            let config = test.scoring_config();
            TestSummary {
                id: test.id(),
                name: test.name(),
                items: config.items.len(),
                dimensions: config.dimensions.iter().map(|d| d.id.as_str()).collect(),
            }
        })
        .collect();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Markdown | OutputFormat::Html => {
            let mut out = String::new();
            for s in &summaries {
                writeln!(
                    out,
                    "{:<8} {:<8} {:>3} items  {}",
                    s.id,
                    s.name,
                    s.items,
                    s.dimensions.join(", ")
                )?;
            }
            Ok(out)
        }
    }
}

/// Validate a scoring config file and describe its dimensions.
pub fn validate(path: &Path) -> eyre::Result<String> {
    let json = read(path)?;
    let scorer = Scorer::from_json(&json)
        .map_err(|e| eyre::eyre!("{} is invalid: {e}", path.display()))?;

    let config = scorer.config();
    let mut out = format!(
        "{}: ok ({} items, {} dimensions)\n",
        config.test_id,
        config.items.len(),
        config.dimensions.len()
    );
    for dimension in &config.dimensions {
        if let Some(bounds) = scorer.bounds(&dimension.id) {
            writeln!(
                out,
                "  {}{}: {} to {}, {} bands",
                dimension.id,
                if dimension.is_total { " (total)" } else { "" },
                bounds.min,
                bounds.max,
                dimension.bands.len()
            )?;
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Default)]
pub struct ScoreRequest {
    pub test: String,
    pub answers: PathBuf,
    pub scoring: Option<PathBuf>,
    pub interpretation: Option<PathBuf>,
    pub with: Vec<PathBuf>,
    /// Also combine with every snapshot saved under the results directory.
    pub with_saved: bool,
    pub format: Option<OutputFormat>,
    pub trace: bool,
    pub save: bool,
}

#[derive(Debug)]
pub struct ScoreOutput {
    pub rendered: String,
    pub saved: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    result: &'a ScoredResult,
    chunks: &'a [InterpretationChunk],
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a ScoreTrace>,
}

enum Interpretation {
    Builtin(Box<dyn TestDefinition>),
    Custom(InterpretationConfig),
}

impl Interpretation {
    fn config(&self) -> &InterpretationConfig {
        match self {
            Interpretation::Builtin(test) => test.interpretation(),
            Interpretation::Custom(config) => config,
        }
    }
}

/// Run the full pipeline: resolve configs, score, interpret, render and
/// optionally save a snapshot.
pub fn score(request: &ScoreRequest, settings: &TestologyConfig) -> eyre::Result<ScoreOutput> {
    let scorer = resolve_scorer(request, settings)?;
    if scorer.test_id() != request.test {
        return Err(eyre::eyre!(
            "scoring config is for '{}', not '{}'",
            scorer.test_id(),
            request.test
        ));
    }
    let interpretation = resolve_interpretation(request, settings)?;

    let answers: AnswersFile = serde_json::from_str(&read(&request.answers)?)
        .map_err(|e| eyre::eyre!("invalid answers in {}: {e}", request.answers.display()))?;
    let (result, trace) = scorer.score_with_trace(&answers.into_answers())?;

    let others = if request.with.is_empty() && !request.with_saved {
        None
    } else {
        let mut others = Vec::with_capacity(request.with.len());
        for path in &request.with {
            others.push(ResultSnapshot::from_json(&read(path)?)?.result);
        }
        if request.with_saved {
            let saved = load_snapshots(&results_dir(settings))?;
            others.extend(saved.into_iter().map(|snapshot| snapshot.result));
        }
        Some(others)
    };
    let chunks = interpretation.config().interpret(&result, others.as_deref())?;
    tracing::info!(
        test_id = %result.test_id,
        total_score = result.total_score,
        level = %result.total_level_id,
        chunks = chunks.len(),
        "scored submission"
    );

    let format = request.format.unwrap_or(settings.output);
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&Report {
            result: &result,
            chunks: &chunks,
            trace: request.trace.then_some(&trace),
        })?,
        OutputFormat::Markdown => markdown_report(&result, &chunks, request.trace.then_some(&trace)),
        OutputFormat::Html => render(&chunks, RenderFormat::Html),
    };

    let saved = if request.save {
        Some(save_snapshot(
            &ResultSnapshot::new(result, chunks),
            &results_dir(settings),
        )?)
    } else {
        None
    };

    Ok(ScoreOutput { rendered, saved })
}

fn resolve_scorer(request: &ScoreRequest, settings: &TestologyConfig) -> eyre::Result<Scorer> {
    let path = request.scoring.clone().or_else(|| {
        settings
            .catalog_dir
            .as_ref()
            .map(|dir| dir.join(storage_keys::scoring_config(&request.test)))
            .filter(|p| p.exists())
    });

    if let Some(path) = path {
        tracing::debug!(path = %path.display(), "loading scoring config");
        let config = ScoringConfig::from_json(&read(&path)?)?;
        return Scorer::new(config).map_err(|e| eyre::eyre!("{} is invalid: {e}", path.display()));
    }

    let test = get_test(&request.test)
        .ok_or_else(|| eyre::eyre!("unknown test '{}' and no scoring config given", request.test))?;
    Ok(test.scorer()?)
}

fn resolve_interpretation(
    request: &ScoreRequest,
    settings: &TestologyConfig,
) -> eyre::Result<Interpretation> {
    let path = request.interpretation.clone().or_else(|| {
        settings
            .catalog_dir
            .as_ref()
            .map(|dir| dir.join(storage_keys::interpretation_table(&request.test)))
            .filter(|p| p.exists())
    });

    if let Some(path) = path {
        tracing::debug!(path = %path.display(), "loading interpretation table");
        let table = InterpretationTable::from_json(&read(&path)?)?;
        return Ok(Interpretation::Custom(InterpretationConfig::from_table(table)?));
    }

    Ok(match get_test(&request.test) {
        Some(test) => Interpretation::Builtin(test),
        None => Interpretation::Custom(InterpretationConfig::new(request.test.clone())),
    })
}

fn markdown_report(
    result: &ScoredResult,
    chunks: &[InterpretationChunk],
    trace: Option<&ScoreTrace>,
) -> String {
    let mut out = format!(
        "# {}\n\nTotal: {} ({})\n",
        result.test_id, result.total_score, result.total_level_label
    );
    for subscale in result.subscales.iter().filter(|s| s.id != "total") {
        out.push_str(&format!(
            "- {}: {} ({})\n",
            subscale.label, subscale.score, subscale.level_label
        ));
    }
    if !result.recommended_tests.is_empty() {
        out.push_str(&format!(
            "\nSuggested next: {}\n",
            result.recommended_tests.join(", ")
        ));
    }
    if !chunks.is_empty() {
        out.push('\n');
        out.push_str(&render(chunks, RenderFormat::Markdown));
        out.push('\n');
    }
    if let Some(trace) = trace {
        out.push_str("\n| item | raw | adjusted | weight | contribution |\n|---|---|---|---|---|\n");
        for item in &trace.items {
            let raw = item.raw.map_or_else(|| "-".to_string(), |v| v.to_string());
            out.push_str(&format!(
                "| {}{} | {} | {} | {} | {} |\n",
                item.question_order,
                if item.reversed { " (R)" } else { "" },
                raw,
                item.adjusted,
                item.weight,
                item.contribution
            ));
        }
    }
    out
}

/// Write `snapshot` under `dir` at its canonical key.
pub fn save_snapshot(snapshot: &ResultSnapshot, dir: &Path) -> eyre::Result<PathBuf> {
    let path = dir.join(storage_keys::result_snapshot(snapshot.id));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, snapshot.to_json()?)?;
    tracing::info!(path = %path.display(), "snapshot saved");
    Ok(path)
}

/// Load every snapshot saved under `dir`, newest first.
pub fn load_snapshots(dir: &Path) -> eyre::Result<Vec<ResultSnapshot>> {
    let results = dir.join(storage_keys::RESULTS_PREFIX);
    if !results.exists() {
        return Ok(Vec::new());
    }

    let mut snapshots = Vec::new();
    for entry in std::fs::read_dir(&results)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            snapshots.push(ResultSnapshot::from_json(&read(&path)?)?);
        }
    }
    snapshots.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    tracing::debug!(dir = %results.display(), count = snapshots.len(), "loaded saved snapshots");
    Ok(snapshots)
}

fn results_dir(settings: &TestologyConfig) -> PathBuf {
    settings
        .results_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."))
}

fn read(path: &Path) -> eyre::Result<String> {
    std::fs::read_to_string(path).map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))
}

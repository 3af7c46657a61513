//! One evaluation run from input CSVs to the two JSON artifacts

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::analysis::{MetricsSummary, Scorer};
use crate::config::Config;
use crate::dataset::{align, gold_columns, load_gold, load_questions};
use crate::error::EvalResult;
use crate::providers::LLMProvider;
use crate::reporting::{build_answers, build_report, write_json};
use crate::runner::{AnswerCollector, GenerationSettings, NoOpProgress, ProgressCallback};

/// Inputs and knobs for a single run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub questions_path: PathBuf,
    pub gold_path: PathBuf,
    pub output_dir: PathBuf,
    pub answers_file: String,
    pub report_file: String,
    pub generation: GenerationSettings,
}

impl RunOptions {
    /// Options with file names and generation settings taken from `config`
    pub fn from_config(
        config: &Config,
        questions_path: impl Into<PathBuf>,
        gold_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            questions_path: questions_path.into(),
            gold_path: gold_path.into(),
            output_dir: PathBuf::from(&config.output.output_dir),
            answers_file: config.output.answers_file.clone(),
            report_file: config.output.report_file.clone(),
            generation: GenerationSettings::from(&config.generation),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn answers_path(&self) -> PathBuf {
        self.output_dir.join(&self.answers_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub answers_path: PathBuf,
    pub report_path: PathBuf,
    pub summary: MetricsSummary,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Runs load, align, collect, score and assemble, then writes the artifacts.
///
/// The output directory is only created once every earlier stage has
/// succeeded, so a failed run leaves the filesystem untouched.
pub struct Pipeline {
    provider: Arc<dyn LLMProvider + Send + Sync>,
    scorer: Scorer,
    progress: Option<Box<dyn ProgressCallback>>,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn LLMProvider + Send + Sync>) -> Self {
        Self {
            provider,
            scorer: Scorer::new(),
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Convenience for a pipeline without progress output
    pub async fn run(
        options: &RunOptions,
        provider: Arc<dyn LLMProvider + Send + Sync>,
    ) -> EvalResult<RunOutput> {
        Self::new(provider).execute(options).await
    }

    pub async fn execute(self, options: &RunOptions) -> EvalResult<RunOutput> {
        let started_at = Utc::now();

        let questions = load_questions(&options.questions_path)?;
        let gold = load_gold(&options.gold_path)?;

        let question_texts: Vec<String> = questions.into_iter().map(|q| q.question).collect();
        let (gold_questions, gold_answers) = gold_columns(&gold);
        let aligned = align(&question_texts, &gold_questions, &gold_answers)?;
        tracing::info!("Aligned {} question(s) with gold answers", aligned.len());

        let progress = self.progress.unwrap_or_else(|| Box::new(NoOpProgress));
        let collector = AnswerCollector::new(self.provider, options.generation.clone())
            .with_progress(progress);
        let predictions = collector.collect(aligned.questions()).await?;

        let metrics = self.scorer.score_pairs(aligned.references(), &predictions)?;
        let answers = build_answers(&aligned, &predictions)?;
        let report = build_report(&aligned, &predictions, &metrics)?;
        let summary = MetricsSummary::from_records(&metrics, aligned.references(), &predictions);

        let answers_path = options.answers_path();
        let report_path = options.report_path();
        write_outputs(&options.output_dir, &answers_path, &answers, &report_path, &report)?;

        Ok(RunOutput {
            answers_path,
            report_path,
            summary,
            started_at,
            completed_at: Utc::now(),
        })
    }
}

fn write_outputs<A, R>(
    dir: &Path,
    answers_path: &Path,
    answers: &A,
    report_path: &Path,
    report: &R,
) -> EvalResult<()>
where
    A: serde::Serialize + ?Sized,
    R: serde::Serialize + ?Sized,
{
    std::fs::create_dir_all(dir)?;
    write_json(answers_path, answers)?;
    tracing::info!("Wrote {}", answers_path.display());
    write_json(report_path, report)?;
    tracing::info!("Wrote {}", report_path.display());
    Ok(())
}

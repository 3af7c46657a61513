//! QA evaluation CLI

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qa_eval::{
    config::Config,
    error::EvalResult,
    pipeline::{Pipeline, RunOptions},
    providers::create_provider_with_config,
    reporting::print_console_report,
    runner::ConsoleProgress,
};

#[derive(Parser)]
#[command(name = "qa-eval")]
#[command(about = "Score LLM answers against gold QA references with BLEU and ROUGE")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the aligned questions and write the metrics report
    Run {
        /// CSV with a `question` column
        #[arg(long)]
        questions: PathBuf,

        /// CSV with `question` and `answer` columns
        #[arg(long)]
        gold: PathBuf,

        /// Output directory (default: out)
        #[arg(long)]
        outdir: Option<PathBuf>,

        /// Chat model (default: gpt-4.1-mini)
        #[arg(long)]
        model: Option<String>,

        /// Max output tokens per answer (default: 80)
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Sampling temperature (default: 0.0)
        #[arg(long)]
        temperature: Option<f32>,

        /// OpenAI-compatible API base URL
        #[arg(long)]
        base_url: Option<String>,

        /// System instruction sent with every question
        #[arg(long)]
        system_prompt: Option<String>,

        /// Per-request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "qa-eval.toml")]
        output: PathBuf,
    },
}

/// Command-line values that take precedence over the config file
struct RunOverrides {
    outdir: Option<PathBuf>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    base_url: Option<String>,
    system_prompt: Option<String>,
    timeout_ms: Option<u64>,
}

impl RunOverrides {
    fn apply(self, config: &mut Config) {
        if let Some(dir) = self.outdir {
            config.output.output_dir = dir.to_string_lossy().into_owned();
        }
        if let Some(model) = self.model {
            config.generation.model = model;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.generation.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.generation.temperature = temperature;
        }
        if let Some(base_url) = self.base_url {
            config.openai.base_url = base_url;
        }
        if let Some(prompt) = self.system_prompt {
            config.generation.system_prompt = prompt;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.openai.timeout_ms = timeout_ms;
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("qa_eval=debug,info")
    } else {
        EnvFilter::new("qa_eval=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run {
            questions,
            gold,
            outdir,
            model,
            max_tokens,
            temperature,
            base_url,
            system_prompt,
            timeout_ms,
        } => {
            let overrides = RunOverrides {
                outdir,
                model,
                max_tokens,
                temperature,
                base_url,
                system_prompt,
                timeout_ms,
            };
            run_evaluation(cli.config, questions, gold, overrides).await
        }

        Commands::InitConfig { output } => init_config(output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_evaluation(
    config_path: Option<PathBuf>,
    questions: PathBuf,
    gold: PathBuf,
    overrides: RunOverrides,
) -> EvalResult<()> {
    let mut config = Config::load(config_path.as_deref())?;
    overrides.apply(&mut config);

    let provider = create_provider_with_config(&config)?;
    tracing::info!(
        "Using {} model {} at {}",
        provider.name(),
        config.generation.model,
        config.openai.base_url
    );

    let options = RunOptions::from_config(&config, questions, gold);
    let output = Pipeline::new(provider)
        .with_progress(Box::new(ConsoleProgress))
        .execute(&options)
        .await?;

    print_console_report(&output.summary);

    let elapsed = output.completed_at - output.started_at;
    tracing::info!("Run finished in {:.1}s", elapsed.num_milliseconds() as f64 / 1000.0);

    println!("Wrote OpenAI answers: {}", output.answers_path.display());
    println!("Wrote metrics report: {}", output.report_path.display());
    Ok(())
}

fn init_config(output: PathBuf) -> EvalResult<()> {
    let config = Config::default();

    // Ensure parent directory exists
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    config.save_toml(&output)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}

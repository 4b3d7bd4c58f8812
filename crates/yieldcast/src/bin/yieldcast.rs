use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use yieldcast::data::load_records;
use yieldcast::persist::{Artifact, ArtifactStore, JsonFileStore};
use yieldcast::training::PhaseEvent;
use yieldcast::{ForecastConfig, GuardrailConfig, ModelKind, TrainingMode, TrainingPipeline, Verbosity};

#[derive(Clone, Copy, ValueEnum)]
enum ModelCli {
    Ridge,
    Boosted,
}

impl From<ModelCli> for ModelKind {
    fn from(value: ModelCli) -> Self {
        match value {
            ModelCli::Ridge => ModelKind::Ridge,
            ModelCli::Boosted => ModelKind::Boosted,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeCli {
    DailyRate,
    Total,
}

impl From<ModeCli> for TrainingMode {
    fn from(value: ModeCli) -> Self {
        match value {
            ModeCli::DailyRate => TrainingMode::DailyRate,
            ModeCli::Total => TrainingMode::Total,
        }
    }
}

#[derive(Parser)]
#[command(name = "yieldcast", about = "Fit and apply small-sample yield forecasting models")]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TrainArgs {
    /// Training CSV with one row per record
    #[arg(long, value_name = "CSV")]
    data: PathBuf,

    /// Where to write the trained artifact
    #[arg(long, value_name = "JSON")]
    out: PathBuf,

    /// Forecast configuration (partial JSON accepted)
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Override the configured model family
    #[arg(long, value_enum)]
    model: Option<ModelCli>,

    /// Override the configured training mode
    #[arg(long, value_enum)]
    mode: Option<ModeCli>,
}

#[derive(Args)]
struct PredictArgs {
    /// Trained artifact
    #[arg(long, value_name = "JSON")]
    artifact: PathBuf,

    /// Records to score
    #[arg(long, value_name = "CSV")]
    data: PathBuf,

    /// Forecast configuration supplying the schema and guardrail band
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Report raw boosted output without clamping
    #[arg(long)]
    no_guardrail: bool,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained artifact
    #[arg(long, value_name = "JSON")]
    artifact: PathBuf,

    /// Labelled records
    #[arg(long, value_name = "CSV")]
    data: PathBuf,

    /// Forecast configuration supplying the schema
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model and write the artifact
    Train(TrainArgs),
    /// Score records with a trained artifact (CSV to stdout)
    Predict(PredictArgs),
    /// Report R², MAE and RMSE of an artifact on labelled records
    Evaluate(EvaluateArgs),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Train(args) => train(args, cli.verbose),
        Commands::Predict(args) => predict(args),
        Commands::Evaluate(args) => evaluate(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn verbosity(verbose: u8) -> Verbosity {
    match verbose {
        0 => Verbosity::Warning,
        1 => Verbosity::Info,
        _ => Verbosity::Debug,
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ForecastConfig, Box<dyn Error>> {
    let config = match path {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => ForecastConfig::default(),
    };
    Ok(config)
}

fn train(args: TrainArgs, verbose: u8) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(model) = args.model {
        config.model = model.into();
    }
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    if verbose > 0 {
        config.verbosity = verbosity(verbose);
    }

    let records = load_records(&args.data)?;
    let pipeline = TrainingPipeline::new(config)?;
    let mut store = JsonFileStore::new(&args.out);
    let mut sink = |event: PhaseEvent| log::info!("{event}");
    let outcome = pipeline.run(records, &mut store, &mut sink)?;

    println!(
        "{} model ({}) written to {}",
        outcome.artifact.kind().as_str(),
        outcome.artifact.meta().mode,
        store.path().display()
    );
    println!("{}", outcome.report);
    if let Artifact::Boosted(model) = &outcome.artifact {
        for (name, share) in model.feature_importance().normalized().top_k(4) {
            println!("  {name}: {share:.3}");
        }
    }
    Ok(())
}

fn load_artifact(path: &PathBuf) -> Result<Artifact, Box<dyn Error>> {
    JsonFileStore::new(path)
        .load()?
        .ok_or_else(|| format!("no artifact at {}", path.display()).into())
}

fn predict(args: PredictArgs) -> Result<(), Box<dyn Error>> {
    let artifact = load_artifact(&args.artifact)?;
    let config = load_config(args.config.as_ref())?;
    config.validate()?;
    let guardrail = if args.no_guardrail { GuardrailConfig::disabled() } else { config.guardrail };
    let records = load_records(&args.data)?;

    let mut out = csv::Writer::from_writer(io::stdout().lock());
    match &artifact {
        Artifact::Ridge(model) => {
            out.write_record(["row", "mean", "lower", "upper"])?;
            for (i, record) in records.iter().enumerate() {
                let p = model.predict_record(record, &config.schema)?;
                out.write_record([i.to_string(), p.mean.to_string(), p.lower.to_string(), p.upper.to_string()])?;
            }
        }
        Artifact::Boosted(model) => {
            out.write_record(["row", "value", "raw", "clipped", "low", "high"])?;
            for (i, record) in records.iter().enumerate() {
                let p = model.predict_record(record, &config.schema, &guardrail)?;
                let (low, high) = p
                    .band
                    .map(|(l, h)| (l.to_string(), h.to_string()))
                    .unwrap_or_default();
                out.write_record([
                    i.to_string(),
                    p.value.to_string(),
                    p.raw.to_string(),
                    p.clipped.to_string(),
                    low,
                    high,
                ])?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn evaluate(args: EvaluateArgs) -> Result<(), Box<dyn Error>> {
    let artifact = load_artifact(&args.artifact)?;
    let config = load_config(args.config.as_ref())?;
    config.validate()?;
    let records = load_records(&args.data)?;
    let dataset = config.schema.resolve(&records, artifact.meta().mode);
    let report = artifact.evaluate(&dataset)?;
    println!("{report}");
    Ok(())
}

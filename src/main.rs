use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use diabestie_lib::advice::AdvisorKind;
use diabestie_lib::app::{self, AppError};
use diabestie_lib::assessment::Measurements;
use diabestie_lib::config::{self, ServiceConfig};

#[derive(Debug, Parser)]
#[command(
    name = "diabestie",
    version,
    about = "Diabetes risk assessment demo (educational use only)",
    long_about = "diabestie classifies diabetes risk from five clinical measurements and\n\
        returns a recommendation with a clinical disclaimer.\n\n\
        EXAMPLES:\n\
        \n  diabestie init-model                        Write the classifier file\n\
        \n  diabestie serve --advisor ollama            Serve the web form on :8501\n\
        \n  diabestie assess --glucose 150 --bmi 30 --bp 130 --age 50 --insulin 100"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the assessment form and JSON API
    Serve(ServeArgs),

    /// Write the classifier file used by `serve` and `assess`
    InitModel(InitModelArgs),

    /// Assess one set of measurements and print the result
    Assess(AssessArgs),
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to listen on (default 127.0.0.1:8501)
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Model file (default ~/Diabestie/diabetes_model.json)
    #[arg(long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Recommendation source
    #[arg(long, value_name = "NAME", value_parser = ["template", "ollama", "medgemma"])]
    advisor: Option<String>,

    /// Ollama base URL
    #[arg(long, value_name = "URL")]
    ollama_url: Option<String>,

    /// Ollama model name
    #[arg(long, value_name = "NAME")]
    ollama_model: Option<String>,
}

#[derive(Debug, Args)]
struct InitModelArgs {
    /// Where to write the model
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Overwrite an existing model file
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Args)]
struct AssessArgs {
    /// Plasma glucose, mg/dL
    #[arg(long)]
    glucose: u32,

    /// Body-mass index, kg/m²
    #[arg(long)]
    bmi: f64,

    /// Systolic blood pressure, mmHg
    #[arg(long = "bp")]
    blood_pressure: u32,

    /// Age, years
    #[arg(long)]
    age: u32,

    /// Serum insulin, µU/mL
    #[arg(long)]
    insulin: f64,

    /// Model file (default ~/Diabestie/diabetes_model.json)
    #[arg(long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Print the assessment as JSON
    #[arg(long)]
    json: bool,
}

impl AssessArgs {
    fn measurements(&self) -> Measurements {
        Measurements {
            glucose: self.glucose,
            bmi: self.bmi,
            blood_pressure: self.blood_pressure,
            age: self.age,
            insulin: self.insulin,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    diabestie_lib::init_tracing(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Serve(args) => {
            let config = service_config(ServiceConfig::from_env()?, args)?;
            app::serve(config).await
        }
        Command::InitModel(args) => {
            let path = args.output.unwrap_or_else(config::default_model_path);
            let info = app::init_model(&path, args.force)?;
            println!("Model saved to {} ({})", info.path, info.fingerprint);
            Ok(())
        }
        Command::Assess(args) => {
            let measurements = args.measurements();
            let path = args.model.unwrap_or_else(config::default_model_path);
            let assessment = app::assess_once(&path, measurements).await?;
            if args.json {
                println!("{}", app::render_json(&assessment)?);
            } else {
                print!("{}", app::render_text(&assessment));
            }
            Ok(())
        }
    }
}

/// Apply `serve` flags on top of the environment-derived `config`.
fn service_config(mut config: ServiceConfig, args: ServeArgs) -> Result<ServiceConfig, AppError> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(model) = args.model {
        config.model_path = model;
    }
    if let Some(advisor) = args.advisor {
        config.advisor.kind = advisor.parse::<AdvisorKind>()?;
    }
    if let Some(url) = args.ollama_url {
        config.advisor.ollama_url = config::normalize_ollama_url(&url);
    }
    if let Some(model) = args.ollama_model {
        config.advisor.ollama_model = model;
    }
    Ok(config)
}

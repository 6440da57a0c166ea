use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flow_adapters::flows::LoanPolicy;
use flow_adapters::steps::Applicant;
use stepflow_rust::{logging, runner, AppConfig, AppError, RunOptions, RunReport};

/// Motor de workflows por pasos con transiciones dinámicas.
#[derive(Debug, Parser)]
#[command(name = "stepflow", version, about)]
struct Cli {
    /// Tope de steps por ejecución (pisa STEPFLOW_MAX_STEPS).
    #[arg(long, global = true)]
    max_steps: Option<u64>,
    /// Un outcome sin cableado hace fallar el flujo.
    #[arg(long, global = true)]
    strict: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pipeline validar -> procesar | manejar fallo.
    Demo {
        #[arg(long)]
        data_valid: bool,
    },
    /// Aprobación de préstamo por reglas.
    Loan {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        score: u32,
        #[arg(long)]
        suspicious: bool,
        #[arg(long, default_value_t = LoanPolicy::default().max_amount)]
        max_amount: f64,
        #[arg(long, default_value_t = LoanPolicy::default().min_score)]
        min_score: u32,
    },
    /// Ejecuta un documento JSON de flujo.
    Run {
        file: PathBuf,
        /// Contexto inicial como objeto JSON.
        #[arg(long)]
        context: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(&config.log_filter) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match dispatch(cli, &config).and_then(|report| Ok(serde_json::to_string_pretty(&report)?)) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli, config: &AppConfig) -> Result<RunReport, AppError> {
    let base = RunOptions::from_config(config);
    let options = RunOptions { max_steps: cli.max_steps.or(base.max_steps),
                               strict: cli.strict || base.strict };
    match cli.command {
        Command::Demo { data_valid } => runner::run_demo(data_valid, &options),
        Command::Loan { amount,
                        score,
                        suspicious,
                        max_amount,
                        min_score, } => {
            let applicant = Applicant::new(amount, score, suspicious)?;
            runner::run_loan(&applicant, LoanPolicy { max_amount, min_score }, &options)
        }
        Command::Run { file, context } => {
            let context = runner::parse_context(context.as_deref())?;
            runner::run_document(file, context, &options)
        }
    }
}

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use standard_block::analysis::ImpactReport;
use standard_block::audit::reader::read_rows_from_path;
use standard_block::audit::{audit_rows, AuditParams, AuditReport};
use standard_block::block::DEFAULT_TARGET_RATIO;
use standard_block::cell::{CellOutput, CellValue};
use standard_block::config::{Config, ConfigOverrides};
use standard_block::functions::host::CustomFunction;
use standard_block::functions::{impact_verdict, omitted_verdict, standard_block};
use standard_block::output::csv::{audit_to_csv, block_to_csv, impact_to_csv};
use standard_block::output::json::render_json;
use standard_block::output::table::{
    render_audit_table, render_block_table, render_functions_table, render_impact_table,
    render_stages_table,
};
use standard_block::output::OutputFormat;
use standard_block::server::run_server;
use standard_block::stage::Stage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "standard-block",
    about = "Standard Block Comparison Method: normalize announced figures per municipality"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Standard block for a target ratio (omit for the whole population)
    Block {
        #[arg(allow_hyphen_values = true)]
        ratio: Option<String>,
    },
    /// Impact report for an announced value
    Score {
        #[arg(short, long, allow_hyphen_values = true)]
        value: f64,
        #[arg(short, long, default_value_t = DEFAULT_TARGET_RATIO)]
        ratio: f64,
    },
    /// Verdict label for a score
    Verdict {
        #[arg(allow_hyphen_values = true)]
        score: Option<String>,
    },
    /// Evaluate a custom function the way a spreadsheet cell would
    Call {
        function: String,
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List the custom functions
    Functions,
    /// Legend of the six implementation stages and their thresholds
    Stages,
    /// Budget distortion audit over a settlement CSV
    Audit {
        csv: PathBuf,
        #[arg(long = "city-population")]
        city_population: Option<f64>,
        #[arg(long = "budget-unit")]
        budget_unit: Option<f64>,
    },
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[derive(Debug, Serialize)]
struct BlockOutput {
    target_ratio: f64,
    standard_block: f64,
}

#[derive(Debug, Serialize)]
struct CallOutput<'a> {
    function: CustomFunction,
    args: &'a [CellValue],
    result: CellOutput,
}

#[derive(Debug, Serialize)]
struct StageOutput {
    stage: Stage,
    lower_bound: Option<f64>,
    title: &'static str,
    finding: &'static str,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let (city_population, budget_unit) = match &cli.command {
        Commands::Audit {
            city_population,
            budget_unit,
            ..
        } => (*city_population, *budget_unit),
        _ => (None, None),
    };
    config.apply_overrides(ConfigOverrides {
        output_format: cli.output,
        city_population,
        standard_budget_unit: budget_unit,
    });
    init_tracing(&config);

    let format = config.output.format;
    match &cli.command {
        Commands::Block { ratio } => {
            let cell = ratio.as_deref().map(CellValue::parse_formula_arg);
            let block = standard_block(cell.as_ref())?;
            let shown_ratio = cell
                .as_ref()
                .and_then(CellValue::as_number)
                .unwrap_or(DEFAULT_TARGET_RATIO);
            print_block(shown_ratio, block, format)?;
        }
        Commands::Score { value, ratio } => {
            let report = ImpactReport::compute(*value, *ratio);
            print_impact(&report, format)?;
        }
        Commands::Verdict { score } => {
            let verdict = match score.as_deref() {
                Some(raw) => impact_verdict(&CellValue::parse_formula_arg(raw)),
                None => omitted_verdict(),
            };
            match format {
                OutputFormat::Json => println!("{}", render_json(&verdict)?),
                OutputFormat::Table | OutputFormat::Csv => println!("{verdict}"),
            }
        }
        Commands::Call { function, args } => {
            let function = CustomFunction::from_str(function)?;
            let args = args
                .iter()
                .map(|raw| CellValue::parse_formula_arg(raw))
                .collect::<Vec<_>>();
            let result = function.invoke(&args);
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    render_json(&CallOutput {
                        function,
                        args: &args,
                        result,
                    })?
                ),
                OutputFormat::Table | OutputFormat::Csv => println!("{result}"),
            }
        }
        Commands::Functions => match format {
            OutputFormat::Json => println!("{}", render_json(&CustomFunction::ALL)?),
            OutputFormat::Table | OutputFormat::Csv => println!("{}", render_functions_table()),
        },
        Commands::Stages => match format {
            OutputFormat::Json => {
                let stages = Stage::ALL
                    .iter()
                    .map(|stage| StageOutput {
                        stage: *stage,
                        lower_bound: Some(stage.lower_bound()).filter(|b| b.is_finite()),
                        title: stage.title(),
                        finding: stage.finding(),
                    })
                    .collect::<Vec<_>>();
                println!("{}", render_json(&stages)?);
            }
            OutputFormat::Table | OutputFormat::Csv => println!("{}", render_stages_table()),
        },
        Commands::Audit { csv, .. } => {
            let unit = config.audit.standard_budget_unit.ok_or_else(|| {
                anyhow!("--budget-unit (or audit.standard_budget_unit in config) is required")
            })?;
            let params = AuditParams::new(config.audit.city_population, unit)?;
            let rows = read_rows_from_path(csv)?;
            info!("auditing {} rows from {}", rows.len(), csv.display());
            let report = audit_rows(&rows, params);
            print_audit(&report, format)?;
        }
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let bind = format!("{host}:{port}");
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            return run_server(config, addr).await;
        }
        Commands::Config { init, show } => {
            if *init {
                Config::write_template(&config_path)?;
                println!("Wrote config template to {}", config_path.display());
            }
            if *show || !*init {
                println!("{}", render_json(&config)?);
            }
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_block(ratio: f64, block: f64, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_block_table(ratio, block)),
        OutputFormat::Json => println!(
            "{}",
            render_json(&BlockOutput {
                target_ratio: ratio,
                standard_block: block,
            })?
        ),
        OutputFormat::Csv => print!("{}", block_to_csv(ratio, block)?),
    }
    Ok(())
}

fn print_impact(report: &ImpactReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_impact_table(report)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => print!("{}", impact_to_csv(std::slice::from_ref(report))?),
    }
    Ok(())
}

fn print_audit(report: &AuditReport, format: OutputFormat) -> Result<()> {
    if report.findings.is_empty() {
        warn!("no auditable rows found");
    }
    match format {
        OutputFormat::Table => println!("{}", render_audit_table(report)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => print!("{}", audit_to_csv(report)?),
    }
    Ok(())
}

//! Umbrella Decision Core - belief update and decision engine
//!
//! The main entry point for ud-core, handling:
//! - Evaluating the umbrella decision for a forecast observation
//! - Value of information of the forecast
//! - Printing the decision network
//! - Model configuration, presets and JSON Schema export

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use ud_common::error::format_error_human;
use ud_common::{EvaluationId, OutputFormat, StructuredError, SCHEMA_VERSION};
use ud_config::validate::model_issues;
use ud_config::ValidationError;
use ud_core::config::{
    list_presets, load_config, load_model_file, ConfigOptions, Model, PresetName, ResolvedConfig,
};
use ud_core::decision::compute_voi;
use ud_core::evaluate::{evaluate, EvaluationInput};
use ud_core::exit_codes::ExitCode;
use ud_core::inference::ForecastObservation;
use ud_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogLevel, Stage,
};
use ud_core::network::DecisionNetwork;
use ud_core::output::{Envelope, EvaluateResponse, ModelProvenance, NetworkResponse, VoiResponse};
use ud_core::schema::{
    available_schemas, format_schema, generate_all_schemas, generate_schema, SchemaFormat,
};
use ud_core::log_event;

/// Umbrella Decision Core - should you take the umbrella?
#[derive(Parser)]
#[command(name = "ud-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Directory holding model.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model file (takes precedence over --config)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend whether to take the umbrella (default)
    Evaluate(EvaluateArgs),

    /// Value of consulting the forecast before deciding
    Voi(VoiArgs),

    /// Print the decision network
    Network(NetworkArgs),

    /// Model configuration
    Config(ConfigArgs),

    /// JSON Schema for output types
    Schema(SchemaArgs),

    /// Print version information
    Version,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Evaluate(_) => "evaluate",
            Commands::Voi(_) => "voi",
            Commands::Network(_) => "network",
            Commands::Config(_) => "config",
            Commands::Schema(_) => "schema",
            Commands::Version => "version",
        }
    }
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Per-run replacements for model values.
#[derive(Args, Debug, Default, Clone)]
struct ModelOverrides {
    /// Base model when no model file is found
    #[arg(long)]
    preset: Option<PresetName>,

    /// P(Rain) before the forecast, strictly between 0 and 1
    #[arg(long, allow_negative_numbers = true)]
    prior_rain: Option<f64>,

    /// P(Good forecast | Rain)
    #[arg(long = "p-good-rain", allow_negative_numbers = true)]
    p_good_given_rain: Option<f64>,

    /// P(Good forecast | Sunny)
    #[arg(long = "p-good-sunny", allow_negative_numbers = true)]
    p_good_given_sunny: Option<f64>,

    /// Utility of rain with the umbrella
    #[arg(long, allow_negative_numbers = true)]
    u_rain_umbrella: Option<f64>,

    /// Utility of rain without the umbrella
    #[arg(long, allow_negative_numbers = true)]
    u_rain_no_umbrella: Option<f64>,

    /// Utility of sun with the umbrella
    #[arg(long, allow_negative_numbers = true)]
    u_sunny_umbrella: Option<f64>,

    /// Utility of sun without the umbrella
    #[arg(long, allow_negative_numbers = true)]
    u_sunny_no_umbrella: Option<f64>,
}

impl ModelOverrides {
    /// Write every given flag into the model. Returns true if any was given.
    fn apply(&self, model: &mut Model) -> bool {
        let targets = [
            (self.prior_rain, &mut model.prior_rain),
            (
                self.p_good_given_rain,
                &mut model.forecast.p_good_given_rain,
            ),
            (
                self.p_good_given_sunny,
                &mut model.forecast.p_good_given_sunny,
            ),
            (self.u_rain_umbrella, &mut model.utilities.rain_umbrella),
            (
                self.u_rain_no_umbrella,
                &mut model.utilities.rain_no_umbrella,
            ),
            (self.u_sunny_umbrella, &mut model.utilities.sunny_umbrella),
            (
                self.u_sunny_no_umbrella,
                &mut model.utilities.sunny_no_umbrella,
            ),
        ];

        let mut overridden = false;
        for (value, slot) in targets {
            if let Some(value) = value {
                *slot = value;
                overridden = true;
            }
        }
        overridden
    }
}

#[derive(Args, Debug, Default)]
struct EvaluateArgs {
    /// What the forecast said
    #[arg(long, value_enum, default_value_t = ForecastObservation::None)]
    forecast: ForecastObservation,

    #[command(flatten)]
    overrides: ModelOverrides,
}

#[derive(Args, Debug)]
struct VoiArgs {
    #[command(flatten)]
    overrides: ModelOverrides,
}

#[derive(Args, Debug)]
struct NetworkArgs {
    /// Include the Forecast node
    #[arg(long)]
    forecast: bool,

    /// Print Graphviz DOT regardless of --format
    #[arg(long)]
    dot: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved model and where it came from
    Show {
        /// Base model when no model file is found
        #[arg(long)]
        preset: Option<PresetName>,
    },
    /// Validate a model file (default: the resolved one)
    Validate {
        /// Path to model.json
        path: Option<PathBuf>,
    },
    /// List built-in presets
    Presets,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name to print the schema for
    name: Option<String>,

    /// List available schema types
    #[arg(long)]
    list: bool,

    /// Print every schema
    #[arg(long)]
    all: bool,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,
}

/// State shared by every command of one invocation.
struct Invocation {
    global: GlobalOpts,
    evaluation_id: EvaluationId,
    ctx: LogContext,
}

type CommandResult = Result<ExitCode, ud_common::Error>;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::OkLeave,
                _ => ExitCode::ArgsError,
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    init_logging(&LogConfig::from_env(cli_level, None));

    let evaluation_id = EvaluationId::new();
    let ctx = LogContext::new(generate_run_id()).with_evaluation_id(evaluation_id.to_string());
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Evaluate(EvaluateArgs::default()));

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_STARTED,
        Stage::Init,
        "run started",
        command = command.name()
    );

    let inv = Invocation {
        global: cli.global,
        evaluation_id,
        ctx,
    };

    let result = match &command {
        Commands::Evaluate(args) => run_evaluate(&inv, args),
        Commands::Voi(args) => run_voi(&inv, args),
        Commands::Network(args) => run_network(&inv, args),
        Commands::Config(args) => run_config(&inv, args),
        Commands::Schema(args) => run_schema(&inv, args),
        Commands::Version => print_version(&inv),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => output_error(&inv, &err),
    };

    log_event!(
        inv.ctx,
        INFO,
        event_names::RUN_FINISHED,
        Stage::Render,
        "run finished",
        command = command.name(),
        exit_code = exit_code.as_i32()
    );

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Commands
// ============================================================================

fn config_options(global: &GlobalOpts, preset: Option<PresetName>) -> ConfigOptions {
    ConfigOptions {
        config_dir: global.config.clone(),
        model_path: global.model.clone(),
        preset,
    }
}

fn load(inv: &Invocation, preset: Option<PresetName>) -> Result<ResolvedConfig, ud_common::Error> {
    match load_config(&config_options(&inv.global, preset)) {
        Ok(config) => {
            match &config.location.path {
                Some(path) => log_event!(
                    inv.ctx,
                    DEBUG,
                    event_names::CONFIG_LOADED,
                    Stage::Config,
                    "model loaded",
                    path = %path.display(),
                    source = %config.location.source
                ),
                None => log_event!(
                    inv.ctx,
                    DEBUG,
                    event_names::CONFIG_DEFAULT_USED,
                    Stage::Config,
                    "no model file found, using preset",
                    preset = ?config.preset
                ),
            }
            Ok(config)
        }
        Err(err) => {
            log_event!(
                inv.ctx,
                INFO,
                event_names::CONFIG_ERROR,
                Stage::Config,
                "model could not be loaded",
                error = %err
            );
            Err(err.into())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ud_common::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn log_rendered(inv: &Invocation, payload: &'static str) {
    log_event!(
        inv.ctx,
        DEBUG,
        event_names::RENDER_WRITTEN,
        Stage::Render,
        "payload written",
        payload = payload,
        format = %inv.global.format
    );
}

fn run_evaluate(inv: &Invocation, args: &EvaluateArgs) -> CommandResult {
    let config = load(inv, args.overrides.preset)?;
    let mut model = config.model.clone();
    let overridden = args.overrides.apply(&mut model);

    let input = EvaluationInput::from_model(&model, args.forecast);
    let result = evaluate(&input).map_err(|err| {
        log_event!(
            inv.ctx,
            INFO,
            event_names::DECIDE_FAILED,
            Stage::Decide,
            "evaluation rejected",
            error = %err
        );
        ud_common::Error::from(err)
    })?;

    let response = EvaluateResponse {
        envelope: Envelope::new(inv.evaluation_id.clone()),
        model: ModelProvenance::from_config(&config, overridden),
        input,
        result,
    };

    match inv.global.format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Md => print!("{}", response.markdown()),
        OutputFormat::Summary => println!("{}", response.summary()),
        OutputFormat::Exitcode => {}
    }
    log_rendered(inv, "evaluate");

    Ok(ExitCode::from_recommendation(response.result.recommendation))
}

fn run_voi(inv: &Invocation, args: &VoiArgs) -> CommandResult {
    let config = load(inv, args.overrides.preset)?;
    let mut model = config.model.clone();
    let overridden = args.overrides.apply(&mut model);

    let input = EvaluationInput::from_model(&model, ForecastObservation::None);
    let analysis = compute_voi(input.prior, input.reliability, &input.utilities)?;

    let response = VoiResponse {
        envelope: Envelope::new(inv.evaluation_id.clone()),
        model: ModelProvenance::from_config(&config, overridden),
        input,
        analysis,
    };

    match inv.global.format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Md => print!("{}", response.markdown()),
        OutputFormat::Summary => println!("{}", response.summary()),
        OutputFormat::Exitcode => {}
    }
    log_rendered(inv, "voi");

    Ok(ExitCode::OkLeave)
}

fn run_network(inv: &Invocation, args: &NetworkArgs) -> CommandResult {
    let network = DecisionNetwork::new(args.forecast);

    if args.dot {
        print!("{}", network.to_dot());
        return Ok(ExitCode::OkLeave);
    }

    let response = NetworkResponse {
        envelope: Envelope::new(inv.evaluation_id.clone()),
        network,
    };

    match inv.global.format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Md => print!("{}", response.markdown()),
        OutputFormat::Summary => println!("{}", response.summary()),
        OutputFormat::Exitcode => {}
    }
    log_rendered(inv, "network");

    Ok(ExitCode::OkLeave)
}

fn run_config(inv: &Invocation, args: &ConfigArgs) -> CommandResult {
    match &args.command {
        ConfigCommands::Show { preset } => run_config_show(inv, *preset),
        ConfigCommands::Validate { path } => run_config_validate(inv, path.as_ref()),
        ConfigCommands::Presets => run_config_presets(inv),
    }
}

/// Display the resolved model (including the preset if no file was found).
fn run_config_show(inv: &Invocation, preset: Option<PresetName>) -> CommandResult {
    let config = load(inv, preset)?;
    let snapshot = config.snapshot();
    let id = &inv.evaluation_id;

    match inv.global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "evaluation_id": id,
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "source": {
                "kind": snapshot.source,
                "path": snapshot.path,
                "preset": config.preset,
                "hash": snapshot.hash,
            },
            "model": &config.model,
        }))?,
        OutputFormat::Summary => {
            let source = snapshot
                .path
                .clone()
                .or_else(|| config.preset.map(|p| format!("preset {}", p)))
                .unwrap_or_else(|| snapshot.source.clone());
            println!(
                "[{}] config: {} prior_rain={} hash={}",
                id,
                source,
                config.model.prior_rain,
                snapshot.short_id()
            );
        }
        OutputFormat::Exitcode => {}
        OutputFormat::Md => {
            println!("# ud-core config show");
            println!();
            match (&snapshot.path, config.preset) {
                (Some(path), _) => println!("Source: {} ({})", path, snapshot.source),
                (None, Some(preset)) => {
                    println!("Source: **preset `{}`** (no model.json found)", preset)
                }
                (None, None) => println!("Source: {}", snapshot.source),
            }
            println!("Hash: {}", snapshot.hash);
            println!("Schema version: {}", config.model.schema_version);
            println!();
            println!("| Parameter | Value |");
            println!("|-----------|------:|");
            println!("| prior_rain | {} |", config.model.prior_rain);
            println!(
                "| p_good_given_rain | {} |",
                config.model.forecast.p_good_given_rain
            );
            println!(
                "| p_good_given_sunny | {} |",
                config.model.forecast.p_good_given_sunny
            );
            for (name, value) in config.model.utilities.entries() {
                println!("| {} | {} |", name, value);
            }
            println!();
            println!("Evaluation: {}", id);
        }
    }

    Ok(ExitCode::OkLeave)
}

/// Validate a model file, reporting every problem rather than the first.
fn run_config_validate(inv: &Invocation, path: Option<&PathBuf>) -> CommandResult {
    let id = &inv.evaluation_id;
    let path = match path {
        Some(p) => Some(p.clone()),
        None => ud_config::resolve_model(inv.global.model.as_deref(), inv.global.config.as_deref())
            .path,
    };

    let Some(path) = path else {
        match inv.global.format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "evaluation_id": id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "valid",
                "path": null,
                "using_defaults": true,
            }))?,
            OutputFormat::Summary => println!("[{}] config validate: OK (built-in defaults)", id),
            OutputFormat::Exitcode => {}
            OutputFormat::Md => {
                println!("# Model Validation");
                println!();
                println!("Status: ✓ Valid");
                println!("No model.json found; built-in defaults are in use.");
            }
        }
        return Ok(ExitCode::OkLeave);
    };

    let (model, _content) = load_model_file(&path).map_err(ud_common::Error::from)?;
    let issues = model_issues(&model);
    let valid = issues.is_empty();

    match inv.global.format {
        OutputFormat::Json => {
            let issues_json: Vec<_> = issues
                .iter()
                .map(|issue| {
                    serde_json::json!({
                        "code": issue.code(),
                        "message": issue.to_string(),
                    })
                })
                .collect();
            print_json(&serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "evaluation_id": id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": if valid { "valid" } else { "invalid" },
                "path": path.display().to_string(),
                "using_defaults": false,
                "issues": issues_json,
            }))?
        }
        OutputFormat::Summary => {
            if valid {
                println!("[{}] config validate: OK {}", id, path.display());
            } else {
                println!(
                    "[{}] config validate: {} issue(s) in {}",
                    id,
                    issues.len(),
                    path.display()
                );
            }
        }
        OutputFormat::Exitcode => {}
        OutputFormat::Md => {
            println!("# Model Validation");
            println!();
            println!("File: {}", path.display());
            if valid {
                println!("Status: ✓ Valid");
            } else {
                println!("Status: ✗ Invalid");
                println!();
                for issue in &issues {
                    println!("- {}", issue);
                }
            }
        }
    }

    Ok(match issues.first() {
        None => ExitCode::OkLeave,
        Some(ValidationError::VersionMismatch { .. }) => ExitCode::VersionError,
        Some(_) => ExitCode::ConfigError,
    })
}

fn run_config_presets(inv: &Invocation) -> CommandResult {
    let presets = list_presets();

    match inv.global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "evaluation_id": &inv.evaluation_id,
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "presets": presets,
        }))?,
        OutputFormat::Summary => {
            let names: Vec<String> = presets.iter().map(|p| p.name.to_string()).collect();
            println!("[{}] presets: {}", inv.evaluation_id, names.join(", "));
        }
        OutputFormat::Exitcode => {}
        OutputFormat::Md => {
            println!("# Presets");
            println!();
            println!("| Name | Prior | P(Good given Rain) | P(Good given Sunny) | Description |");
            println!("|------|------:|-------------------:|--------------------:|-------------|");
            for p in &presets {
                println!(
                    "| {} | {} | {} | {} | {} |",
                    p.name,
                    p.prior_rain,
                    p.forecast.p_good_given_rain,
                    p.forecast.p_good_given_sunny,
                    p.description
                );
            }
        }
    }

    Ok(ExitCode::OkLeave)
}

fn run_schema(inv: &Invocation, args: &SchemaArgs) -> CommandResult {
    let format = if args.compact {
        SchemaFormat::JsonCompact
    } else {
        SchemaFormat::Json
    };

    if args.all {
        let all = serde_json::to_value(generate_all_schemas())?;
        println!("{}", format_schema(&all, format));
        return Ok(ExitCode::OkLeave);
    }

    match (&args.name, args.list) {
        (Some(name), false) => match generate_schema(name) {
            Some(schema) => {
                println!("{}", format_schema(&schema, format));
                Ok(ExitCode::OkLeave)
            }
            None => {
                eprintln!(
                    "Unknown schema type '{}'. Run 'ud-core schema --list' to see available types.",
                    name
                );
                Ok(ExitCode::ArgsError)
            }
        },
        _ => {
            let schemas = available_schemas();
            match inv.global.format {
                OutputFormat::Json => {
                    let list: Vec<_> = schemas
                        .iter()
                        .map(|(name, desc)| serde_json::json!({"name": name, "description": desc}))
                        .collect();
                    print_json(&serde_json::json!({ "schemas": list }))?;
                }
                OutputFormat::Exitcode => {}
                _ => {
                    for (name, desc) in schemas {
                        println!("{:<22} {}", name, desc);
                    }
                }
            }
            Ok(ExitCode::OkLeave)
        }
    }
}

fn print_version(inv: &Invocation) -> CommandResult {
    match inv.global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "ud_core_version": env!("CARGO_PKG_VERSION"),
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        }))?,
        OutputFormat::Exitcode => {}
        _ => {
            println!("ud-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
    Ok(ExitCode::OkLeave)
}

/// Report a failed command on stderr and pick its exit code.
fn output_error(inv: &Invocation, err: &ud_common::Error) -> ExitCode {
    let exit_code = ExitCode::from_error(err);
    if exit_code == ExitCode::InternalError {
        log_event!(
            inv.ctx,
            ERROR,
            event_names::INTERNAL_ERROR,
            Stage::Render,
            "internal error",
            error = %err
        );
    }

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "evaluation_id": &inv.evaluation_id,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "status": "error",
        "exit_code": exit_code.code_name(),
        "error": StructuredError::from(err),
    });

    match inv.global.format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&response)
                .unwrap_or_else(|_| StructuredError::from(err).to_json());
            eprintln!("{}", text);
        }
        OutputFormat::Summary => {
            eprintln!("[{}] error: {}", inv.evaluation_id, err);
        }
        OutputFormat::Exitcode => {}
        OutputFormat::Md => {
            let use_color = !inv.global.no_color && std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(err, use_color));
        }
    }

    exit_code
}

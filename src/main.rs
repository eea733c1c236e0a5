use anyhow::Result;
use clap::Parser;
use dashboard::{parse_status_script, DashboardConfig, DashboardOrchestrator};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Connection dashboard controller with deprecation notice checks")]
#[command(version)]
#[command(long_about = "Drives the connection dashboard from the service's lifecycle status: \
action button, spinner and pager state, plus a one-time deprecation notice check each time \
the connection becomes active. Runs against a simulated service.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "dashboard.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Replay statuses and exit
    #[arg(
        long,
        value_name = "STATUSES",
        help = "Comma separated statuses to replay, e.g. stopped,starting,started"
    )]
    script: Option<String>,

    /// Drive the action button from the keyboard
    #[arg(long, help = "Press SPACE to connect/disconnect, q to quit")]
    keyboard: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    init_logging(&args)?;

    info!("Starting dashboard v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let config = match DashboardConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if args.validate_config {
        match config.validate() {
            Ok(()) => {
                info!("Configuration validation successful");
                println!("✓ Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("Configuration validation failed: {}", e);
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    let mut orchestrator = DashboardOrchestrator::new(config).await.map_err(|e| {
        error!("Failed to create dashboard: {}", e);
        e
    })?;

    if let Some(script) = &args.script {
        let statuses = parse_status_script(script).map_err(anyhow::Error::msg)?;
        let stats = orchestrator.replay(&statuses).await?;
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    orchestrator.set_keyboard_enabled(args.keyboard);
    orchestrator.initialize().await?;
    orchestrator.start().await.map_err(|e| {
        error!("Failed to start dashboard: {}", e);
        e
    })?;

    let exit_code = orchestrator.run().await.map_err(|e| {
        error!("Dashboard error during execution: {}", e);
        e
    })?;

    info!("Dashboard exited with code: {}", exit_code);
    std::process::exit(exit_code);
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dashboard={}", log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# Dashboard Configuration File");
    println!("# Every key can be overridden with DASHBOARD_<SECTION>__<KEY>");
    println!();
    println!("{}", DashboardConfig::default().to_toml()?);
    Ok(())
}

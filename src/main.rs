use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use log::{error, info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use waypoint::core::config::{DeferredLog, load_config, resolve};
use waypoint::nav::{NavigationGateway, NavigationOptions, ScriptStep, StackNavigator};

const DEFAULT_ROUTES: &str = "shell,home,settings,details,compose";

#[derive(Parser)]
#[command(name = "waypoint", about = "Replay a navigation script against an in-memory page stack")]
struct Args {
    /// Log level (overrides config and WAYPOINT_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Comma-separated list of known routes
    #[arg(long, default_value = DEFAULT_ROUTES)]
    routes: String,

    /// Steps: push:<uri>, modal:<uri>, tabs:<container>:<a,b>, back, root
    #[arg(required = true)]
    steps: Vec<ScriptStep>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Buffered until the configured log file is known.
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let startup_log = DeferredLog::default();
    let _ = WriteLogger::init(LevelFilter::Trace, log_config, startup_log.clone());
    log::set_max_level(LevelFilter::Info);

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            warn!("{}, using defaults", e);
            eprintln!("{e}, using defaults");
            Default::default()
        }
    };
    let resolved = resolve(&config, args.log_level.as_deref());

    if let Err(e) = startup_log.attach(File::create(&resolved.log_file).ok()) {
        eprintln!("Could not write {}: {e}", resolved.log_file);
    }
    log::set_max_level(resolved.log_level);

    info!("Waypoint starting with {} steps", args.steps.len());

    let routes = args
        .routes
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty());
    let navigator = Arc::new(StackNavigator::new(routes));
    let gateway = NavigationGateway::with_options(navigator.clone(), NavigationOptions::from(&resolved));

    let mut failures = 0;
    for step in &args.steps {
        match step.run(&gateway).await {
            Ok(()) => println!("ok    {step}"),
            Err(e) => {
                failures += 1;
                error!("Step {} failed: {}", step, e);
                println!("FAIL  {step}: {e}");
            }
        }
    }

    println!();
    println!("stack (root first):");
    for page in navigator.stack() {
        let mut line = format!("  {}", page.route);
        if page.modal {
            line.push_str(" [modal]");
        }
        if !page.tabs.is_empty() {
            line.push_str(&format!(" tabs={}", page.tabs.join(",")));
        }
        if !page.params.is_empty() {
            let params: Vec<String> = page.params.iter().map(|(k, v)| format!("{k}={v}")).collect();
            line.push_str(&format!(" params={}", params.join("&")));
        }
        println!("{line}");
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

//! Filewarden command-line entry point.

use filewarden::core::config::Config;
use filewarden::core::error::Result;
use filewarden::scanner::FileScanner;
use filewarden::sweeper::{ActionLog, FlaggedNames, ProcessSweeper, SystemProcesses};
use filewarden::ui::cli::{Cli, Commands, ConfigAction, OutputFormat};
use filewarden::utils::logging::{init_logging, LogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = Config::load_or_default();
    config.validate()?;

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::from_level(&config.logging.log_level)
    };
    init_logging(log_config);

    log::debug!("Filewarden v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Commands::Scan { paths }) => run_scan(&config, paths, cli.format),
        Some(Commands::Sweep { dry_run }) => run_sweep(&config, dry_run, cli.format),
        Some(Commands::Config { action }) => run_config(action, &config),
        Some(Commands::Info) => run_info(&config),
        None => {
            println!("Filewarden - file scanning and process sweeps");
            println!();
            println!("Use --help for usage information");
            println!();
            println!("Quick start:");
            println!("  filewarden scan <path>...    Scan files");
            println!("  filewarden sweep --dry-run   List flagged processes");
            println!("  filewarden sweep             Terminate flagged processes");
            println!("  filewarden config show       View configuration");
            Ok(())
        }
    }
}

/// Scan each path; a failed file is reported and does not stop the run.
fn run_scan(config: &Config, paths: Vec<std::path::PathBuf>, format: OutputFormat) -> Result<()> {
    let scanner = FileScanner::from_config(config)?;
    log::info!(
        "Scanning {} path(s), classifier {}",
        paths.len(),
        if scanner.classifier_available() {
            "enabled"
        } else {
            "disabled"
        }
    );

    let mut reports = Vec::new();
    let mut failures = 0usize;

    for path in &paths {
        match scanner.scan(path) {
            Ok(report) => reports.push(report),
            Err(e) => {
                failures += 1;
                eprintln!("{}: {}", path.display(), e);
                if !e.is_recoverable() {
                    return Err(e);
                }
            }
        }
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Text => {
            for report in &reports {
                println!("{}", report.summary());
            }
            let blocked = reports.iter().filter(|r| r.verdict.is_blocked()).count();
            println!();
            println!(
                "{} scanned, {} blocked, {} failed",
                reports.len(),
                blocked,
                failures
            );
        }
    }

    Ok(())
}

/// Run a process sweep, or list flagged processes when dry-run is set.
fn run_sweep(config: &Config, dry_run: bool, format: OutputFormat) -> Result<()> {
    let sweeper = ProcessSweeper::new(
        Box::new(SystemProcesses::new()),
        FlaggedNames::new(config.sweep.flagged_names.clone()),
    );

    if dry_run {
        let flagged = sweeper.flagged_processes()?;
        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&flagged_json(&flagged))?);
            }
            OutputFormat::Text => {
                if flagged.is_empty() {
                    println!("No flagged processes.");
                } else {
                    for p in &flagged {
                        println!("{:>8}  {}", p.pid, p.name);
                    }
                }
            }
        }
        return Ok(());
    }

    let report = sweeper.sweep()?;

    let action_log = ActionLog::open(config.sweep.action_log_path())?;
    for outcome in &report.outcomes {
        if outcome.status.is_terminated() {
            action_log.record_termination(&outcome.name)?;
        }
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("Sweep {} complete", report.sweep_id);
            println!("Processes seen:  {}", report.processes_seen);
            println!("Flagged:         {}", report.outcomes.len());
            println!("Terminated:      {}", report.terminated_count());
            for outcome in &report.outcomes {
                println!("  {:>8}  {}  [{}]", outcome.pid, outcome.name, outcome.status);
            }
        }
    }

    Ok(())
}

fn flagged_json(flagged: &[filewarden::sweeper::ProcessInfo]) -> Vec<serde_json::Value> {
    flagged
        .iter()
        .map(|p| serde_json::json!({ "pid": p.pid, "name": p.name }))
        .collect()
}

/// Handle configuration commands.
fn run_config(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigAction::Reset { yes: _ } => {
            log::info!("Resetting configuration to defaults...");
            let default_config = Config::default();
            default_config.save(&Config::default_config_path())?;
            println!("Configuration reset to defaults.");
        }
        ConfigAction::Path => {
            println!("{}", Config::default_config_path().display());
        }
    }
    Ok(())
}

/// Show application information.
fn run_info(config: &Config) -> Result<()> {
    println!("Filewarden - file scanning and process sweeps");
    println!();
    println!("Version:          {}", env!("CARGO_PKG_VERSION"));
    println!("Config Path:      {}", Config::default_config_path().display());
    println!("Data Directory:   {}", Config::data_dir().display());
    println!("Quarantine Path:  {}", config.quarantine.dir().display());
    println!("Action Log:       {}", config.sweep.action_log_path().display());
    println!();
    println!("Detection Settings:");
    println!(
        "  Denylist:       {}",
        config
            .detection
            .denylist_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    );
    println!(
        "  Classifier:     {}",
        config
            .detection
            .model_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "disabled".to_string())
    );
    println!("  Threshold:      {}", config.detection.threat_threshold);
    println!();
    println!("Sweep Settings:");
    println!("  Flagged Names:  {}", config.sweep.flagged_names.join(", "));
    Ok(())
}

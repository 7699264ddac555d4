//! Application orchestrator.
//! Loads and merges config, initializes logging, installs the signal handler,
//! then trashes every path and reports per-path results.

use anyhow::{anyhow, Context, Result};
use std::env;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use trashcan::adapters::MacosMv;
use trashcan::cli::Args;
use trashcan::config::CONFIG_ENV;
use trashcan::output as out;
use trashcan::trash::home_dir;
use trashcan::{
    create_template_config, default_config_path, load_config, shutdown, Config, Dispatcher, Outcome,
    TrashStore,
};

use crate::logging::init_tracing;

/// Exit status when at least one path failed.
const EXIT_PARTIAL: u8 = 1;

/// Run the CLI application.
pub fn run(args: Args) -> Result<ExitCode> {
    // Handle --print-config / --init-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(ExitCode::SUCCESS);
    }
    if args.init_config {
        let path = default_config_path().context("could not determine a config path; set TRASH_CONFIG")?;
        create_template_config(&path)?;
        out::print_success(&format!("A template config was written to: {}", path.display()));
        return Ok(ExitCode::SUCCESS);
    }

    let (mut cfg, cfg_source) = load_config()?;
    args.apply_overrides(&mut cfg);
    cfg.validate()?;

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    // Guard is dropped on SIGINT to flush file logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        if let Err(e) = ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; stopping after the current path...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        }) {
            debug!(error = %e, "could not install signal handler");
        }
    }

    debug!(
        config = ?cfg_source.as_ref().map(|p| p.display().to_string()),
        strategy = %cfg.strategy,
        paths = args.paths.len(),
        "starting"
    );

    let dispatcher = build_dispatcher(&cfg)?;
    let report = dispatcher.trash_all(args.paths.as_slice());

    for (path, outcome) in &report.succeeded {
        match outcome {
            Outcome::Planned { strategy, destination, .. } => match destination {
                Some(dest) => out::print_user(&format!(
                    "would trash '{}' -> '{}'",
                    path.display(),
                    dest.display()
                )),
                None => out::print_user(&format!("would trash '{}' via {strategy}", path.display())),
            },
            Outcome::Indexed(entry) if args.verbose > 0 => out::print_user(&format!(
                "trashed '{}' -> '{}'",
                path.display(),
                entry.trashed_file_path.display()
            )),
            Outcome::Moved { strategy, .. } if args.verbose > 0 => {
                out::print_user(&format!("trashed '{}' via {strategy}", path.display()))
            }
            _ => {}
        }
    }
    for (path, err) in &report.failed {
        out::print_error(&format!("cannot trash '{}': {}", path.display(), err));
    }

    let code = if report.success() {
        info!(count = report.succeeded.len(), "done");
        ExitCode::SUCCESS
    } else {
        warn!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "some paths were not trashed"
        );
        ExitCode::from(EXIT_PARTIAL)
    };

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }
    Ok(code)
}

/// Store plus one adapter per platform strategy.
fn build_dispatcher(cfg: &Config) -> Result<Dispatcher> {
    let layout = cfg
        .trash_layout()
        .ok_or_else(|| anyhow!("cannot locate the trash: set XDG_DATA_HOME or HOME"))?;
    let store = TrashStore::new(layout).preserve_metadata(cfg.preserve_metadata);

    let home = home_dir();
    let dispatcher = Dispatcher::new(cfg.strategy.clone(), store).dry_run(cfg.dry_run);
    let mut dispatcher = match &home {
        Some(h) => dispatcher.with_default_adapters(h),
        None => dispatcher,
    };

    // Replace the stock macos_mv so it honours the configured dir and metadata setting.
    let macos_dir = home
        .as_deref()
        .map(|h| cfg.macos_trash_dir_or(h))
        .or_else(|| cfg.macos_trash_dir.clone());
    if let Some(dir) = macos_dir {
        dispatcher =
            dispatcher.with_adapter(Box::new(MacosMv::new(dir).preserve_metadata(cfg.preserve_metadata)));
    }
    Ok(dispatcher)
}

fn print_config_location() {
    if let Some(p) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {}\n", p.to_string_lossy()));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default trashcan config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run with --init-config to create a template.");
            }
        }
        None => out::print_error("Could not determine a default config path; set TRASH_CONFIG."),
    }
}

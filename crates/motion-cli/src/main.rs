//! `motion-cli` – the `motionstate` shell.
//!
//! Runs the full motion stack against a simulated engine:
//!
//! 1. Loads `~/.motionstate/config.toml`, writing defaults on first run.
//! 2. Starts a [`MotionSession`] and an ingestion listener on a Tokio runtime.
//! 3. Drives simulated walkers on a background thread that publishes update
//!    notifications.
//! 4. Drops the user into an **interactive REPL** with slash-commands
//!    (`/devices`, `/show`, `/json`, `/inactive`, `/help`).
//! 5. Intercepts **Ctrl-C** to stop the simulation and exit.

mod config;
mod repl;
mod walkers;

use colored::Colorize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, warn};

use motion_runtime::{MotionSession, NotificationBus, init_tracing};

fn main() {
    let _telemetry = init_tracing("motionstate");

    print_banner();

    // ── Shared shutdown flag ──────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – stopping …".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler");
    }

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            match config::save(&config::Config::default()) {
                Ok(()) => println!(
                    "  {} Default config written to {}",
                    "✓".green().bold(),
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => println!("{}: {}", "Error saving config".red(), e),
            }
            config::defaults_with_env()
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::defaults_with_env()
        }
    };

    // ── Runtime & session ─────────────────────────────────────────────────
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to start Tokio runtime");
            return;
        }
    };

    let walkers = walkers::spawn_walkers(&cfg.current_device, cfg.sim_devices);
    let engine = Arc::new(walkers::build_engine(&cfg.current_device, &walkers));
    let session = MotionSession::new(engine.clone());
    let bus = NotificationBus::new(cfg.notification_capacity.max(1));
    let listener = {
        let _enter = rt.enter();
        session.listen(&bus)
    };

    let driver = match walkers::run_driver(
        engine,
        bus.clone(),
        walkers,
        Duration::from_millis(cfg.sim_update_rate_ms.max(1)),
        shutdown.clone(),
    ) {
        Ok(handle) => Some(handle),
        Err(e) => {
            error!(error = %e, "failed to start simulated engine");
            None
        }
    };

    println!(
        "  Simulating {} device(s) every {} ms; current device is {}.",
        (cfg.sim_devices + 1).to_string().bold(),
        cfg.sim_update_rate_ms,
        cfg.current_device.bold()
    );
    println!(
        "  Type {} for a list of commands.\n",
        "/help".bold().cyan()
    );

    // ── Interactive REPL ──────────────────────────────────────────────────
    repl::run(shutdown.clone(), session.query().clone(), &cfg);

    // ── Teardown ──────────────────────────────────────────────────────────
    shutdown.store(true, Ordering::SeqCst);
    if let Some(driver) = driver
        && driver.join().is_err()
    {
        warn!("simulated engine thread panicked");
    }
    drop(bus);
    if let Err(e) = rt.block_on(async { tokio::time::timeout(Duration::from_secs(1), listener).await }) {
        warn!(error = %e, "ingestion listener did not stop in time");
    }
    session.reset();
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!(
        "  {} {}",
        "MotionState".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Device motion & location state shell");
    println!();
}

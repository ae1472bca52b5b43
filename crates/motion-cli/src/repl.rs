//! REPL for the `motionstate` shell.
//!
//! Supported slash-commands:
//!   /devices      – table of every device seen this session
//!   /show [id]    – all attributes of one device (current device by default)
//!   /json [id]    – the same, as JSON
//!   /inactive     – devices with no update within `inactive_after_secs`
//!   /help         – show this list
//!   /quit | /exit – exit the shell

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use motion_runtime::{DeviceView, MotionQuery};
use motion_types::LocationStatus;

use crate::config::Config;

/// Entry point for the interactive REPL.
///
/// `shutdown` is polled each iteration; when set the REPL exits cleanly.
pub fn run(shutdown: Arc<AtomicBool>, query: MotionQuery, cfg: &Config) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", "motionstate>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            continue;
        };
        let arg = words.next();

        match cmd {
            "/help" => cmd_help(),
            "/devices" => cmd_devices(&query),
            "/show" => cmd_show(&query, arg),
            "/json" => cmd_json(&query, arg),
            "/inactive" => cmd_inactive(&query, Duration::from_secs(cfg.inactive_after_secs)),
            "/quit" | "/exit" => {
                println!("{}", "Goodbye.".green());
                shutdown.store(true, Ordering::SeqCst);
                break;
            }
            other => {
                println!(
                    "{} '{}'. Type {} for available commands.",
                    "Unknown command:".red(),
                    other.yellow(),
                    "/help".bold()
                );
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_help() {
    println!();
    println!("{}", "MotionState Commands".bold().underline());
    println!("  {}    – list every device seen", "/devices".bold().cyan());
    println!("  {}  – attributes of a device (default: current)", "/show [id]".bold().cyan());
    println!("  {}  – the same as JSON", "/json [id]".bold().cyan());
    println!("  {}   – devices that stopped reporting", "/inactive".bold().cyan());
    println!("  {}  – exit the shell", "/quit  /exit".bold().cyan());
    println!();
}

fn cmd_devices(query: &MotionQuery) {
    let mut ids = query.device_ids();
    if ids.is_empty() {
        println!("  {}", "No devices reported yet.".dimmed());
        return;
    }
    ids.sort();
    let current = query.current_device_id();

    println!(
        "  {:<2}{:<16}{:<18}{:<14}{:>10}",
        "", "ID".bold(), "STATUS".bold(), "MOTION".bold(), "UPDATED".bold()
    );
    for id in &ids {
        let Some(view) = query.snapshot(Some(id.as_str())) else {
            continue;
        };
        let marker = if current.as_ref() == Some(id) { "▶" } else { " " };
        println!(
            "  {:<2}{:<16}{:<18}{:<14}{:>9.1}s",
            marker.green(),
            id.as_str(),
            status_label(view.location_status),
            format!("{:?}", view.primary_motion),
            view.timestamp
        );
    }
}

fn cmd_show(query: &MotionQuery, id: Option<&str>) {
    let Some(view) = query.snapshot(id) else {
        print_unknown(query, id);
        return;
    };
    print_view(&view);
}

fn cmd_json(query: &MotionQuery, id: Option<&str>) {
    let Some(view) = query.snapshot(id) else {
        print_unknown(query, id);
        return;
    };
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("{}: {}", "Serialization error".red(), e),
    }
}

fn cmd_inactive(query: &MotionQuery, max_age: Duration) {
    let mut ids = query.inactive_devices(max_age);
    if ids.is_empty() {
        println!(
            "  {} every device reported within {}s",
            "✓".green(),
            max_age.as_secs()
        );
        return;
    }
    ids.sort();
    println!("{}", "Inactive devices".bold().underline());
    for id in ids {
        println!(
            "  {} {} (last update at {:.1}s)",
            "•".yellow(),
            id.as_str().bold(),
            query.timestamp(Some(id.as_str()))
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn status_label(status: LocationStatus) -> String {
    let label = format!("{status:?}");
    match status {
        LocationStatus::Uninitialized | LocationStatus::Invalid => label.yellow().to_string(),
        _ => label.green().to_string(),
    }
}

fn print_unknown(query: &MotionQuery, id: Option<&str>) {
    match query.resolve_id(id) {
        Some(id) => println!("{} '{}'", "No data for device".red(), id.as_str().yellow()),
        None => println!("{}", "Current device is not known yet.".red()),
    }
}

fn print_view(v: &DeviceView) {
    println!();
    println!("{} {}", v.device_id.as_str().bold().underline(), v.device_name.dimmed());
    println!("  status       : {}", status_label(v.location_status));
    println!(
        "  position     : ({:.2}, {:.2}, {:.2}) ± ({:.2}, {:.2})",
        v.local_position.x, v.local_position.y, v.local_position.z, v.uncertainty.x, v.uncertainty.y
    );
    match (v.global_location, v.global_heading) {
        (Some(g), Some(h)) => println!(
            "  global       : {:.6}, {:.6} @ {:.1} m, heading {:.1}°",
            g.latitude, g.longitude, g.altitude, h
        ),
        _ => println!("  global       : {}", "no fix".dimmed()),
    }
    println!("  local heading: {:.1}°", v.local_heading);
    println!(
        "  orientation  : x {:.3} y {:.3} z {:.3} w {:.3}",
        v.orientation.x, v.orientation.y, v.orientation.z, v.orientation.w
    );
    println!(
        "  attitude     : roll {:.1} pitch {:.1} yaw {:.1}",
        v.attitude.roll, v.attitude.pitch, v.attitude.yaw
    );
    println!(
        "  motion       : {:?} / {:?}, {:.2} steps/s",
        v.primary_motion, v.secondary_motion, v.step_frequency
    );
    println!(
        "  vertical     : {:?} ({:?})",
        v.vertical_direction, v.vertical_motion_type
    );
    println!("  updated at   : {:.2}s", v.timestamp);
    println!();
}

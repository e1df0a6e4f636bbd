//! CLI command definitions for prefab-estimate
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod run;

use crate::model::{Addon, Choice, WindowSpec, WindowType};
use crate::render::OutputFormat;
use crate::store::EditValue;
use clap::{Args, Parser, Subcommand};

/// Prefab house estimate builder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    /// Pricing service URL (overrides config)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Port for the session API (overrides config)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the default configuration tree as JSON
    Defaults,

    /// List input fields with their kind, options and visibility
    Fields(EditArgs),

    /// Apply edits and print the normalized request payload
    Payload(EditArgs),

    /// Apply edits, submit to the pricing service and print the estimate
    Submit(SubmitArgs),

    /// Run the session API
    Serve,
}

/// Edits applied in order to a fresh configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    /// Field assignment, e.g. `--set house.length_m=8` (repeatable)
    #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_assignment)]
    pub sets: Vec<(String, EditValue)>,

    /// Addon line, e.g. `--addon veranda_glass:2` (repeatable)
    #[arg(long = "addon", value_name = "CODE[:QTY]", value_parser = parse_addon)]
    pub addons: Vec<Addon>,

    /// Window line, e.g. `--window 120x140:povorot:2:dc` (repeatable)
    #[arg(long = "window", value_name = "WxH:TYPE[:QTY][:dc][:lam]", value_parser = parse_window)]
    pub windows: Vec<WindowSpec>,
}

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub edits: EditArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}

/// Parse `PATH=VALUE`. The value is kept as text and coerced by the store.
pub fn parse_assignment(s: &str) -> Result<(String, EditValue), String> {
    let (path, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got {:?}", s))?;
    let path = path.trim();
    if path.is_empty() {
        return Err(format!("missing field path in {:?}", s));
    }
    Ok((path.to_string(), EditValue::Text(value.to_string())))
}

fn parse_quantity(s: Option<&str>) -> Result<u32, String> {
    match s {
        None => Ok(1),
        Some(q) => q
            .parse::<u32>()
            .map_err(|_| format!("invalid quantity {:?}", q)),
    }
}

/// Parse `CODE[:QTY]`.
pub fn parse_addon(s: &str) -> Result<Addon, String> {
    let mut parts = s.splitn(2, ':');
    let code = parts.next().unwrap_or_default().trim();
    if code.is_empty() {
        return Err(format!("missing addon code in {:?}", s));
    }
    Ok(Addon {
        code: code.to_string(),
        quantity: parse_quantity(parts.next())?,
    })
}

/// Parse `WIDTHxHEIGHT:TYPE[:QTY][:dc][:lam]`, sizes in centimetres.
///
/// After the type, a number is the quantity, `dc` marks a dual-chamber
/// unit and `lam` a laminated frame, in any order.
pub fn parse_window(s: &str) -> Result<WindowSpec, String> {
    let mut parts = s.split(':');
    let size = parts.next().unwrap_or_default();
    let (width, height) = size
        .split_once(['x', 'х'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", size))?;
    let dimension = |d: &str| {
        d.trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid window dimension {:?}", d))
    };

    let kind = parts
        .next()
        .ok_or_else(|| format!("missing window type in {:?}", s))?;
    let kind = WindowType::parse(kind).ok_or_else(|| {
        format!(
            "unknown window type {:?}, expected one of {}",
            kind,
            WindowType::OPTIONS.join(", ")
        )
    })?;

    let mut window = WindowSpec {
        width_cm: dimension(width)?,
        height_cm: dimension(height)?,
        kind,
        quantity: 1,
        dual_chamber: false,
        laminated: false,
    };
    let mut quantity_seen = false;
    for flag in parts {
        match flag.trim() {
            "dc" => window.dual_chamber = true,
            "lam" => window.laminated = true,
            q if !quantity_seen && q.starts_with(|c: char| c.is_ascii_digit()) => {
                window.quantity = parse_quantity(Some(q))?;
                quantity_seen = true;
            }
            other => return Err(format!("unknown window flag {:?} in {:?}", other, s)),
        }
    }
    Ok(window)
}

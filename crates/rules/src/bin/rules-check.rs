//! rules-check — inspect a stored rule document against appointments.
//!
//! Validates the document, reports findings, then evaluates every
//! appointment and prints the matching ones. Exits non-zero when
//! validation finds blocking errors.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use herald_core::Appointment;
use herald_rules::evaluator::select_matching;
use herald_rules::schema::RuleDocument;
use herald_rules::validation::validate_document;

// ── CLI ─────────────────────────────────────────────────────────────

/// Validate a rule document and list the appointments it matches.
#[derive(Parser, Debug)]
#[command(name = "rules-check", version, about)]
struct Cli {
    /// Path to the rule document JSON.
    #[arg(long, env = "RULES_FILE")]
    rules: PathBuf,

    /// Path to a JSON array of appointments.
    #[arg(long, env = "APPOINTMENTS_FILE")]
    appointments: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.rules)
        .with_context(|| format!("reading {}", cli.rules.display()))?;
    let doc: RuleDocument =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", cli.rules.display()))?;

    let report = validate_document(&doc);
    for issue in &report.warnings {
        println!("warning: {}: {}", issue.path, issue.message);
    }
    for issue in &report.errors {
        println!("error: {}: {}", issue.path, issue.message);
    }
    if !report.valid {
        return Ok(ExitCode::FAILURE);
    }

    let appointments_file = match cli.appointments {
        Some(path) => path,
        None => {
            println!("document ok (id {})", doc.id);
            return Ok(ExitCode::SUCCESS);
        }
    };

    let raw = fs::read_to_string(&appointments_file)
        .with_context(|| format!("reading {}", appointments_file.display()))?;
    let appointments: Vec<Appointment> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", appointments_file.display()))?;

    let matching = select_matching(&doc.rule, &appointments);
    info!(
        total = appointments.len(),
        matching = matching.len(),
        "evaluation finished"
    );
    for appointment in matching {
        println!("{}\t{}", appointment.id, appointment.title);
    }
    Ok(ExitCode::SUCCESS)
}

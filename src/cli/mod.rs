//! CLI command handlers
//!
//! Bridges clap argument parsing with the ledger. The ledger lives in memory
//! only, so the binary drives it from command scripts.

pub mod script;

use std::path::PathBuf;

use clap::Subcommand;

use crate::audit::AuditLogger;
use crate::config::{LedgerPaths, Settings};
use crate::display::{format_account_table, format_budget_table, format_transaction_page};
use crate::error::LedgerResult;
use crate::services::query::progress_of;
use crate::Ledger;

pub use script::{apply_step, replay, ReplayReport, Script, ScriptAmount, Step};

/// Top-level subcommands of the `ledger` binary
#[derive(Subcommand)]
pub enum Commands {
    /// Apply a YAML or JSON command script to a fresh ledger
    Replay {
        /// Path to the script (.yaml, .yml or .json)
        script: PathBuf,
        /// Stop at the first rejected step and exit with an error
        #[arg(long)]
        strict: bool,
        /// Write every committed command to the audit log
        #[arg(long)]
        audit: bool,
    },

    /// Show current configuration and paths
    Config,
}

/// Handle a replay command
pub fn handle_replay(
    paths: &LedgerPaths,
    settings: &Settings,
    script_path: PathBuf,
    strict: bool,
    audit: bool,
) -> LedgerResult<()> {
    let script = Script::load(&script_path)?;

    let mut ledger = Ledger::new();
    if audit || settings.audit_enabled {
        paths.ensure_directories()?;
        ledger = ledger.with_audit(AuditLogger::new(paths.audit_log()));
    }
    tracing::info!(
        ledger_id = %ledger.id(),
        script = %script_path.display(),
        steps = script.steps.len(),
        "replaying script"
    );

    let report = replay(&ledger, &script, strict)?;
    for rejection in &report.rejections {
        println!(
            "rejected: {} [step {}: {}]",
            rejection.error, rejection.index, rejection.step
        );
    }
    println!(
        "Applied {} of {} steps.",
        report.applied,
        script.steps.len()
    );
    println!();

    print_ledger(&ledger, settings)?;

    let issues = ledger.verify()?;
    if issues.is_empty() {
        println!("Consistency check: ok");
    } else {
        println!("Consistency check: {} issue(s)", issues.len());
        for issue in issues {
            println!("  {}", issue);
        }
    }

    Ok(())
}

fn print_ledger(ledger: &Ledger, settings: &Settings) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();

    let summaries = ledger
        .accounts()?
        .iter()
        .map(|a| ledger.account_summary(a.id))
        .collect::<LedgerResult<Vec<_>>>()?;
    print!("{}", format_account_table(&summaries, symbol));
    println!();

    for summary in &summaries {
        let page = ledger.transaction_page(summary.account.id, 1, settings.default_page_size)?;
        print!("{}", format_transaction_page(&summary.account.name, &page, symbol));
        println!();
    }

    let rows: Vec<_> = ledger
        .budgets()?
        .into_iter()
        .map(|b| {
            let progress = progress_of(&b).ok();
            (b, progress)
        })
        .collect();
    print!("{}", format_budget_table(&rows, symbol));

    Ok(())
}

/// Handle the config command
pub fn handle_config(paths: &LedgerPaths, settings: &Settings) -> LedgerResult<()> {
    println!("Ledger Engine Configuration");
    println!("===========================");
    println!("Base directory:  {}", paths.base_dir().display());
    println!("Settings file:   {}", paths.settings_file().display());
    println!("Audit log:       {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  Currency symbol:   {}", settings.currency_symbol);
    println!("  Audit enabled:     {}", if settings.audit_enabled { "Yes" } else { "No" });
    println!("  Default page size: {}", settings.default_page_size);
    println!("  Log level:         {}", settings.log_level);
    println!("  Schema version:    {}", settings.schema_version);
    Ok(())
}

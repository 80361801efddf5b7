//! Evaluate a navigation against the stored session

use crate::commands::{flag_source, session_store};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use clap::Args;
use facility_access_policy::{
    AccessDecision, AccessDecisionCard, GateEvaluationRecord, RouteGuard, RouteGuardOptions,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::Tabled;

/// Exit status reported when access is denied
pub const DENIED_EXIT_CODE: u8 = 2;

#[derive(Args)]
pub struct CheckArgs {
    /// Module code the route accepts (repeat for alternatives)
    #[arg(short, long = "module", required = true)]
    pub modules: Vec<String>,

    /// Path being navigated to
    #[arg(short, long)]
    pub path: String,

    /// Flag override as KEY=VALUE (repeatable)
    #[arg(long = "flag")]
    pub flags: Vec<String>,

    /// Actor recorded on the decision card
    #[arg(long, default_value = "accessctl")]
    pub actor: String,
}

/// One gate's row in table output
#[derive(Tabled, Serialize)]
struct GateRow {
    #[tabled(rename = "Gate")]
    gate: String,
    #[tabled(rename = "Decision")]
    decision: String,
    #[tabled(rename = "Notes")]
    notes: String,
    #[tabled(rename = "µs")]
    duration_us: u64,
}

impl From<&GateEvaluationRecord> for GateRow {
    fn from(record: &GateEvaluationRecord) -> Self {
        Self {
            gate: record.gate_id.clone(),
            decision: record.decision.to_string(),
            notes: record.notes.clone().unwrap_or_default(),
            duration_us: record.duration_us,
        }
    }
}

pub fn execute(args: CheckArgs, config: &CliConfig, format: OutputFormat) -> CliResult<ExitCode> {
    let guard = RouteGuard::new(
        &config.guard,
        session_store(config),
        flag_source(config, &args.flags),
    )?
    .with_actor(args.actor);
    let loader = guard.with_module_access(args.modules, RouteGuardOptions::default())?;

    // Store failures surface as a signed-out session and deny
    let card = loader.inspect(&args.path);

    match format {
        OutputFormat::Table => print_card_table(&card)?,
        _ => output::print_single(&card, format)?,
    }

    Ok(if card.was_allowed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(DENIED_EXIT_CODE)
    })
}

fn print_card_table(card: &AccessDecisionCard) -> CliResult<()> {
    match &card.decision {
        AccessDecision::Allow => output::print_success(&format!("Access allowed to {}", card.path)),
        AccessDecision::Deny { reason, policy_id } => output::print_error(&format!(
            "Access denied to {}: {} (by {})",
            card.path, reason, policy_id
        )),
    }
    if card.restricted_mode {
        output::print_warning("Deployment is in restricted (evacuation-only) mode");
    }

    let rows: Vec<GateRow> = card.gates_evaluated.iter().map(GateRow::from).collect();
    output::print_output(rows, OutputFormat::Table)
}

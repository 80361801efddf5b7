//! Module catalog listing

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use facility_access_types::KnownModule;
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct ModuleRow {
    #[tabled(rename = "Code")]
    code: &'static str,
    #[tabled(rename = "Module")]
    name: &'static str,
    #[tabled(rename = "Route Segment")]
    route_segment: &'static str,
}

pub fn execute(format: OutputFormat) -> CliResult<()> {
    let rows: Vec<ModuleRow> = KnownModule::ALL
        .iter()
        .map(|m| ModuleRow {
            code: m.code(),
            name: m.display_name(),
            route_segment: m.route_segment(),
        })
        .collect();
    output::print_output(rows, format)
}

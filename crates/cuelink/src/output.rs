//! Output rendering: JSON, table, compact.
//!
//! Table uses `tabled`; JSON serializes the raw response so nothing the
//! API sent is lost; compact emits one `name - macaddress` line per
//! device for scripting.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use cuelink_api::Ap;

use crate::cli::OutputFormat;

#[derive(Tabled)]
struct ApRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "MAC Address")]
    mac: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&Ap> for ApRow {
    fn from(ap: &Ap) -> Self {
        Self {
            name: ap.name.clone().unwrap_or_else(|| "-".into()),
            model: ap.model.clone().unwrap_or_else(|| "-".into()),
            mac: ap.macaddress.clone().unwrap_or_else(|| "-".into()),
            active: match ap.active {
                Some(true) => "yes".into(),
                Some(false) => "no".into(),
                None => "-".into(),
            },
        }
    }
}

/// Render a device collection in the chosen format. The `json` form
/// serializes `raw` (the full structure, page metadata included).
pub fn render_devices<T: serde::Serialize>(
    format: &OutputFormat,
    raw: &T,
    devices: &[Ap],
) -> String {
    match format {
        OutputFormat::Json => render_json(raw),
        OutputFormat::Table => {
            if devices.is_empty() {
                "No devices found".to_owned()
            } else {
                let rows: Vec<ApRow> = devices.iter().map(ApRow::from).collect();
                Table::new(rows).with(Style::rounded()).to_string()
            }
        }
        OutputFormat::Compact => devices
            .iter()
            .map(|ap| {
                format!(
                    "{} - {}",
                    ap.name.as_deref().unwrap_or("-"),
                    ap.macaddress.as_deref().unwrap_or("-")
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Pretty-printed JSON.
pub fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

/// Print rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

use anyhow::Context;

use crate::backend::{create_browser_client, diagnostics::run_diagnostics_for, DiagnosticReport, PROBED_TABLES};
use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub async fn handle(tables: Vec<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.backend.request_timeout_secs))
        .build()?;
    let client = create_browser_client(&config.backend, http)?;

    let tables: Vec<&str> = if tables.is_empty() {
        PROBED_TABLES.to_vec()
    } else {
        tables.iter().map(String::as_str).collect()
    };

    let report = run_diagnostics_for(&client, &tables).await;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", format_report(&report)),
    }

    if !report.connected {
        anyhow::bail!("backend did not respond");
    }
    Ok(())
}

pub fn format_report(report: &DiagnosticReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Checked at: {}\n", report.timestamp.to_rfc3339()));
    out.push_str(&format!("Connected:  {}\n", yes_no(report.connected)));
    out.push_str(&format!(
        "Auth:       {}{}\n",
        if report.auth.reachable { "reachable" } else { "unreachable" },
        report
            .auth
            .error
            .as_ref()
            .map(|e| format!(" ({})", e))
            .unwrap_or_default()
    ));
    out.push_str("Tables:\n");
    for (name, status) in &report.tables {
        match (&status.count, &status.error) {
            (Some(count), _) => out.push_str(&format!("  {:<12} ok, {} rows\n", name, count)),
            (None, Some(error)) => out.push_str(&format!("  {:<12} missing: {}\n", name, error)),
            (None, None) => out.push_str(&format!("  {:<12} unknown\n", name)),
        }
    }
    out
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

use anyhow::Context;

use crate::cli::OutputFormat;
use crate::config::{AppConfig, SiteConfig};

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config.site)?),
        OutputFormat::Text => print!("{}", format_site(&config.site)),
    }
    Ok(())
}

pub fn format_site(site: &SiteConfig) -> String {
    let mut out = String::from("Headers:\n");
    for header in &site.headers {
        out.push_str(&format!("  {}: {}\n", header.name, header.value));
    }

    out.push_str("Redirects:\n");
    for rule in &site.redirects {
        let kind = if rule.permanent { "308" } else { "307" };
        out.push_str(&format!("  {} -> {} ({})\n", rule.source, rule.destination, kind));
    }

    out.push_str(&format!("Image domains: {}\n", site.image_domains.join(", ")));
    out.push_str(&format!(
        "Build: ignore_build_errors={}, ignore_lint_during_builds={}\n",
        site.build.ignore_build_errors, site.build.ignore_lint_during_builds
    ));
    out
}

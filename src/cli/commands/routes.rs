use crate::cli::OutputFormat;
use crate::middleware::PROTECTED_ROUTES;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(PROTECTED_ROUTES)?),
        OutputFormat::Text => {
            for route in PROTECTED_ROUTES {
                println!("{:<12} {}", route.prefix, route.role);
            }
            println!("(roles are declared only; requests are always forwarded)");
        }
    }
    Ok(())
}

use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a list of paths, one per line in text mode
pub fn output_paths(output_format: &OutputFormat, paths: &[String]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "paths": paths }))?);
        }
        OutputFormat::Text => {
            for path in paths {
                println!("{}", path);
            }
        }
    }
    Ok(())
}

/// Print per-path outcomes from a server report and a succeeded/failed tally
pub fn output_results(output_format: &OutputFormat, report: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            let results = report
                .get("results")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            let mut failed = 0;
            for result in &results {
                let path = result.get("path").and_then(Value::as_str).unwrap_or("?");
                if result.get("success").and_then(Value::as_bool).unwrap_or(false) {
                    println!("✓ {}", path);
                } else {
                    failed += 1;
                    let error = result.get("error").and_then(Value::as_str).unwrap_or("unknown error");
                    println!("✗ {} ({})", path, error);
                }
            }
            println!("{} revalidated, {} failed", results.len() - failed, failed);
        }
    }
    Ok(())
}

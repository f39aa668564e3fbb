//! Version command implementation.

use crate::error::Result;

/// Execute the version command.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    if json {
        let output = serde_json::json!({ "name": name, "version": version });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{name} {version}");
    }
    Ok(())
}

//! Version command implementation.

use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput {
    name: &'static str,
    version: &'static str,
    sqlite: &'static str,
    build: &'static str,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        sqlite: rusqlite::version(),
        build: if cfg!(debug_assertions) { "dev" } else { "release" },
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "{} {} (sqlite {}, {})",
            output.name, output.version, output.sqlite, output.build
        );
    }
    Ok(())
}

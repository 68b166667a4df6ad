//! services/portal/src/bin/openapi.rs
//!
//! Writes the OpenAPI document for the portal's routes. The output path is the
//! first argument, `openapi.json` when omitted.

use portal_lib::web::docs::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));

    let document = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&path, document)?;
    println!("OpenAPI document written to {}", path.display());
    Ok(())
}

//! Verify command implementation.

use pacstac_verify::offline_verify;
use tracing::info;

use crate::input::{ensure_single_stdin, read_json};
use crate::output::format_json;

pub fn run(
    attestation: String,
    jwks: String,
    json_output: bool,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_single_stdin(&[attestation.as_str(), jwks.as_str()])?;
    let attestation_doc = read_json(Some(attestation.as_str()))?;
    let jwks_doc = read_json(Some(jwks.as_str()))?;

    let report = offline_verify(&attestation_doc, &jwks_doc);
    info!(attestation = %attestation, ok = report.is_ok(), "offline verification finished");

    if json_output {
        println!("{}", format_json(&report));
    } else {
        println!("{}", report);
    }

    if strict && !report.is_ok() {
        std::process::exit(1);
    }

    Ok(())
}

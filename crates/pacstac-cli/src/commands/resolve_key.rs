//! Resolve-key command implementation.

use pacstac_verify::resolve_key;
use serde_json::json;

use crate::input::read_json;
use crate::output::{format_json, format_key_row, print_key_header};

pub fn run(kid: String, jwks: String, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let jwks_doc = read_json(Some(jwks.as_str()))?;

    let resolved = resolve_key(&jwks_doc, &kid)?;
    // Surface bad key material here rather than at verify time.
    resolved.verifying_key()?;
    let public_key_hex = hex::encode(&resolved.public_key);

    if json_output {
        println!(
            "{}",
            format_json(&json!({
                "kid": resolved.kid,
                "index": resolved.index,
                "publicKey": public_key_hex
            }))
        );
    } else {
        print_key_header();
        println!("{}", format_key_row(&resolved.kid, resolved.index, &public_key_hex));
    }

    Ok(())
}

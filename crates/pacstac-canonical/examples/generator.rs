use pacstac_canonical::canonicalize;
use serde_json::json;

fn main() {
    let attestation = json!({
        "type": "stewardship",
        "issuedAt": "2025-12-20T00:00:00Z",
        "wallet": { "chain": "eip155:1", "address": "0x0000000000000000000000000000000000000001" },
        "asset": { "type": "domain", "ref": { "domain": "example.com" } },
        "payload": {
            "sub": "alice",
            "score": 0.5
        }
    });

    match canonicalize(&attestation) {
        Ok(canonical) => println!("{}", canonical),
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    }
}

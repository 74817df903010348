//! Canonicalize command implementation.

use pacstac_canonical::canonicalize;

use crate::input::read_json;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_json(input.as_deref())?;

    let canonical =
        canonicalize(&value).map_err(|e| format!("Canonicalization failed: {}", e))?;

    println!("{}", canonical);
    Ok(())
}

pub mod check;
pub mod chunk;
pub mod clean;
pub mod config;
pub mod export;
pub mod sentences;

use std::io::Read;
use std::path::Path;

/// Read a whole input file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {e}"))?;
        return Ok(text);
    }

    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))
}

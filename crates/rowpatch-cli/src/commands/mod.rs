pub mod apply;
pub mod preview;

use rowpatch_core::EditBatch;
use std::path::Path;

/// Read an edit batch from a JSON file
pub fn read_batch(path: &Path) -> Result<EditBatch, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read batch file {}: {}", path.display(), e))?;
    let batch: EditBatch = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid batch file {}: {}", path.display(), e))?;
    Ok(batch)
}

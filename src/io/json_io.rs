use std::path::Path;

use serde::Serialize;

use crate::error::RichnessError;
use crate::models::Community;

/// Read a community (window and points) from a JSON file.
pub fn read_community_json(path: impl AsRef<Path>) -> Result<Community, RichnessError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let community: Community = serde_json::from_str(&content)?;
    community.validate()?;
    Ok(community)
}

/// Read a community from JSON bytes.
pub fn read_community_json_from_bytes(data: &[u8]) -> Result<Community, RichnessError> {
    let content = std::str::from_utf8(data)
        .map_err(|e| RichnessError::ParseError(format!("Invalid UTF-8: {e}")))?;
    let community: Community = serde_json::from_str(content)?;
    community.validate()?;
    Ok(community)
}

/// Write any report or model value as JSON.
pub fn write_json<T: Serialize + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), RichnessError> {
    let content = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}

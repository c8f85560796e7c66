mod csv_io;
mod json_io;

use std::path::Path;

use crate::error::RichnessError;
use crate::models::{Community, Window};

pub use csv_io::{
    read_community_csv, read_community_csv_from_bytes, write_abundance_csv, write_aggregated_csv,
    write_community_csv, write_sweep_csv,
};
pub use json_io::{read_community_json, read_community_json_from_bytes, write_json};

/// Trait for reading a community from a file.
pub trait CommunityReader {
    fn read(&self, path: &Path) -> Result<Community, RichnessError>;
}

/// CSV format reader. Points carry no window, so one is supplied or inferred.
pub struct CsvFormat {
    /// Window to place the points in; the bounding box when `None`
    pub window: Option<Window>,
    pub unit: String,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            window: None,
            unit: "m".to_string(),
        }
    }
}

impl CommunityReader for CsvFormat {
    fn read(&self, path: &Path) -> Result<Community, RichnessError> {
        read_community_csv(path, self.window.clone(), &self.unit)
    }
}

/// JSON format reader.
pub struct JsonFormat;

impl CommunityReader for JsonFormat {
    fn read(&self, path: &Path) -> Result<Community, RichnessError> {
        read_community_json(path)
    }
}

/// Pick a reader from the file extension.
pub fn reader_for(path: &Path, csv: CsvFormat) -> Result<Box<dyn CommunityReader>, RichnessError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "csv" => Ok(Box::new(csv)),
        "json" => Ok(Box::new(JsonFormat)),
        _ => Err(RichnessError::ParseError(format!(
            "Unsupported community format: .{ext}. Use .csv or .json"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn sample_community() -> Community {
        Community::new(
            Window::square(10.0, "m").unwrap(),
            vec![Point::new(1.0, 1.0, "a"), Point::new(9.0, 3.0, "b")],
        )
        .unwrap()
    }

    #[test]
    fn test_csv_trait_read() {
        let community = sample_community();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("community.csv");
        write_community_csv(&community, &path).unwrap();

        let reader: &dyn CommunityReader = &CsvFormat {
            window: Some(community.window.clone()),
            unit: "m".to_string(),
        };
        let loaded = reader.read(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.window, community.window);
    }

    #[test]
    fn test_json_trait_read() {
        let community = sample_community();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("community.json");
        write_json(&community, &path, false).unwrap();

        let reader: &dyn CommunityReader = &JsonFormat;
        let loaded = reader.read(&path).unwrap();
        assert_eq!(loaded.points, community.points);
    }

    #[test]
    fn test_reader_for_extension() {
        assert!(reader_for(Path::new("a.CSV"), CsvFormat::default()).is_ok());
        assert!(reader_for(Path::new("a.json"), CsvFormat::default()).is_ok());
        assert!(reader_for(Path::new("a.xlsx"), CsvFormat::default()).is_err());
        assert!(reader_for(Path::new("noext"), CsvFormat::default()).is_err());
    }
}

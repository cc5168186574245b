//! Request DTOs for the grid server API
//!
//! Sizes and page numbers are signed so that non-positive input reaches
//! validation instead of failing JSON extraction.

use serde::Deserialize;

use crate::sort::SortDirection;

/// Request body for PUT /sort
///
/// Without a direction the column is toggled: a new column starts
/// ascending, the active column flips.
#[derive(Debug, Clone, Deserialize)]
pub struct SortRequest {
    pub path: String,
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

impl SortRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.path.trim().is_empty() {
            return Some("Sort path cannot be empty".to_string());
        }
        None
    }
}

/// Request body for PUT /page-size and PUT /cache-size
#[derive(Debug, Clone, Deserialize)]
pub struct SizeRequest {
    pub size: i64,
}

impl SizeRequest {
    /// Negative sizes become 0, which configuration rejects.
    pub fn as_usize(&self) -> usize {
        usize::try_from(self.size).unwrap_or(0)
    }
}

/// Request body for PUT /page
#[derive(Debug, Clone, Deserialize)]
pub struct PageNumberRequest {
    pub number: i64,
}

impl PageNumberRequest {
    /// Non-positive numbers become 0, which clamps to the first page.
    pub fn as_usize(&self) -> usize {
        usize::try_from(self.number).unwrap_or(0)
    }
}

/// Query string of GET /page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Comma-separated column paths
    #[serde(default)]
    pub columns: Option<String>,
}

impl PageQuery {
    pub fn column_paths(&self) -> Vec<String> {
        self.columns
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Query string of GET /cell/:row
#[derive(Debug, Clone, Deserialize)]
pub struct CellQuery {
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_request_deserialize() {
        let req: SortRequest = serde_json::from_str(r#"{"path": "Address.City"}"#).unwrap();
        assert_eq!(req.path, "Address.City");
        assert!(req.direction.is_none());

        let req: SortRequest =
            serde_json::from_str(r#"{"path": "Age", "direction": "descending"}"#).unwrap();
        assert_eq!(req.direction, Some(SortDirection::Descending));
    }

    #[test]
    fn test_validate_empty_path() {
        let req = SortRequest {
            path: "  ".to_string(),
            direction: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_negative_sizes_map_to_zero() {
        assert_eq!(SizeRequest { size: -3 }.as_usize(), 0);
        assert_eq!(SizeRequest { size: 7 }.as_usize(), 7);
        assert_eq!(PageNumberRequest { number: -1 }.as_usize(), 0);
    }

    #[test]
    fn test_column_paths() {
        let query = PageQuery {
            columns: Some("Name, Address.City,,Tags[0] ".to_string()),
        };
        assert_eq!(query.column_paths(), vec!["Name", "Address.City", "Tags[0]"]);
        assert!(PageQuery::default().column_paths().is_empty());
    }
}

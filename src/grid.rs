//! Grid View
//!
//! Ties rows, the active sort and the paginator together: rows come in
//! unordered, are optionally sorted by resolved column values, then sliced
//! into the requested page.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{GridError, Result};
use crate::paging::{Page, Paginator};
use crate::resolve::{ObjectRef, PathResolver, TypeKey, Value};
use crate::sort::{ColumnSortKey, SortEngine};

// == Grid View ==
#[derive(Debug)]
pub struct GridView {
    resolver: Arc<PathResolver>,
    engine: SortEngine,
    /// Rows in the order they were supplied
    rows: Vec<ObjectRef>,
    /// Rows in display order
    ordered: Vec<ObjectRef>,
    sort_key: Option<ColumnSortKey>,
    paginator: Paginator,
}

impl GridView {
    // == Constructor ==
    pub fn new(resolver: Arc<PathResolver>, page_size: usize) -> Result<Self> {
        Ok(Self {
            engine: SortEngine::new(Arc::clone(resolver.registry())),
            resolver,
            rows: Vec::new(),
            ordered: Vec::new(),
            sort_key: None,
            paginator: Paginator::new(page_size)?,
        })
    }

    // == Rows ==
    /// Replaces the rows, re-applying the active sort.
    ///
    /// If the new rows cannot be ordered by the active sort key, the sort is
    /// dropped and the rows are shown in input order.
    pub fn set_rows(&mut self, rows: Vec<ObjectRef>) {
        self.rows = rows;
        let sorted = self.sort_key.as_ref().map(|key| self.sorted_by(key));
        self.ordered = match sorted {
            Some(Ok(ordered)) => ordered,
            Some(Err(err)) => {
                warn!(error = %err, "active sort no longer applies, clearing it");
                self.sort_key = None;
                self.rows.clone()
            }
            None => self.rows.clone(),
        };
        self.paginator.clamp_to(self.ordered.len());
        debug!(rows = self.rows.len(), "grid rows replaced");
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[ObjectRef] {
        &self.ordered
    }

    /// Row at `index` in display order.
    pub fn row(&self, index: usize) -> Option<&ObjectRef> {
        self.ordered.get(index)
    }

    // == Sorting ==
    pub fn sort_key(&self) -> Option<&ColumnSortKey> {
        self.sort_key.as_ref()
    }

    /// Activates `key`, or restores input order with `None`.
    ///
    /// On `UnsortableColumn` the previous order and key stay in place.
    pub fn set_sort(&mut self, key: Option<ColumnSortKey>) -> Result<()> {
        self.ordered = match &key {
            Some(key) => self.sorted_by(key).inspect_err(|err| {
                warn!(path = %key.path, error = %err, "sort request rejected");
            })?,
            None => self.rows.clone(),
        };
        self.sort_key = key;
        Ok(())
    }

    /// Sorts by `path`, flipping the direction if it is already the active
    /// column and starting ascending otherwise.
    pub fn toggle_sort(&mut self, path: &str) -> Result<ColumnSortKey> {
        let key = match &self.sort_key {
            Some(active) if active.path == path => {
                ColumnSortKey::new(path, active.direction.toggled())
            }
            _ => ColumnSortKey::ascending(path),
        };
        self.set_sort(Some(key.clone()))?;
        Ok(key)
    }

    fn sorted_by(&self, key: &ColumnSortKey) -> Result<Vec<ObjectRef>> {
        self.engine.sort(&self.rows, key, |row, path| {
            self.resolver.resolve_value(Some(row), path)
        })
    }

    /// Type-level sortability check for a column of rows of type `root`.
    pub fn column_sortable(&self, root: &TypeKey, path: &str) -> bool {
        self.resolver.column_sortable(root, path)
    }

    // == Paging ==
    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Changes the page size and returns to page 1.
    pub fn configure_page_size(&mut self, page_size: usize) -> Result<()> {
        self.paginator.configure(page_size)
    }

    /// Moves to the requested page, clamped; returns the page now shown.
    pub fn set_page_number(&mut self, requested: usize) -> usize {
        self.paginator.set_page_number(requested, self.ordered.len())
    }

    pub fn page_count(&self) -> usize {
        self.paginator.page_count(self.ordered.len())
    }

    pub fn current_page(&self) -> Page<ObjectRef> {
        self.paginator.current(&self.ordered)
    }

    pub fn next_page(&self) -> Option<Page<ObjectRef>> {
        self.paginator.next(&self.ordered)
    }

    // == Cells ==
    /// Display value of one cell.
    pub fn cell(&self, row: &ObjectRef, path: &str) -> Option<Value> {
        self.resolver.resolve_value(Some(row), path)
    }

    pub fn resolver(&self) -> &Arc<PathResolver> {
        &self.resolver
    }
}

/// Converts parsed JSON rows; every row must be a JSON object.
pub fn rows_from_json(rows: Vec<serde_json::Value>) -> Result<Vec<ObjectRef>> {
    rows.into_iter()
        .enumerate()
        .map(|(index, json)| match Value::from_json(json) {
            Value::Object(row) => Ok(row),
            _ => Err(GridError::InvalidRequest(format!(
                "row {index} is not a JSON object"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::TypeRegistry;
    use crate::sort::SortDirection;
    use serde_json::json;

    fn grid(page_size: usize) -> GridView {
        let resolver = PathResolver::new(Arc::new(TypeRegistry::new()), 256).unwrap();
        GridView::new(Arc::new(resolver), page_size).unwrap()
    }

    fn people() -> Vec<ObjectRef> {
        rows_from_json(vec![
            json!({"Name": "Cy", "Age": 41, "Address": {"City": "Oslo"}}),
            json!({"Name": "Ab", "Age": 29}),
            json!({"Name": "Bo", "Age": 35, "Address": {"City": "Bern"}}),
            json!({"Name": "Di", "Tags": ["x"], "Address": null}),
        ])
        .unwrap()
    }

    fn names(grid: &GridView) -> Vec<String> {
        grid.rows()
            .iter()
            .map(|row| grid.cell(row, "Name").map(|v| v.to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_rows_from_json_rejects_non_objects() {
        let result = rows_from_json(vec![json!({"a": 1}), json!(3)]);
        assert!(matches!(result, Err(GridError::InvalidRequest(msg)) if msg.contains("row 1")));
    }

    #[test]
    fn test_sort_by_nested_path() {
        let mut grid = grid(10);
        grid.set_rows(people());

        grid.set_sort(Some(ColumnSortKey::ascending("Address.City"))).unwrap();
        assert_eq!(names(&grid), vec!["Ab", "Di", "Bo", "Cy"]);

        grid.set_sort(Some(ColumnSortKey::descending("Address.City"))).unwrap();
        assert_eq!(names(&grid), vec!["Ab", "Di", "Cy", "Bo"]);

        grid.set_sort(None).unwrap();
        assert_eq!(names(&grid), vec!["Cy", "Ab", "Bo", "Di"]);
    }

    #[test]
    fn test_unsortable_column_keeps_previous_order() {
        let mut grid = grid(10);
        grid.set_rows(people());
        grid.set_sort(Some(ColumnSortKey::ascending("Age"))).unwrap();
        let before = names(&grid);

        let result = grid.set_sort(Some(ColumnSortKey::ascending("Address")));

        assert!(matches!(result, Err(GridError::UnsortableColumn(_))));
        assert_eq!(names(&grid), before);
        assert_eq!(grid.sort_key(), Some(&ColumnSortKey::ascending("Age")));
    }

    #[test]
    fn test_toggle_sort() {
        let mut grid = grid(10);
        grid.set_rows(people());

        let key = grid.toggle_sort("Name").unwrap();
        assert_eq!(key.direction, SortDirection::Ascending);
        let key = grid.toggle_sort("Name").unwrap();
        assert_eq!(key.direction, SortDirection::Descending);
        assert_eq!(names(&grid), vec!["Di", "Cy", "Bo", "Ab"]);
        let key = grid.toggle_sort("Age").unwrap();
        assert_eq!(key.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_set_rows_reapplies_sort() {
        let mut grid = grid(10);
        grid.set_sort(Some(ColumnSortKey::descending("Age"))).unwrap();

        grid.set_rows(people());

        assert_eq!(names(&grid), vec!["Di", "Cy", "Bo", "Ab"]);
    }

    #[test]
    fn test_set_rows_drops_inapplicable_sort() {
        let mut grid = grid(10);
        grid.set_rows(people());
        grid.set_sort(Some(ColumnSortKey::ascending("Name"))).unwrap();

        grid.set_rows(rows_from_json(vec![json!({"Name": [1]}), json!({"Name": [2]})]).unwrap());

        assert!(grid.sort_key().is_none());
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let rows = rows_from_json((0..25).map(|i| json!({ "Id": i })).collect()).unwrap();
        let mut grid = grid(10);
        grid.set_rows(rows);

        assert_eq!(grid.set_page_number(3), 3);
        assert_eq!(grid.current_page().items.len(), 5);

        grid.configure_page_size(5).unwrap();

        let page = grid.current_page();
        assert_eq!(page.number, 1);
        assert_eq!(page.page_count, 5);
        assert_eq!(grid.cell(&page.items[0], "Id").map(|v| v.to_string()), Some("0".into()));
    }

    #[test]
    fn test_shrinking_rows_clamps_page() {
        let mut grid = grid(2);
        grid.set_rows(people());
        grid.set_page_number(2);

        grid.set_rows(people().into_iter().take(1).collect());

        assert_eq!(grid.paginator().page_number(), 1);
        assert_eq!(grid.page_count(), 1);
    }

    #[test]
    fn test_column_sortable_for_records_is_dynamic() {
        let grid = grid(10);
        assert!(grid.column_sortable(&TypeKey::of::<crate::resolve::Record>(), "Any.Path"));
    }
}

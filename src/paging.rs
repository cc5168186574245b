//! Paging
//!
//! Slices an ordered row sequence into fixed-size pages.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::error::{GridError, Result};

/// Page sizes offered by size selectors before any other size is configured.
pub const DEFAULT_PAGE_SIZES: [usize; 6] = [5, 10, 50, 100, 200, 1000];

// == Page Arithmetic ==
/// Number of pages needed for `total_items`; at least 1.
pub fn page_count(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_items.div_ceil(page_size).max(1)
}

/// Clamps a requested page number into `[1, page_count]`.
pub fn clamp_page_number(requested: usize, page_count: usize) -> usize {
    requested.max(1).min(page_count.max(1))
}

/// The `[(n - 1) * size, n * size)` range of `items`, clipped to its length.
pub fn page<T>(items: &[T], page_number: usize, page_size: usize) -> &[T] {
    let start = page_number
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(items.len());
    let end = page_number.saturating_mul(page_size).min(items.len());
    &items[start..end.max(start)]
}

// == Page ==
/// One page of a row sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub number: usize,
    pub size: usize,
    pub page_count: usize,
    pub total_items: usize,
}

// == Paginator ==
/// Current page size and number of a grid.
#[derive(Debug, Clone)]
pub struct Paginator {
    page_size: usize,
    page_number: usize,
    known_sizes: BTreeSet<usize>,
}

impl Paginator {
    // == Constructor ==
    /// Starts on page 1. Fails with `InvalidConfiguration` on a zero size.
    pub fn new(page_size: usize) -> Result<Self> {
        validate_page_size(page_size)?;
        let mut known_sizes: BTreeSet<usize> = DEFAULT_PAGE_SIZES.into_iter().collect();
        known_sizes.insert(page_size);
        Ok(Self {
            page_size,
            page_number: 1,
            known_sizes,
        })
    }

    // == Configure ==
    /// Changes the page size and goes back to page 1.
    ///
    /// A zero size is rejected and leaves everything unchanged.
    pub fn configure(&mut self, page_size: usize) -> Result<()> {
        validate_page_size(page_size)?;
        self.page_size = page_size;
        self.page_number = 1;
        if self.known_sizes.insert(page_size) {
            debug!(page_size, "new page size added to known sizes");
        }
        Ok(())
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Sizes ever configured plus the defaults, ascending.
    pub fn known_page_sizes(&self) -> Vec<usize> {
        self.known_sizes.iter().copied().collect()
    }

    pub fn page_count(&self, total_items: usize) -> usize {
        page_count(total_items, self.page_size)
    }

    /// Moves to `requested`, clamped to the pages `total_items` fill.
    pub fn set_page_number(&mut self, requested: usize, total_items: usize) -> usize {
        self.page_number = clamp_page_number(requested, self.page_count(total_items));
        self.page_number
    }

    /// Re-clamps the current page after the row sequence changed.
    pub fn clamp_to(&mut self, total_items: usize) -> usize {
        self.set_page_number(self.page_number, total_items)
    }

    /// The current page of `items`.
    pub fn current<T: Clone>(&self, items: &[T]) -> Page<T> {
        let number = clamp_page_number(self.page_number, self.page_count(items.len()));
        self.page_at(items, number)
    }

    /// The page after the current one, if there is one.
    pub fn next<T: Clone>(&self, items: &[T]) -> Option<Page<T>> {
        let number = self.page_number + 1;
        (number <= self.page_count(items.len())).then(|| self.page_at(items, number))
    }

    fn page_at<T: Clone>(&self, items: &[T], number: usize) -> Page<T> {
        Page {
            items: page(items, number, self.page_size).to_vec(),
            number,
            size: self.page_size,
            page_count: self.page_count(items.len()),
            total_items: items.len(),
        }
    }
}

fn validate_page_size(page_size: usize) -> Result<()> {
    if page_size == 0 {
        return Err(GridError::InvalidConfiguration(
            "page size must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(30, 10), 3);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(5, 0), 1);
    }

    #[test]
    fn test_clamp_page_number() {
        assert_eq!(clamp_page_number(5, 3), 3);
        assert_eq!(clamp_page_number(0, 3), 1);
        assert_eq!(clamp_page_number(2, 3), 2);
        assert_eq!(clamp_page_number(2, 0), 1);
    }

    #[test]
    fn test_page_slices() {
        let items: Vec<u32> = (1..=25).collect();

        assert_eq!(page(&items, 1, 10), &items[0..10]);
        assert_eq!(page(&items, 3, 10), &[21, 22, 23, 24, 25]);
        assert!(page(&items, 4, 10).is_empty());
        assert!(page(&items, 0, 10).is_empty());
        assert!(page::<u32>(&[], 1, 10).is_empty());
    }

    #[test]
    fn test_configure_rejects_zero() {
        let mut paginator = Paginator::new(10).unwrap();
        paginator.set_page_number(2, 30);

        let result = paginator.configure(0);

        assert!(matches!(result, Err(GridError::InvalidConfiguration(_))));
        assert_eq!(paginator.page_size(), 10);
        assert_eq!(paginator.page_number(), 2);
        assert!(Paginator::new(0).is_err());
    }

    #[test]
    fn test_configure_resets_to_first_page() {
        let items: Vec<u32> = (0..25).collect();
        let mut paginator = Paginator::new(10).unwrap();
        paginator.set_page_number(3, items.len());
        assert_eq!(paginator.page_number(), 3);

        paginator.configure(5).unwrap();

        assert_eq!(paginator.page_number(), 1);
        assert_eq!(paginator.current(&items).items, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_known_page_sizes_only_grow() {
        let mut paginator = Paginator::new(10).unwrap();
        let before = paginator.known_page_sizes();

        paginator.configure(7).unwrap();
        paginator.configure(10).unwrap();
        paginator.configure(7).unwrap();

        let after = paginator.known_page_sizes();
        assert_eq!(after.len(), before.len() + 1);
        assert!(after.contains(&7));
        assert!(after.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_clamp_after_rows_shrink() {
        let mut paginator = Paginator::new(10).unwrap();
        paginator.set_page_number(3, 25);

        assert_eq!(paginator.clamp_to(12), 2);
        assert_eq!(paginator.clamp_to(0), 1);
    }

    #[test]
    fn test_current_and_next_page() {
        let items: Vec<u32> = (0..12).collect();
        let mut paginator = Paginator::new(5).unwrap();
        paginator.set_page_number(2, items.len());

        let current = paginator.current(&items);
        assert_eq!(current.items, vec![5, 6, 7, 8, 9]);
        assert_eq!(current.number, 2);
        assert_eq!(current.page_count, 3);
        assert_eq!(current.total_items, 12);

        let next = paginator.next(&items).unwrap();
        assert_eq!(next.items, vec![10, 11]);

        paginator.set_page_number(3, items.len());
        assert!(paginator.next(&items).is_none());
    }
}

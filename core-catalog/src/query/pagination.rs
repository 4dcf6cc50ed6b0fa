//! Pagination helper types for catalog queries

use crate::query::params::parse_int;
use serde::{Deserialize, Serialize};

/// Validated `[start, end)` window expressed as skip/limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// Rows to skip before the window
    pub skip: u64,
    /// Maximum rows to return; always positive
    pub limit: u64,
}

impl PageWindow {
    /// Skip count worth emitting; a zero skip is left out of the pipeline
    pub fn skip_stage(&self) -> Option<u64> {
        (self.skip > 0).then_some(self.skip)
    }
}

pub struct Paginator;

impl Paginator {
    /// Resolve raw bounds into a window.
    ///
    /// Returns `None` ("return every match") when either bound is missing or
    /// not an integer, when `start` is negative, or when `end <= start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_catalog::query::Paginator;
    ///
    /// let window = Paginator::resolve(Some("10"), Some("30")).unwrap();
    /// assert_eq!((window.skip, window.limit), (10, 20));
    /// assert!(Paginator::resolve(Some("5"), Some("5")).is_none());
    /// ```
    pub fn resolve(start: Option<&str>, end: Option<&str>) -> Option<PageWindow> {
        let start = parse_int(start?)?;
        let end = parse_int(end?)?;
        if start < 0 || end <= start {
            return None;
        }

        Some(PageWindow {
            skip: u64::try_from(start).ok()?,
            limit: u64::try_from(end - start).ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_bounds_become_skip_and_limit() {
        let window = Paginator::resolve(Some("0"), Some("2")).unwrap();
        assert_eq!(window, PageWindow { skip: 0, limit: 2 });
        assert_eq!(window.skip_stage(), None);

        let window = Paginator::resolve(Some("40"), Some("60")).unwrap();
        assert_eq!(window, PageWindow { skip: 40, limit: 20 });
        assert_eq!(window.skip_stage(), Some(40));
    }

    #[test]
    fn invalid_bounds_disable_pagination() {
        let cases = [
            (None, Some("10")),
            (Some("0"), None),
            (Some("abc"), Some("10")),
            (Some("0"), Some("ten")),
            (Some("-1"), Some("10")),
            (Some("10"), Some("10")),
            (Some("10"), Some("5")),
            (Some(""), Some("")),
        ];
        for (start, end) in cases {
            assert_eq!(Paginator::resolve(start, end), None, "{start:?}..{end:?}");
        }
    }

    #[test]
    fn limit_never_exceeds_requested_span() {
        for start in 0..20i64 {
            for end in (start + 1)..(start + 15) {
                let window =
                    Paginator::resolve(Some(&start.to_string()), Some(&end.to_string())).unwrap();
                assert_eq!(window.limit, (end - start) as u64);
                assert!(window.limit > 0);
            }
        }
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        let window = Paginator::resolve(Some("0"), Some(&i64::MAX.to_string())).unwrap();
        assert_eq!(window.limit, i64::MAX as u64);
        assert!(Paginator::resolve(Some("-9223372036854775808"), Some("0")).is_none());
    }
}

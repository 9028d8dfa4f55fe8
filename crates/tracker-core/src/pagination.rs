use crate::error::Result;
use serde::Serialize;

pub const DEFAULT_PAGE_LIMIT: usize = 15;

/// One page of an issue listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuePage<T> {
    /// Whether at least one more issue exists past this page
    pub more: bool,
    pub issues: Vec<T>,
}

/// Fetch a 1-based page by over-fetching one extra row to detect a next page
///
/// `fetch_page` receives `(offset, limit)`.
pub fn fetch_issue_page<T, F>(fetch_page: F, page: usize, page_limit: usize) -> Result<IssuePage<T>>
where
    F: FnOnce(usize, usize) -> Result<Vec<T>>,
{
    let offset = page.max(1).saturating_sub(1).saturating_mul(page_limit);

    let mut issues = fetch_page(offset, page_limit.saturating_add(1))?;
    let more = issues.len() > page_limit;
    issues.truncate(page_limit);

    Ok(IssuePage { more, issues })
}

/// Parse an integer supplied by the host, falling back on missing or bad input
pub fn parse_int_or(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_issue_page_detects_more() {
        // Arrange: 20 rows, pages of 15
        let data: Vec<i32> = (1..=20).collect();
        // Act
        let page = fetch_issue_page(
            |offset, limit| Ok(data[offset..].iter().copied().take(limit).collect()),
            1,
            15,
        )
        .unwrap();
        // Assert
        assert!(page.more);
        assert_eq!(page.issues.len(), 15);
        assert_eq!(page.issues[0], 1);
    }

    #[test]
    fn fetch_issue_page_last_page() {
        let data: Vec<i32> = (1..=20).collect();
        let page = fetch_issue_page(
            |offset, limit| Ok(data[offset..].iter().copied().take(limit).collect()),
            2,
            15,
        )
        .unwrap();
        assert!(!page.more);
        assert_eq!(page.issues, (16..=20).collect::<Vec<_>>());
    }

    #[test]
    fn fetch_issue_page_requests_one_extra_row() {
        let mut seen = None;
        let _ = fetch_issue_page::<i32, _>(
            |offset, limit| {
                seen = Some((offset, limit));
                Ok(vec![])
            },
            3,
            10,
        );
        assert_eq!(seen, Some((20, 11)));
    }

    #[test]
    fn fetch_issue_page_exact_fit_has_no_more() {
        let data: Vec<i32> = (1..=15).collect();
        let page = fetch_issue_page(
            |offset, limit| Ok(data[offset..].iter().copied().take(limit).collect()),
            1,
            15,
        )
        .unwrap();
        assert!(!page.more);
        assert_eq!(page.issues.len(), 15);
    }

    #[test]
    fn fetch_issue_page_zero_page_is_first_page() {
        let page = fetch_issue_page(|offset, _| Ok(vec![offset]), 0, 5).unwrap();
        assert_eq!(page.issues, vec![0]);
    }

    #[test]
    fn fetch_issue_page_saturates_huge_page() {
        let mut seen = None;
        let page = fetch_issue_page::<i32, _>(
            |offset, limit| {
                seen = Some((offset, limit));
                Ok(vec![])
            },
            2_000_000_000_000_000_000,
            15,
        )
        .unwrap();
        assert_eq!(seen, Some((usize::MAX, 16)));
        assert!(!page.more);
    }

    #[test]
    fn fetch_issue_page_saturates_huge_limit() {
        let mut seen = None;
        let page = fetch_issue_page(
            |offset, limit| {
                seen = Some((offset, limit));
                Ok(vec![1, 2, 3])
            },
            1,
            usize::MAX,
        )
        .unwrap();
        assert_eq!(seen, Some((0, usize::MAX)));
        assert!(!page.more);
        assert_eq!(page.issues, vec![1, 2, 3]);
    }

    #[test]
    fn parse_int_or_falls_back() {
        assert_eq!(parse_int_or(Some("3"), 1), 3);
        assert_eq!(parse_int_or(Some(" 7 "), 1), 7);
        assert_eq!(parse_int_or(Some("abc"), 15), 15);
        assert_eq!(parse_int_or(None, 15), 15);
    }
}

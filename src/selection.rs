//! Page selection policy
//!
//! Decides which pages of a single input file go into the combined output.
//! This module never touches PDF bytes: it works from a page count alone, so
//! the rules can be tested without a codec.

use std::fmt;

/// Which pages to take from every input file
///
/// The two flags are independent and additive. When neither is set, every
/// page of every file is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Take the first page and, when it differs, the last page
    pub include_first_last: bool,
    /// Take the page numbered `specific_page`
    pub include_specific: bool,
    /// 1-based page number used when `include_specific` is set. Zero never
    /// names a page and is reported as missing.
    pub specific_page: u32,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            include_first_last: false,
            include_specific: false,
            specific_page: 1,
        }
    }
}

impl SelectionPolicy {
    /// Build a policy from CLI-style inputs: a first/last flag and an
    /// optional specific page
    pub fn new(include_first_last: bool, specific_page: Option<u32>) -> Self {
        Self {
            include_first_last,
            include_specific: specific_page.is_some(),
            specific_page: specific_page.unwrap_or(1),
        }
    }

    /// True when neither branch is active and whole files are taken
    pub fn selects_all(&self) -> bool {
        !self.include_first_last && !self.include_specific
    }
}

/// One entry of a file's "pages included" description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    /// A page that was appended (1-based)
    Page(u32),
    /// A requested page beyond the end of the file
    Missing(u32),
    /// Every page from 1 to the given count
    Range(u32),
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageToken::Page(n) => write!(f, "{}", n),
            PageToken::Missing(n) => write!(f, "page {} does not exist", n),
            PageToken::Range(count) => write!(f, "1 to {}", count),
        }
    }
}

/// Result of applying a policy to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    /// Pages to append, 1-based, in append order. May contain duplicates.
    pub pages: Vec<u32>,
    /// Tokens describing the selection, in report order
    pub tokens: Vec<PageToken>,
}

impl PageSelection {
    /// Comma-joined description, e.g. `"1, 5, page 7 does not exist"`
    pub fn description(&self) -> String {
        self.tokens
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Apply `policy` to a file with `page_count` pages
///
/// Branches are evaluated in a fixed order: first/last, then the specific
/// page, then the select-all fallback. No deduplication is done, so a
/// specific page equal to the first or last page is selected twice.
pub fn select_pages(page_count: u32, policy: &SelectionPolicy) -> PageSelection {
    let mut pages = Vec::new();
    let mut tokens = Vec::new();

    if policy.include_first_last && page_count >= 1 {
        pages.push(1);
        tokens.push(PageToken::Page(1));
        if page_count >= 2 {
            pages.push(page_count);
            tokens.push(PageToken::Page(page_count));
        }
    }

    if policy.include_specific {
        let n = policy.specific_page;
        if (1..=page_count).contains(&n) {
            pages.push(n);
            tokens.push(PageToken::Page(n));
        } else {
            tokens.push(PageToken::Missing(n));
        }
    }

    if policy.selects_all() {
        pages.extend(1..=page_count);
        tokens = vec![PageToken::Range(page_count)];
    }

    PageSelection { pages, tokens }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_when_no_flag_set() {
        let selection = select_pages(4, &SelectionPolicy::default());
        assert_eq!(selection.pages, vec![1, 2, 3, 4]);
        assert_eq!(selection.description(), "1 to 4");
    }

    #[test]
    fn test_first_last_single_page_not_duplicated() {
        let policy = SelectionPolicy::new(true, None);
        let selection = select_pages(1, &policy);
        assert_eq!(selection.pages, vec![1]);
        assert_eq!(selection.description(), "1");
    }

    #[test]
    fn test_first_last_five_pages() {
        let policy = SelectionPolicy::new(true, None);
        let selection = select_pages(5, &policy);
        assert_eq!(selection.pages, vec![1, 5]);
        assert_eq!(selection.description(), "1, 5");
    }

    #[test]
    fn test_specific_page_out_of_range() {
        let policy = SelectionPolicy::new(false, Some(7));
        let selection = select_pages(5, &policy);
        assert!(selection.pages.is_empty());
        assert_eq!(selection.description(), "page 7 does not exist");
    }

    #[test]
    fn test_specific_page_in_range() {
        let policy = SelectionPolicy::new(false, Some(3));
        let selection = select_pages(5, &policy);
        assert_eq!(selection.pages, vec![3]);
        assert_eq!(selection.tokens, vec![PageToken::Page(3)]);
    }

    #[test]
    fn test_both_branches_keep_duplicates() {
        let policy = SelectionPolicy::new(true, Some(1));
        let selection = select_pages(5, &policy);
        assert_eq!(selection.pages, vec![1, 5, 1]);
        assert_eq!(selection.description(), "1, 5, 1");
    }

    #[test]
    fn test_both_branches_with_missing_page() {
        let policy = SelectionPolicy::new(true, Some(9));
        let selection = select_pages(2, &policy);
        assert_eq!(selection.pages, vec![1, 2]);
        assert_eq!(selection.description(), "1, 2, page 9 does not exist");
    }

    #[test]
    fn test_zero_pages() {
        let first_last = select_pages(0, &SelectionPolicy::new(true, None));
        assert!(first_last.pages.is_empty());
        assert_eq!(first_last.description(), "");

        let specific = select_pages(0, &SelectionPolicy::new(true, Some(1)));
        assert!(specific.pages.is_empty());
        assert_eq!(specific.description(), "page 1 does not exist");

        let all = select_pages(0, &SelectionPolicy::default());
        assert!(all.pages.is_empty());
        assert_eq!(all.description(), "1 to 0");
    }

    #[test]
    fn test_specific_page_zero_is_missing() {
        let policy = SelectionPolicy {
            include_specific: true,
            specific_page: 0,
            ..SelectionPolicy::default()
        };
        let selection = select_pages(3, &policy);
        assert!(selection.pages.is_empty());
        assert_eq!(selection.description(), "page 0 does not exist");
    }

    #[test]
    fn test_policy_new_defaults_specific_page() {
        let policy = SelectionPolicy::new(true, None);
        assert!(!policy.include_specific);
        assert_eq!(policy.specific_page, 1);
        assert!(!policy.selects_all());
        assert!(SelectionPolicy::default().selects_all());
    }
}

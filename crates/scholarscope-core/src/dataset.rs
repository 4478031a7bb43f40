//! Publication list derivations: venue quick-filters, filtering and paging.
//!
//! Everything here is a pure function of `(papers, filter_venue, page)`.
//! [`DatasetView`] only holds the two pieces of view state and enforces the
//! reset/clamp rules when they change.

use std::collections::HashMap;

use crate::model::Paper;

/// Rows per page.
pub const PAGE_SIZE: usize = 10;

/// How many venues get a quick-filter entry.
pub const TOP_VENUES: usize = 6;

pub const ALL_PUBLICATIONS: &str = "All Publications";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueCount {
    pub name: String,
    pub count: usize,
}

/// A quick-filter entry. `venue == None` is the "All Publications" entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueOption {
    pub label: String,
    pub venue: Option<String>,
    pub count: usize,
}

/// Count papers per normalized venue, most frequent first. Ties keep the
/// order in which venues were first seen. Truncated to [`TOP_VENUES`].
pub fn venue_stats(papers: &[Paper]) -> Vec<VenueCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<VenueCount> = Vec::new();
    for paper in papers {
        let venue = paper.venue_label();
        match index.get(venue) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(venue, counts.len());
                counts.push(VenueCount {
                    name: venue.to_string(),
                    count: 1,
                });
            }
        }
    }
    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_VENUES);
    counts
}

/// Quick-filter list: "All Publications" first, then the top venues.
pub fn venue_options(papers: &[Paper]) -> Vec<VenueOption> {
    let mut options = Vec::with_capacity(TOP_VENUES + 1);
    options.push(VenueOption {
        label: ALL_PUBLICATIONS.to_string(),
        venue: None,
        count: papers.len(),
    });
    options.extend(venue_stats(papers).into_iter().map(|v| VenueOption {
        label: v.name.clone(),
        venue: Some(v.name),
        count: v.count,
    }));
    options
}

/// Papers whose normalized venue equals `venue`, or all of them for `None`.
pub fn filter_papers<'a>(papers: &'a [Paper], venue: Option<&str>) -> Vec<&'a Paper> {
    match venue {
        None => papers.iter().collect(),
        Some(v) => papers.iter().filter(|p| p.venue_label() == v).collect(),
    }
}

/// Number of pages for `total` rows (0 when empty).
pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// Clamp `page` into `[1, max(1, page_count)]`.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, page_count(total).max(1))
}

/// One page of the filtered publication list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub items: Vec<&'a Paper>,
    /// 1-based current page, already clamped.
    pub page: usize,
    pub page_count: usize,
    /// Size of the filtered set.
    pub total: usize,
    /// 1-based inclusive display range; both 0 for an empty set.
    pub start: usize,
    pub end: usize,
}

impl Page<'_> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// Pagination controls are only shown once there is more than one page.
    pub fn shows_controls(&self) -> bool {
        self.total > PAGE_SIZE
    }
}

/// Slice `filtered` down to `page` (clamped).
pub fn paginate<'a>(filtered: Vec<&'a Paper>, page: usize) -> Page<'a> {
    let total = filtered.len();
    let page = clamp_page(page, total);
    let offset = (page - 1) * PAGE_SIZE;
    let items: Vec<&Paper> = filtered.into_iter().skip(offset).take(PAGE_SIZE).collect();
    let (start, end) = if items.is_empty() {
        (0, 0)
    } else {
        (offset + 1, offset + items.len())
    };
    Page {
        items,
        page,
        page_count: page_count(total),
        total,
        start,
        end,
    }
}

/// Filter then paginate in one step.
pub fn derive_page<'a>(papers: &'a [Paper], venue: Option<&str>, page: usize) -> Page<'a> {
    paginate(filter_papers(papers, venue), page)
}

/// Venue filter and page cursor for one publication table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetView {
    filter_venue: Option<String>,
    current_page: usize,
}

impl Default for DatasetView {
    fn default() -> Self {
        Self {
            filter_venue: None,
            current_page: 1,
        }
    }
}

impl DatasetView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter_venue(&self) -> Option<&str> {
        self.filter_venue.as_deref()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Change the venue filter. Any actual change sends the view back to page 1.
    pub fn select_venue(&mut self, venue: Option<String>) {
        if venue != self.filter_venue {
            self.filter_venue = venue;
            self.current_page = 1;
        }
    }

    pub fn next_page(&mut self, papers: &[Paper]) {
        let total = self.filtered_len(papers);
        self.current_page = clamp_page(self.current_page + 1, total);
    }

    pub fn prev_page(&mut self, papers: &[Paper]) {
        let total = self.filtered_len(papers);
        self.current_page = clamp_page(self.current_page.saturating_sub(1), total);
    }

    /// Current page over `papers`.
    pub fn page<'a>(&self, papers: &'a [Paper]) -> Page<'a> {
        derive_page(papers, self.filter_venue(), self.current_page)
    }

    /// Back to the unfiltered first page (used when a new report arrives).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn filtered_len(&self, papers: &[Paper]) -> usize {
        match self.filter_venue() {
            None => papers.len(),
            Some(v) => papers.iter().filter(|p| p.venue_label() == v).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str, venue: Option<&str>) -> Paper {
        Paper {
            title: title.into(),
            year: Some(2020),
            venue: venue.map(String::from),
            rank: None,
            author_pos: None,
            citations: 0,
        }
    }

    fn papers_with_venues(venues: &[Option<&str>]) -> Vec<Paper> {
        venues
            .iter()
            .enumerate()
            .map(|(i, v)| paper(&format!("P{i}"), *v))
            .collect()
    }

    #[test]
    fn venue_stats_sorts_by_count_and_keeps_first_seen_ties() {
        let papers = papers_with_venues(&[
            Some("ICML"),
            Some("CVPR"),
            None,
            Some("CVPR"),
            Some("ICML"),
            Some("ACL"),
            Some("CVPR"),
        ]);
        let stats = venue_stats(&papers);
        let names: Vec<&str> = stats.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["CVPR", "ICML", "Unknown", "ACL"]);
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[1].count, 2);
        assert_eq!(stats[2].count, 1);
    }

    #[test]
    fn venue_stats_keeps_top_six() {
        let venues: Vec<Option<&str>> =
            ["A", "B", "C", "D", "E", "F", "G", "G"].iter().map(|v| Some(*v)).collect();
        let stats = venue_stats(&papers_with_venues(&venues));
        assert_eq!(stats.len(), TOP_VENUES);
        assert_eq!(stats[0].name, "G");
        assert_eq!(stats[0].count, 2);
        assert!(!stats.iter().any(|v| v.name == "F"));
    }

    #[test]
    fn venue_counts_match_filtered_sizes() {
        let papers = papers_with_venues(&[
            Some("NeurIPS"),
            None,
            Some("NeurIPS"),
            Some(""),
            Some("TPAMI"),
        ]);
        for v in venue_stats(&papers) {
            assert_eq!(filter_papers(&papers, Some(&v.name)).len(), v.count);
        }
        assert_eq!(filter_papers(&papers, Some("Unknown")).len(), 2);
    }

    #[test]
    fn all_publications_is_first_with_total_count() {
        let venues: Vec<Option<&str>> = (0..9).map(|_| Some("X")).collect();
        let papers = papers_with_venues(&venues);
        let options = venue_options(&papers);
        assert_eq!(options[0].label, ALL_PUBLICATIONS);
        assert_eq!(options[0].venue, None);
        assert_eq!(options[0].count, 9);
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn all_publications_present_for_empty_list() {
        let options = venue_options(&[]);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].count, 0);
    }

    #[test]
    fn page_sizes_sum_to_total() {
        for n in [0usize, 1, 9, 10, 11, 20, 23, 57] {
            let venues: Vec<Option<&str>> = (0..n).map(|_| None).collect();
            let papers = papers_with_venues(&venues);
            let pages = page_count(n);
            let mut seen = 0;
            for p in 1..=pages {
                let page = derive_page(&papers, None, p);
                seen += page.items.len();
                if p == pages {
                    let expected_last = if n % PAGE_SIZE == 0 { PAGE_SIZE } else { n % PAGE_SIZE };
                    assert_eq!(page.items.len(), expected_last, "n = {n}");
                }
            }
            assert_eq!(seen, n);
        }
    }

    #[test]
    fn display_range_is_one_based_inclusive() {
        let venues: Vec<Option<&str>> = (0..23).map(|_| None).collect();
        let papers = papers_with_venues(&venues);
        let page = derive_page(&papers, None, 3);
        assert_eq!((page.start, page.end, page.total), (21, 23, 23));
        assert!(page.has_prev());
        assert!(!page.has_next());
        let first = derive_page(&papers, None, 1);
        assert_eq!((first.start, first.end), (1, 10));
        assert!(!first.has_prev());
        assert!(first.has_next());
    }

    #[test]
    fn empty_set_has_zero_range_and_page_one() {
        let page = derive_page(&[], None, 4);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 0);
        assert_eq!((page.start, page.end), (0, 0));
        assert!(!page.has_prev());
        assert!(!page.has_next());
        assert!(!page.shows_controls());
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let venues: Vec<Option<&str>> = (0..15).map(|_| None).collect();
        let papers = papers_with_venues(&venues);
        assert_eq!(derive_page(&papers, None, 99).page, 2);
        assert_eq!(derive_page(&papers, None, 0).page, 1);
    }

    #[test]
    fn changing_filter_resets_page() {
        let mut venues: Vec<Option<&str>> = (0..30).map(|_| Some("A")).collect();
        venues.extend((0..12).map(|_| Some("B")));
        let papers = papers_with_venues(&venues);
        let mut view = DatasetView::new();
        view.next_page(&papers);
        view.next_page(&papers);
        assert_eq!(view.current_page(), 3);

        view.select_venue(Some("B".into()));
        assert_eq!(view.current_page(), 1);
        view.next_page(&papers);
        assert_eq!(view.current_page(), 2);

        // re-selecting the same venue does not move the page
        view.select_venue(Some("B".into()));
        assert_eq!(view.current_page(), 2);

        view.select_venue(None);
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn navigation_never_leaves_range() {
        let venues: Vec<Option<&str>> = (0..21).map(|_| None).collect();
        let papers = papers_with_venues(&venues);
        let mut view = DatasetView::new();
        view.prev_page(&papers);
        assert_eq!(view.current_page(), 1);
        for _ in 0..10 {
            view.next_page(&papers);
        }
        assert_eq!(view.current_page(), 3);

        let mut empty = DatasetView::new();
        empty.next_page(&[]);
        assert_eq!(empty.current_page(), 1);
    }
}

// Tab search for the popup.
//
// `SearchSession` owns the per-popup search configuration and the loaded
// tabs; `FuzzyFilter` is the default matcher. Hosts can inject any other
// `TabFilter`, including a plain closure.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::modules::deleted_tabs::DeletedTabsCache;
use crate::modules::popup::PopupView;
use crate::settings::{FuzzySettings, Settings};
use crate::state::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Title,
    Url,
}

impl SearchKey {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "url" => Some(Self::Url),
            _ => None,
        }
    }

    fn text(self, tab: &Tab) -> String {
        match self {
            Self::Title => tab.title.clone(),
            Self::Url => tab.schemeless_url(),
        }
    }
}

/// Fuzzy settings as the filter sees them: everything except the enable
/// flag, which is folded into the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub threshold: f64,
    pub keys: Vec<SearchKey>,
    pub should_sort: bool,
    pub case_sensitive: bool,
}

impl SearchOptions {
    pub fn from_fuzzy(fuzzy: &FuzzySettings) -> Self {
        let keys = fuzzy
            .keys
            .iter()
            .filter_map(|name| {
                let key = SearchKey::parse(name);
                if key.is_none() {
                    log::warn!("[Search] Ignoring unknown search key '{}'", name);
                }
                key
            })
            .collect();

        // Fuzzy search off means exact substring matching only
        let threshold = if fuzzy.enable_fuzzy_search {
            fuzzy.threshold
        } else {
            0.0
        };

        Self {
            threshold,
            keys,
            should_sort: fuzzy.should_sort,
            case_sensitive: fuzzy.case_sensitive,
        }
    }
}

pub trait TabFilter {
    fn filter(&self, query: &str, options: &SearchOptions, tabs: Vec<Tab>) -> Vec<Tab>;
}

impl<F> TabFilter for F
where
    F: Fn(&str, &SearchOptions, Vec<Tab>) -> Vec<Tab>,
{
    fn filter(&self, query: &str, options: &SearchOptions, tabs: Vec<Tab>) -> Vec<Tab> {
        self(query, options, tabs)
    }
}

/// Reusable nucleo state for one query, scored against every tab field.
struct QueryMatcher {
    pattern: Pattern,
    matcher: Matcher,
    buf: Vec<char>,
    // Score of the query matched against itself, the best any field can do
    self_score: f64,
}

impl QueryMatcher {
    fn new(query: &str, options: &SearchOptions) -> Self {
        let case = if options.case_sensitive {
            CaseMatching::Respect
        } else {
            CaseMatching::Ignore
        };
        // Threshold 0 means every query word must appear verbatim
        let kind = if options.threshold <= 0.0 {
            AtomKind::Substring
        } else {
            AtomKind::Fuzzy
        };

        let mut ctx = Self {
            pattern: Pattern::new(query, case, Normalization::Smart, kind),
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::with_capacity(64),
            self_score: 1.0,
        };
        if let Some(best) = ctx.score(query) {
            ctx.self_score = f64::from(best.max(1));
        }
        ctx
    }

    fn score(&mut self, haystack: &str) -> Option<u32> {
        self.buf.clear();
        let utf32 = Utf32Str::new(haystack, &mut self.buf);
        self.pattern.score(utf32, &mut self.matcher)
    }

    /// 0 for a match as good as the query itself, approaching 1 for the
    /// weakest fuzzy hit.
    fn distance(&mut self, haystack: &str) -> Option<f64> {
        let score = f64::from(self.score(haystack)?);
        Some(1.0 - (score / self.self_score).min(1.0))
    }
}

/// Default matcher backed by nucleo. A tab's distance is its best field
/// score normalized against the query's self-match; tabs within the
/// threshold match. Threshold 0 switches to exact substring matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyFilter;

impl TabFilter for FuzzyFilter {
    fn filter(&self, query: &str, options: &SearchOptions, tabs: Vec<Tab>) -> Vec<Tab> {
        if query.is_empty() {
            return tabs;
        }

        let mut ctx = QueryMatcher::new(query, options);
        let substring_only = options.threshold <= 0.0;

        let mut matches: Vec<(f64, Tab)> = tabs
            .into_iter()
            .filter_map(|tab| {
                let distance = options
                    .keys
                    .iter()
                    .filter_map(|key| ctx.distance(&key.text(&tab)))
                    .reduce(f64::min)?;
                (substring_only || distance <= options.threshold).then_some((distance, tab))
            })
            .collect();

        if options.should_sort {
            // Stable, so equal scores keep their tab order
            matches.sort_by(|a, b| a.0.total_cmp(&b.0));
        }

        matches.into_iter().map(|(_, tab)| tab).collect()
    }
}

/// Search state for one popup: the options read from settings when the popup
/// opened, the tabs it was given, and the shared deleted-tabs cache.
pub struct SearchSession<F = FuzzyFilter> {
    options: SearchOptions,
    loaded_tabs: Vec<Tab>,
    deleted: DeletedTabsCache,
    filter: F,
}

impl SearchSession<FuzzyFilter> {
    pub fn new(settings: &Settings, loaded_tabs: Vec<Tab>, deleted: DeletedTabsCache) -> Self {
        Self::with_filter(settings, loaded_tabs, deleted, FuzzyFilter)
    }
}

impl<F: TabFilter> SearchSession<F> {
    pub fn with_filter(
        settings: &Settings,
        loaded_tabs: Vec<Tab>,
        deleted: DeletedTabsCache,
        filter: F,
    ) -> Self {
        Self {
            options: SearchOptions::from_fuzzy(&settings.fuzzy),
            loaded_tabs,
            deleted,
            filter,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn deleted(&self) -> &DeletedTabsCache {
        &self.deleted
    }

    pub fn loaded_tabs(&self) -> &[Tab] {
        &self.loaded_tabs
    }

    /// Re-filter for the current search box text and render the result.
    pub fn update<V: PopupView + ?Sized>(&self, view: &mut V, search_text: &str) -> Vec<Tab> {
        let is_search_empty = search_text.is_empty();
        view.set_clear_button_visible(!is_search_empty);

        let query = search_text.trim().to_lowercase();
        let live = self.deleted.retain_live(&self.loaded_tabs);

        let results = if is_search_empty {
            live
        } else {
            self.filter.filter(&query, &self.options, live)
        };

        log::debug!("[Search] '{}' matched {} tab(s)", query, results.len());
        view.render_tabs(&results);
        results
    }
}

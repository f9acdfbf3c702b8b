//! In-memory history with one-shot route state.
//!
//! State attached by [`Navigator::navigate`] can be read back exactly once
//! with [`Navigator::take_state`]. Walking history back onto an entry whose
//! state was consumed yields nothing, the same as a reload or a direct link.

use crate::contract::SearchHandoff;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Search,
    Blog(String),
    Video(String),
    Contact,
    Questions,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Search => "/search".to_string(),
            Self::Blog(id) => format!("/blogs/{id}"),
            Self::Video(id) => format!("/videos/{id}"),
            Self::Contact => "/contact".to_string(),
            Self::Questions => "/questions".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let path = trimmed
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        match path {
            "" => Some(Self::Home),
            "/search" => Some(Self::Search),
            "/contact" => Some(Self::Contact),
            "/questions" => Some(Self::Questions),
            _ => {
                if let Some(id) = path.strip_prefix("/blogs/") {
                    return non_empty_segment(id).map(Self::Blog);
                }
                if let Some(id) = path.strip_prefix("/videos/") {
                    return non_empty_segment(id).map(Self::Video);
                }
                None
            }
        }
    }
}

fn non_empty_segment(segment: &str) -> Option<String> {
    if segment.is_empty() || segment.contains('/') {
        None
    } else {
        Some(segment.to_string())
    }
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    route: Route,
    state: Option<SearchHandoff>,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            entries: vec![HistoryEntry {
                route: start,
                state: None,
            }],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Route {
        &self.entries[self.cursor].route
    }

    /// Pushes a new entry, discarding any forward history.
    pub fn navigate(&mut self, route: Route, state: Option<SearchHandoff>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry { route, state });
        self.cursor = self.entries.len() - 1;
    }

    pub fn take_state(&mut self) -> Option<SearchHandoff> {
        self.entries[self.cursor].state.take()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.cursor += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/search?q=x"), Some(Route::Search));
        assert_eq!(Route::parse("/blogs/abc"), Some(Route::Blog("abc".into())));
        assert_eq!(Route::parse("/videos/v1/"), Some(Route::Video("v1".into())));
        assert_eq!(Route::parse("/blogs/"), None);
        assert_eq!(Route::parse("/admin"), None);
    }

    #[test]
    fn path_round_trips_through_parse() {
        for route in [
            Route::Home,
            Route::Search,
            Route::Blog("b1".into()),
            Route::Video("v1".into()),
            Route::Contact,
            Route::Questions,
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn navigate_drops_forward_history() {
        let mut nav = Navigator::default();
        nav.navigate(Route::Contact, None);
        nav.back();
        nav.navigate(Route::Questions, None);
        assert!(!nav.can_go_forward());
        assert_eq!(nav.current(), &Route::Questions);
    }
}

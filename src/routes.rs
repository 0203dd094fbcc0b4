//! Client-side navigation surface.

use std::fmt;

use url::form_urlencoded;

use crate::model::RecordId;

/// Every screen the console can show.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    Home,
    Metrics,
    MetricNew,
    MetricDetail(RecordId),
    MetricEdit(RecordId),
    Segments,
    SegmentNew,
    SegmentDetail(RecordId),
    SegmentEdit(RecordId),
    Insights,
    InsightNew,
    InsightDetail { category: String, id: RecordId },
    Experiments,
    ExperimentNew,
    ExperimentDetail(RecordId),
    ExperimentEdit(RecordId),
}

/// One breadcrumb entry; `route` is `None` for the current page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub route: Option<Route>,
}

impl Route {
    /// Parse a path such as `/metrics/7/edit`. Trailing slashes and a query
    /// string are ignored; unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        let route = match parts.as_slice() {
            [] => Self::Home,
            ["metrics"] => Self::Metrics,
            ["metrics", "new"] => Self::MetricNew,
            ["metrics", raw] => Self::MetricDetail(parse_id(raw)?),
            ["metrics", raw, "edit"] => Self::MetricEdit(parse_id(raw)?),
            ["segments"] => Self::Segments,
            ["segments", "new"] => Self::SegmentNew,
            ["segments", raw] => Self::SegmentDetail(parse_id(raw)?),
            ["segments", raw, "edit"] => Self::SegmentEdit(parse_id(raw)?),
            ["insights"] => Self::Insights,
            ["insights", "new"] => Self::InsightNew,
            ["insights", category, raw] => Self::InsightDetail {
                category: decode_segment(category)?,
                id: parse_id(raw)?,
            },
            ["experiments"] => Self::Experiments,
            ["experiments", "new"] => Self::ExperimentNew,
            ["experiments", raw] => Self::ExperimentDetail(parse_id(raw)?),
            ["experiments", raw, "edit"] => Self::ExperimentEdit(parse_id(raw)?),
            _ => return None,
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Metrics => "/metrics".to_string(),
            Self::MetricNew => "/metrics/new".to_string(),
            Self::MetricDetail(id) => format!("/metrics/{id}"),
            Self::MetricEdit(id) => format!("/metrics/{id}/edit"),
            Self::Segments => "/segments".to_string(),
            Self::SegmentNew => "/segments/new".to_string(),
            Self::SegmentDetail(id) => format!("/segments/{id}"),
            Self::SegmentEdit(id) => format!("/segments/{id}/edit"),
            Self::Insights => "/insights".to_string(),
            Self::InsightNew => "/insights/new".to_string(),
            Self::InsightDetail { category, id } => {
                format!("/insights/{}/{id}", encode_segment(category))
            }
            Self::Experiments => "/experiments".to_string(),
            Self::ExperimentNew => "/experiments/new".to_string(),
            Self::ExperimentDetail(id) => format!("/experiments/{id}"),
            Self::ExperimentEdit(id) => format!("/experiments/{id}/edit"),
        }
    }

    /// Top-level section this route belongs to, used to highlight the nav.
    pub fn section(&self) -> Route {
        match self {
            Self::Home => Self::Home,
            Self::Metrics | Self::MetricNew | Self::MetricDetail(_) | Self::MetricEdit(_) => {
                Self::Metrics
            }
            Self::Segments | Self::SegmentNew | Self::SegmentDetail(_) | Self::SegmentEdit(_) => {
                Self::Segments
            }
            Self::Insights | Self::InsightNew | Self::InsightDetail { .. } => Self::Insights,
            Self::Experiments
            | Self::ExperimentNew
            | Self::ExperimentDetail(_)
            | Self::ExperimentEdit(_) => Self::Experiments,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Metrics => "Metrics",
            Self::MetricNew => "New metric",
            Self::MetricDetail(_) => "Metric",
            Self::MetricEdit(_) => "Edit metric",
            Self::Segments => "Segments",
            Self::SegmentNew => "New segment",
            Self::SegmentDetail(_) => "Segment",
            Self::SegmentEdit(_) => "Edit segment",
            Self::Insights => "Insights",
            Self::InsightNew => "New insight",
            Self::InsightDetail { .. } => "Insight",
            Self::Experiments => "Experiments",
            Self::ExperimentNew => "New experiment",
            Self::ExperimentDetail(_) => "Experiment",
            Self::ExperimentEdit(_) => "Edit experiment",
        }
    }

    /// Parent in the breadcrumb trail.
    pub fn parent(&self) -> Option<Route> {
        match self {
            Self::Home => None,
            Self::Metrics | Self::Segments | Self::Insights | Self::Experiments => Some(Self::Home),
            Self::MetricEdit(id) => Some(Self::MetricDetail(*id)),
            Self::SegmentEdit(id) => Some(Self::SegmentDetail(*id)),
            Self::ExperimentEdit(id) => Some(Self::ExperimentDetail(*id)),
            other => Some(other.section()),
        }
    }

    /// Trail from Home to this route; the last entry has no link.
    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        let mut trail = vec![Crumb {
            label: self.title().to_string(),
            route: None,
        }];
        let mut current = self.parent();
        while let Some(route) = current {
            current = route.parent();
            trail.push(Crumb {
                label: route.title().to_string(),
                route: Some(route),
            });
        }
        trail.reverse();
        trail
    }
}

fn parse_id(text: &str) -> Option<RecordId> {
    text.parse().ok()
}

/// Free-text segments such as insight categories may hold `/`, `?` or spaces.
fn encode_segment(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

fn decode_segment(raw: &str) -> Option<String> {
    // Encoded segments carry no `&` or `=`, so the whole input is one key.
    form_urlencoded::parse(raw.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Navigation history with Back support.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    current: Route,
    back: Vec<Route>,
}

const MAX_HISTORY: usize = 50;

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            back: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Go to `route`; navigating to the current route is a no-op.
    pub fn push(&mut self, route: Route) -> bool {
        if route == self.current {
            return false;
        }
        let previous = std::mem::replace(&mut self.current, route);
        self.back.push(previous);
        if self.back.len() > MAX_HISTORY {
            self.back.remove(0);
        }
        true
    }

    /// Replace the current entry without growing history (after a save redirect).
    pub fn replace(&mut self, route: Route) {
        self.current = route;
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn back(&mut self) -> Option<&Route> {
        let previous = self.back.pop()?;
        self.current = previous;
        Some(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_round_trips() {
        let routes = [
            Route::Home,
            Route::Metrics,
            Route::MetricNew,
            Route::MetricDetail(7),
            Route::MetricEdit(7),
            Route::Segments,
            Route::SegmentNew,
            Route::SegmentDetail(3),
            Route::SegmentEdit(3),
            Route::Insights,
            Route::InsightNew,
            Route::InsightDetail {
                category: "retention".into(),
                id: 9,
            },
            Route::Experiments,
            Route::ExperimentNew,
            Route::ExperimentDetail(4),
            Route::ExperimentEdit(4),
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route.clone()), "{route}");
        }
    }

    #[test]
    fn insight_categories_with_reserved_characters_round_trip() {
        for category in ["A/B", "growth & retention", "50% off?", "신규 가입"] {
            let route = Route::InsightDetail {
                category: category.into(),
                id: 12,
            };
            let path = route.path();
            assert_eq!(path.matches('/').count(), 3, "{path}");
            assert_eq!(Route::parse(&path), Some(route));
        }
    }

    #[test]
    fn parse_tolerates_slashes_and_queries() {
        assert_eq!(Route::parse("/metrics/"), Some(Route::Metrics));
        assert_eq!(Route::parse("metrics/12?tab=history"), Some(Route::MetricDetail(12)));
        assert_eq!(Route::parse("/metrics/abc"), None);
        assert_eq!(Route::parse("/campaigns"), None);
    }

    #[test]
    fn breadcrumbs_walk_up_to_home() {
        let labels: Vec<String> = Route::MetricEdit(7)
            .breadcrumbs()
            .into_iter()
            .map(|crumb| crumb.label)
            .collect();
        assert_eq!(labels, vec!["Home", "Metrics", "Metric", "Edit metric"]);
        let crumbs = Route::Home.breadcrumbs();
        assert_eq!(crumbs.len(), 1);
        assert!(crumbs[0].route.is_none());
    }

    #[test]
    fn history_goes_back() {
        let mut history = History::new(Route::Home);
        assert!(history.push(Route::Metrics));
        assert!(!history.push(Route::Metrics));
        history.push(Route::MetricDetail(1));
        assert_eq!(history.back(), Some(&Route::Metrics));
        assert_eq!(history.back(), Some(&Route::Home));
        assert_eq!(history.back(), None);
        assert_eq!(history.current(), &Route::Home);
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::EnumIter;

use crate::api::models::LogType;
use crate::chart::ChartVariant;
use crate::config::API;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter)]
pub enum Page {
    #[default]
    Dashboard,
    Users,
    Strategies,
    StrategyLogs,
    Assets,
    Charts,
    ManualTrade,
}

impl Page {
    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Users => "User Management",
            Page::Strategies => "Strategies",
            Page::StrategyLogs => "Strategy Logs",
            Page::Assets => "Assets",
            Page::Charts => "Charts",
            Page::ManualTrade => "Manual Trading",
        }
    }

    /// Shown in the navigation bar. Strategy logs are reached from a strategy row.
    pub fn in_nav(&self) -> bool {
        !matches!(self, Page::StrategyLogs)
    }

    /// Chart configuration, for pages that show a price chart.
    pub fn chart_variant(&self) -> Option<ChartVariant> {
        match self {
            Page::Dashboard => Some(ChartVariant::summary()),
            Page::Charts => Some(ChartVariant::market()),
            Page::ManualTrade => Some(ChartVariant::manual_trade()),
            _ => None,
        }
    }
}

/// Data each page keeps fresh while mounted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Feed {
    CurrentUser,
    Portfolio,
    Dashboard,
    BotConfig,
    Users,
    Strategies,
    Logs(LogType),
    Assets,
    Market,
}

/// Subscriptions held while `page` is mounted, with their poll interval.
pub fn page_feeds(page: Page) -> Vec<(Feed, Option<Duration>)> {
    let polls = &API.polls;
    match page {
        Page::Dashboard => vec![
            (Feed::Dashboard, polls.dashboard()),
            (Feed::BotConfig, None),
            (Feed::Market, polls.market()),
        ],
        Page::Users => vec![(Feed::Users, None)],
        Page::Strategies => vec![(Feed::Strategies, None)],
        Page::StrategyLogs => vec![
            (Feed::Logs(LogType::Trade), polls.logs()),
            (Feed::Logs(LogType::Detail), polls.logs()),
        ],
        Page::Assets => vec![(Feed::Assets, None)],
        Page::Charts | Page::ManualTrade => vec![(Feed::Market, polls.market())],
    }
}

/// Subscriptions held for the whole authenticated session.
pub fn session_feeds() -> Vec<(Feed, Option<Duration>)> {
    vec![
        (Feed::CurrentUser, None),
        (Feed::Portfolio, API.polls.portfolio()),
    ]
}

/// Current page plus an epoch that advances on every page change.
/// Work spawned under an older epoch belongs to a torn-down page.
#[derive(Debug, Default)]
pub struct Router {
    current: Page,
    epoch: u64,
}

impl Router {
    pub fn new(page: Page) -> Self {
        Self {
            current: page,
            epoch: 0,
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns true if the page changed.
    pub fn navigate(&mut self, page: Page) -> bool {
        if page == self.current {
            return false;
        }
        self.current = page;
        self.epoch += 1;
        true
    }

    /// Tear down and remount the current page (login, pair reset).
    pub fn remount(&mut self) {
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn navigation_advances_epoch_only_on_change() {
        let mut router = Router::new(Page::Dashboard);
        assert!(!router.navigate(Page::Dashboard));
        assert_eq!(router.epoch(), 0);

        assert!(router.navigate(Page::Charts));
        assert_eq!(router.current(), Page::Charts);
        assert_eq!(router.epoch(), 1);

        router.remount();
        assert_eq!(router.epoch(), 2);
    }

    #[test]
    fn logs_page_polls_both_log_types() {
        let feeds = page_feeds(Page::StrategyLogs);
        assert_eq!(feeds.len(), 2);
        assert!(feeds.iter().all(|(_, every)| every.is_some()));
    }

    #[test]
    fn chart_pages_poll_market() {
        for page in [Page::Charts, Page::ManualTrade] {
            assert!(page.chart_variant().is_some());
            assert!(page_feeds(page).iter().any(|(f, _)| *f == Feed::Market));
        }
        assert!(Page::Assets.chart_variant().is_none());
    }

    #[test]
    fn logs_page_is_hidden_from_nav() {
        let nav: Vec<Page> = Page::iter().filter(Page::in_nav).collect();
        assert!(!nav.contains(&Page::StrategyLogs));
        assert_eq!(nav.len(), 6);
    }
}

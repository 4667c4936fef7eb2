// Task kind and split strategy value objects

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    Page,
    UrlList,
}

impl SplitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitStrategy::Page => "page",
            SplitStrategy::UrlList => "url_list",
        }
    }
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    QianyiSync,
    TiktokReview,
    FastmossCrawl,
}

impl TaskKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "qianyi_sync" => Some(TaskKind::QianyiSync),
            "tiktok_review" => Some(TaskKind::TiktokReview),
            "fastmoss_crawl" => Some(TaskKind::FastmossCrawl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::QianyiSync => "qianyi_sync",
            TaskKind::TiktokReview => "tiktok_review",
            TaskKind::FastmossCrawl => "fastmoss_crawl",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::QianyiSync => "Qianyi order sync",
            TaskKind::TiktokReview => "TikTok review crawl",
            TaskKind::FastmossCrawl => "FastMoss crawl",
        }
    }

    /// URL-driven crawls need at least one target URL.
    pub fn requires_urls(&self) -> bool {
        !matches!(self, TaskKind::QianyiSync)
    }

    pub fn split_strategy(&self) -> SplitStrategy {
        if self.requires_urls() {
            SplitStrategy::UrlList
        } else {
            SplitStrategy::Page
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_strategy_follows_url_requirement() {
        assert_eq!(TaskKind::QianyiSync.split_strategy(), SplitStrategy::Page);
        assert_eq!(TaskKind::TiktokReview.split_strategy(), SplitStrategy::UrlList);
        assert_eq!(TaskKind::FastmossCrawl.split_strategy(), SplitStrategy::UrlList);
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        assert_eq!(TaskKind::parse("FASTMOSS_CRAWL"), Some(TaskKind::FastmossCrawl));
        assert_eq!(TaskKind::parse("shopee_sync"), None);
    }
}

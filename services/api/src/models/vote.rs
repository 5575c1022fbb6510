//! Vote ledger domain types

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Valid sections that can be voted on
pub const VOTE_SECTIONS: [&str; 4] = ["prices", "news", "ai", "memes"];

/// True when the section is one of the four votable dashboard areas
pub fn is_valid_section(section: &str) -> bool {
    VOTE_SECTIONS.contains(&section)
}

/// A recorded vote
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: i64,
    pub user_id: i64,
    pub section: String,
    pub vote: bool,
    pub created_at: DateTime<Utc>,
}

/// Upvote/downvote counts for one section
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionStats {
    pub upvotes: i64,
    pub downvotes: i64,
}

/// Aggregated statistics over the four fixed sections
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VoteStats {
    pub prices: SectionStats,
    pub news: SectionStats,
    pub ai: SectionStats,
    pub memes: SectionStats,
}

/// One row of the GROUP BY (section, vote) aggregation
#[derive(Debug, Clone)]
pub struct VoteCountRow {
    pub section: String,
    pub vote: bool,
    pub count: i64,
}

/// Merge grouped counts into a zero-initialized four-section table, so
/// sections with no votes report zero rather than being absent.
pub fn aggregate_stats(rows: &[VoteCountRow]) -> VoteStats {
    let mut stats = VoteStats::default();

    for row in rows {
        let section = match row.section.as_str() {
            "prices" => &mut stats.prices,
            "news" => &mut stats.news,
            "ai" => &mut stats.ai,
            "memes" => &mut stats.memes,
            _ => continue,
        };

        if row.vote {
            section.upvotes = row.count;
        } else {
            section.downvotes = row.count;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(section: &str, vote: bool, count: i64) -> VoteCountRow {
        VoteCountRow {
            section: section.to_string(),
            vote,
            count,
        }
    }

    #[test]
    fn test_sections_without_votes_report_zero() {
        let stats = aggregate_stats(&[]);

        assert_eq!(stats.prices, SectionStats::default());
        assert_eq!(stats.news, SectionStats::default());
        assert_eq!(stats.ai, SectionStats::default());
        assert_eq!(stats.memes, SectionStats::default());
    }

    #[test]
    fn test_counts_match_grouped_rows() {
        let rows = vec![
            row("prices", true, 4),
            row("prices", false, 1),
            row("news", false, 2),
            row("ai", true, 7),
            row("memes", true, 1),
            row("memes", false, 3),
        ];

        let stats = aggregate_stats(&rows);

        assert_eq!(stats.prices, SectionStats { upvotes: 4, downvotes: 1 });
        assert_eq!(stats.news, SectionStats { upvotes: 0, downvotes: 2 });
        assert_eq!(stats.ai, SectionStats { upvotes: 7, downvotes: 0 });
        assert_eq!(stats.memes, SectionStats { upvotes: 1, downvotes: 3 });
    }

    #[test]
    fn test_repeat_votes_accumulate() {
        // The ledger is append-only: three repeat upvotes by one user on
        // the same section count three times, not once.
        let stats = aggregate_stats(&[row("prices", true, 3)]);
        assert_eq!(stats.prices.upvotes, 3);
    }

    #[test]
    fn test_unknown_sections_are_ignored() {
        let stats = aggregate_stats(&[row("charts", true, 5)]);
        assert_eq!(stats, VoteStats::default());
    }

    #[test]
    fn test_section_enumeration() {
        for section in VOTE_SECTIONS {
            assert!(is_valid_section(section));
        }
        assert!(!is_valid_section("ai-insights"));
        assert!(!is_valid_section(""));
    }
}

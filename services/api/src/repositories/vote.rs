//! Vote repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row};

use crate::models::vote::{Vote, VoteCountRow, VoteStats, aggregate_stats};

/// Vote repository
#[derive(Clone)]
pub struct VoteRepository {
    pool: PgPool,
}

impl VoteRepository {
    /// Create a new vote repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a vote record
    ///
    /// The ledger is append-only: repeat votes by the same user for the same
    /// section accumulate, there is no upsert.
    pub async fn insert(&self, user_id: i64, section: &str, vote: bool) -> Result<Vote> {
        let row = sqlx::query(
            r#"
            INSERT INTO votes (user_id, section, vote)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, section, vote, created_at
            "#,
        )
        .bind(user_id)
        .bind(section)
        .bind(vote)
        .fetch_one(&self.pool)
        .await?;

        Ok(Vote {
            id: row.get("id"),
            user_id: row.get("user_id"),
            section: row.get("section"),
            vote: row.get("vote"),
            created_at: row.get("created_at"),
        })
    }

    /// A user's voting history, most recent first
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Vote>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, section, vote, created_at
            FROM votes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Vote {
                id: row.get("id"),
                user_id: row.get("user_id"),
                section: row.get("section"),
                vote: row.get("vote"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Upvote/downvote counts per section across all users
    pub async fn stats(&self) -> Result<VoteStats> {
        let rows = sqlx::query(
            r#"
            SELECT section, vote, COUNT(*) AS count
            FROM votes
            GROUP BY section, vote
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let rows: Vec<VoteCountRow> = rows
            .into_iter()
            .map(|row| VoteCountRow {
                section: row.get("section"),
                vote: row.get("vote"),
                count: row.get("count"),
            })
            .collect();

        Ok(aggregate_stats(&rows))
    }
}

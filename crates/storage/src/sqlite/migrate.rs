use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// Creates the full schema: content tables (word pairs, fill-in-the-blank
/// rows, image-choice records) keyed by category, plus learner progress
/// tables.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS word_pairs (
                    id INTEGER PRIMARY KEY,
                    category TEXT NOT NULL,
                    source_word TEXT NOT NULL,
                    target_word TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS fill_blank_items (
                    id INTEGER PRIMARY KEY,
                    category TEXT NOT NULL,
                    sentence_template TEXT NOT NULL,
                    correct_word TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS image_choices (
                    id INTEGER PRIMARY KEY,
                    category TEXT NOT NULL,
                    image_ref TEXT NOT NULL,
                    correct_word TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS module_completions (
                    user_id INTEGER NOT NULL,
                    module INTEGER NOT NULL CHECK (module >= 1),
                    topic TEXT NOT NULL,
                    PRIMARY KEY (user_id, module)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS test_results (
                    user_id INTEGER PRIMARY KEY,
                    score INTEGER NOT NULL CHECK (score >= 0),
                    test_date TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_word_pairs_category ON word_pairs (category);",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_fill_blank_items_category \
             ON fill_blank_items (category);",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_image_choices_category ON image_choices (category);",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)")
            .bind(1_i64)
            .bind(Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
    }

    Ok(())
}

//! SQLite-backed directory.
//!
//! The service only reads from the `voters` table; the schema is created when
//! missing so a fresh deployment can be loaded by an external import.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};

use super::{DirectoryError, VoterDirectory};
use crate::models::{SearchParams, VoterRecord};

/// Open the directory database and make sure the schema exists.
pub async fn init_directory(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS voters (
            id TEXT PRIMARY KEY,
            full_name TEXT NOT NULL DEFAULT '',
            father_name TEXT,
            mother_name TEXT,
            date_of_birth TEXT NOT NULL,
            ward TEXT NOT NULL,
            center_name TEXT,
            voter_number TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_voters_dob_ward ON voters(date_of_birth, ward);")
        .execute(&pool)
        .await?;

    Ok(pool)
}

/// Directory reading voter rows from SQLite.
#[derive(Clone)]
pub struct SqliteDirectory {
    pool: SqlitePool,
}

impl SqliteDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoterDirectory for SqliteDirectory {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<VoterRecord>, DirectoryError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, full_name, father_name, mother_name, date_of_birth, ward, center_name, voter_number, created_at FROM voters WHERE date_of_birth = ",
        );
        query.push_bind(params.date_of_birth.as_str());
        query.push(" AND ward IN (");
        let mut wards = query.separated(", ");
        for ward in params.ward.candidates() {
            wards.push_bind(ward);
        }
        wards.push_unseparated(")");
        query.push(" ORDER BY voter_number");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        // SQLite's LIKE and lower() only fold ASCII, so the name fragment is
        // matched here with Unicode lowercasing.
        rows.iter()
            .map(voter_from_row)
            .filter(|voter| match voter {
                Ok(v) => params.name_matches(&v.full_name),
                Err(_) => true,
            })
            .collect()
    }
}

fn map_sqlx_error(err: sqlx::Error) -> DirectoryError {
    tracing::error!("Directory query failed: {:?}", err);
    match err {
        sqlx::Error::Io(e) => DirectoryError::Network(e.to_string()),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            DirectoryError::Network(err.to_string())
        }
        other => DirectoryError::Service(other.to_string()),
    }
}

fn voter_from_row(row: &SqliteRow) -> Result<VoterRecord, DirectoryError> {
    let dob: String = row.get("date_of_birth");
    let date_of_birth = NaiveDate::parse_from_str(dob.trim(), "%Y-%m-%d").map_err(|e| {
        DirectoryError::Service(format!("Invalid date_of_birth {dob:?} in directory: {e}"))
    })?;

    Ok(VoterRecord {
        id: row.get("id"),
        full_name: row.get("full_name"),
        father_name: row.get("father_name"),
        mother_name: row.get("mother_name"),
        date_of_birth,
        ward: row.get("ward"),
        center_name: row
            .get::<Option<String>, _>("center_name")
            .unwrap_or_default(),
        voter_number: row
            .get::<Option<String>, _>("voter_number")
            .unwrap_or_default(),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
pub(crate) async fn insert_voter(pool: &SqlitePool, voter: &VoterRecord) {
    sqlx::query(
        "INSERT INTO voters (id, full_name, father_name, mother_name, date_of_birth, ward, center_name, voter_number) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&voter.id)
    .bind(&voter.full_name)
    .bind(&voter.father_name)
    .bind(&voter.mother_name)
    .bind(voter.date_of_birth.format("%Y-%m-%d").to_string())
    .bind(&voter.ward)
    .bind(&voter.center_name)
    .bind(&voter.voter_number)
    .execute(pool)
    .await
    .unwrap();
}

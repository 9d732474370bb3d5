//! SQLite-backed store for statement rows, prices and REIT profiles.

use crate::error::Result;
use crate::source::{FundamentalsSource, ProfileSource};
use crate::types::{LineItemObservation, PriceObservation, ReitProfile, StatementKind};
use rusqlite::{Connection, params, params_from_iter};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Upper bound on bound parameters per statement. SQLite builds before 3.32
/// cap host parameters at 999.
const MAX_BOUND_PARAMS: usize = 900;

/// SQLite store for fundamentals and market data.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at `path`.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        info!(path = %path.display(), "opened store");
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        // Long-format statement rows. A plain UNIQUE key would treat NULL
        // quarters as distinct, so the key index maps them to a text sentinel
        // that no integer quarter can equal.
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS line_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL,
                statement TEXT NOT NULL,
                line_item TEXT NOT NULL,
                fiscal_year INTEGER NOT NULL,
                fiscal_quarter INTEGER,
                value REAL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_line_items_ticker_item
             ON line_items(ticker, line_item)",
            [],
        )?;

        self.conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_line_items_key
             ON line_items(ticker, statement, line_item, fiscal_year,
                           IFNULL(fiscal_quarter, 'annual'))",
            [],
        )?;

        // Daily closing prices
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS prices (
                ticker TEXT NOT NULL,
                date TEXT NOT NULL,
                close_price REAL NOT NULL,
                PRIMARY KEY (ticker, date)
            )",
            [],
        )?;

        // Descriptive business data
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS reit_profiles (
                ticker TEXT PRIMARY KEY,
                company_name TEXT,
                business_description TEXT,
                website TEXT,
                property_type TEXT,
                country_region TEXT
            )",
            [],
        )?;

        Ok(())
    }

    /// Store statement rows, replacing any existing row with the same
    /// `(ticker, statement, line_item, fiscal_year, fiscal_quarter)` key.
    ///
    /// Returns the number of rows written.
    pub fn put_line_items_batch(&self, rows: &[LineItemObservation]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;

        {
            let mut delete = tx.prepare(
                "DELETE FROM line_items
                 WHERE ticker = ?1 AND statement = ?2 AND line_item = ?3
                   AND fiscal_year = ?4 AND fiscal_quarter IS ?5",
            )?;
            let mut insert = tx.prepare(
                "INSERT INTO line_items
                 (ticker, statement, line_item, fiscal_year, fiscal_quarter, value)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;

            for row in rows {
                let statement = row.statement.to_db_str();
                delete.execute(params![
                    row.ticker,
                    statement,
                    row.line_item,
                    row.fiscal_year,
                    row.fiscal_quarter,
                ])?;
                insert.execute(params![
                    row.ticker,
                    statement,
                    row.line_item,
                    row.fiscal_year,
                    row.fiscal_quarter,
                    row.value,
                ])?;
            }
        }

        tx.commit()?;
        debug!(rows = rows.len(), "stored line items");
        Ok(rows.len())
    }

    /// Store closing prices. Returns the number of rows written.
    pub fn put_prices_batch(&self, prices: &[PriceObservation]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;

        {
            let mut insert = tx.prepare(
                "INSERT OR REPLACE INTO prices (ticker, date, close_price)
                 VALUES (?1, ?2, ?3)",
            )?;
            for price in prices {
                insert.execute(params![
                    price.ticker,
                    price.date.to_string(),
                    price.close_price
                ])?;
            }
        }

        tx.commit()?;
        debug!(rows = prices.len(), "stored prices");
        Ok(prices.len())
    }

    /// Store a single profile.
    pub fn put_profile(&self, profile: &ReitProfile) -> Result<()> {
        self.put_profiles_batch(std::slice::from_ref(profile))?;
        Ok(())
    }

    /// Store multiple profiles in one transaction.
    pub fn put_profiles_batch(&self, profiles: &[ReitProfile]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;

        {
            let mut insert = tx.prepare(
                "INSERT OR REPLACE INTO reit_profiles
                 (ticker, company_name, business_description, website, property_type, country_region)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for p in profiles {
                insert.execute(params![
                    p.ticker,
                    p.company_name,
                    p.business_description,
                    p.website,
                    p.property_type,
                    p.country_region,
                ])?;
            }
        }

        tx.commit()?;
        Ok(profiles.len())
    }

    /// Get all profiles, ordered by ticker.
    pub fn profiles(&self) -> Result<Vec<ReitProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT ticker, company_name, business_description, website, property_type, country_region
             FROM reit_profiles
             ORDER BY ticker",
        )?;

        let profiles = stmt
            .query_map([], |row| {
                Ok(ReitProfile {
                    ticker: row.get(0)?,
                    company_name: row.get(1)?,
                    business_description: row.get(2)?,
                    website: row.get(3)?,
                    property_type: row.get(4)?,
                    country_region: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(profiles)
    }

    /// Distinct tickers that have at least one statement row.
    pub fn tickers_with_financials(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT ticker FROM line_items ORDER BY ticker")?;

        let tickers = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(tickers)
    }

    /// Batched fetch of statement rows for a ticker set and line item set.
    ///
    /// Tickers are chunked so that every statement stays under the bound
    /// parameter limit; the number of queries grows with the universe size
    /// divided by the chunk size, never with the ticker count itself.
    pub fn line_items_for(
        &self,
        tickers: &[String],
        line_items: &[String],
    ) -> Result<Vec<LineItemObservation>> {
        if tickers.is_empty() || line_items.is_empty() {
            return Ok(Vec::new());
        }

        let chunk_size = MAX_BOUND_PARAMS.saturating_sub(line_items.len()).max(1);
        let item_placeholders = placeholders(line_items.len());
        let mut rows = Vec::new();

        for chunk in tickers.chunks(chunk_size) {
            let sql = format!(
                "SELECT ticker, statement, line_item, fiscal_year, fiscal_quarter, value
                 FROM line_items
                 WHERE ticker IN ({}) AND line_item IN ({})
                 ORDER BY ticker, id",
                placeholders(chunk.len()),
                item_placeholders
            );

            let mut stmt = self.conn.prepare(&sql)?;
            let mapped = stmt.query_map(params_from_iter(chunk.iter().chain(line_items)), |row| {
                Ok(LineItemObservation {
                    ticker: row.get(0)?,
                    statement: StatementKind::from_db_str(&row.get::<_, String>(1)?)
                        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?,
                    line_item: row.get(2)?,
                    fiscal_year: row.get(3)?,
                    fiscal_quarter: row.get(4)?,
                    value: row.get(5)?,
                })
            })?;

            for row in mapped {
                rows.push(row?);
            }
        }

        debug!(
            tickers = tickers.len(),
            line_items = line_items.len(),
            rows = rows.len(),
            "fetched line items"
        );
        Ok(rows)
    }

    /// Latest closing price per ticker, keyed by ticker.
    pub fn latest_prices_for(&self, tickers: &[String]) -> Result<HashMap<String, f64>> {
        let mut latest = HashMap::new();
        if tickers.is_empty() {
            return Ok(latest);
        }

        for chunk in tickers.chunks(MAX_BOUND_PARAMS) {
            let sql = format!(
                "SELECT p.ticker, p.close_price
                 FROM prices p
                 JOIN (
                     SELECT ticker, MAX(date) AS max_date
                     FROM prices
                     WHERE ticker IN ({})
                     GROUP BY ticker
                 ) m ON p.ticker = m.ticker AND p.date = m.max_date",
                placeholders(chunk.len())
            );

            let mut stmt = self.conn.prepare(&sql)?;
            let mapped = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?;

            for row in mapped {
                let (ticker, price) = row?;
                latest.insert(ticker, price);
            }
        }

        Ok(latest)
    }

    /// Clear all stored data for a specific ticker.
    pub fn clear_ticker(&self, ticker: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM line_items WHERE ticker = ?1", params![ticker])?;
        self.conn
            .execute("DELETE FROM prices WHERE ticker = ?1", params![ticker])?;
        self.conn.execute(
            "DELETE FROM reit_profiles WHERE ticker = ?1",
            params![ticker],
        )?;
        Ok(())
    }

    /// Get store statistics.
    pub fn stats(&self) -> Result<StoreStats> {
        let line_items: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM line_items", [], |row| row.get(0))?;

        let tickers_with_financials: i64 =
            self.conn
                .query_row("SELECT COUNT(DISTINCT ticker) FROM line_items", [], |row| {
                    row.get(0)
                })?;

        let distinct_line_items: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT line_item) FROM line_items",
            [],
            |row| row.get(0),
        )?;

        let prices: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM prices", [], |row| row.get(0))?;

        let profiles: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM reit_profiles", [], |row| row.get(0))?;

        Ok(StoreStats {
            line_items: line_items as usize,
            tickers_with_financials: tickers_with_financials as usize,
            distinct_line_items: distinct_line_items as usize,
            prices: prices as usize,
            profiles: profiles as usize,
        })
    }
}

impl FundamentalsSource for SqliteStore {
    fn fetch_line_items(
        &self,
        tickers: &[String],
        line_items: &[String],
    ) -> Result<Vec<LineItemObservation>> {
        self.line_items_for(tickers, line_items)
    }

    fn fetch_latest_prices(&self, tickers: &[String]) -> Result<HashMap<String, f64>> {
        self.latest_prices_for(tickers)
    }
}

impl ProfileSource for SqliteStore {
    fn fetch_profiles(&self) -> Result<Vec<ReitProfile>> {
        self.profiles()
    }
}

/// Comma separated `?` list of length `n`.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of statement rows
    pub line_items: usize,
    /// Number of tickers with at least one statement row
    pub tickers_with_financials: usize,
    /// Number of distinct line item names
    pub distinct_line_items: usize,
    /// Number of price rows
    pub prices: usize,
    /// Number of REIT profiles
    pub profiles: usize,
}

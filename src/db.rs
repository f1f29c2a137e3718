// SQLite store - schema, inserts, and the two fetch paths
//
// Two queries feed the two fetch strategies:
// - fetch_flat_records: the raw join, one FlatRecord per row, for the
//   in-memory Hierarchy Builder
// - fetch_processors_joined: the same join ordered by identity keys, with
//   the hierarchy assembled here while walking rows (the "resultMap" path)

use crate::model::{FlatRecord, PaymentType, Processor, Scheme};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS processor (
            processor_id TEXT PRIMARY KEY,
            processor_name TEXT NOT NULL,
            partner_code TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS scheme (
            scheme_code TEXT PRIMARY KEY,
            scheme_name TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS payment (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            processor_id TEXT NOT NULL,
            partner_code TEXT NOT NULL,
            payment_type TEXT NOT NULL,
            scheme_code TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_payment_processor ON payment(processor_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_payment_scheme ON payment(scheme_code)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// INSERTS
// ============================================================================

pub fn insert_processor(
    conn: &Connection,
    processor_id: &str,
    processor_name: &str,
    partner_code: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO processor (processor_id, processor_name, partner_code)
         VALUES (?1, ?2, ?3)",
        params![processor_id, processor_name, partner_code],
    )?;

    Ok(())
}

pub fn insert_scheme(conn: &Connection, scheme_code: &str, scheme_name: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO scheme (scheme_code, scheme_name) VALUES (?1, ?2)",
        params![scheme_code, scheme_name],
    )?;

    Ok(())
}

pub fn insert_payment(
    conn: &Connection,
    processor_id: &str,
    partner_code: &str,
    payment_type: &str,
    scheme_code: Option<&str>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO payment (processor_id, partner_code, payment_type, scheme_code)
         VALUES (?1, ?2, ?3, ?4)",
        params![processor_id, partner_code, payment_type, scheme_code],
    )?;

    Ok(())
}

// ============================================================================
// COUNTS
// ============================================================================

pub fn count_processors(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM processor", [], |row| row.get(0))?;

    Ok(count)
}

pub fn count_schemes(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM scheme", [], |row| row.get(0))?;

    Ok(count)
}

pub fn count_payments(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM payment", [], |row| row.get(0))?;

    Ok(count)
}

// ============================================================================
// FLAT FETCH (rows for the Hierarchy Builder)
// ============================================================================

/// Fetch the denormalized join as flat rows.
///
/// Ordered by insertion order (processor rowid, then payment id) so repeated
/// fetches of an unchanged database see the same row sequence, which keeps
/// the builder's first-seen ordering stable.
pub fn fetch_flat_records(conn: &Connection) -> Result<Vec<FlatRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT p.processor_id, p.processor_name, p.partner_code,
                    pay.payment_type, pay.scheme_code, s.scheme_name
             FROM processor p
             LEFT JOIN payment pay ON pay.processor_id = p.processor_id
             LEFT JOIN scheme s ON s.scheme_code = pay.scheme_code
             ORDER BY p.rowid, pay.id",
        )
        .context("Failed to prepare flat join query")?;

    let records = stmt
        .query_map([], |row| {
            Ok(FlatRecord {
                processor_id: row.get(0)?,
                processor_name: row.get(1)?,
                partner_code: row.get(2)?,
                payment_type: row.get(3)?,
                scheme_code: row.get(4)?,
                scheme_name: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

// ============================================================================
// JOINED FETCH (hierarchy assembled at the store)
// ============================================================================

/// Fetch processors with the hierarchy assembled while reading the ordered
/// join, no intermediate FlatRecord pass.
///
/// Rows arrive ordered by (processor_id, payment_type, scheme_code), so each
/// processor and each payment type is a contiguous run and duplicate scheme
/// codes are adjacent. Output order is the SQL key order, not the builder's
/// first-seen order; order-independent comparisons must sort both sides.
pub fn fetch_processors_joined(conn: &Connection) -> Result<Vec<Processor>> {
    let mut stmt = conn
        .prepare(
            "SELECT p.processor_id, p.processor_name, p.partner_code,
                    pay.payment_type, pay.scheme_code, s.scheme_name
             FROM processor p
             LEFT JOIN payment pay ON pay.processor_id = p.processor_id
             LEFT JOIN scheme s ON s.scheme_code = pay.scheme_code
             ORDER BY p.processor_id, pay.payment_type, pay.scheme_code",
        )
        .context("Failed to prepare joined query")?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<String>>(5)?,
        ))
    })?;

    let mut processors: Vec<Processor> = Vec::new();

    for row in rows {
        let (processor_id, processor_name, partner_code, payment_type, scheme_code, scheme_name) =
            row?;

        // New processor run starts
        if processors.last().map(|p| p.processor_id.as_str()) != Some(processor_id.as_str()) {
            processors.push(Processor {
                processor_id,
                processor_name,
                partner_code,
                payment_types: Vec::new(),
            });
        }
        let processor = match processors.last_mut() {
            Some(p) => p,
            None => continue,
        };

        let payment_type = match payment_type {
            Some(pt) => pt,
            // LEFT JOIN null: processor without payment rows
            None => continue,
        };

        if processor
            .payment_types
            .last()
            .map(|pt| pt.payment_type.as_str())
            != Some(payment_type.as_str())
        {
            processor.payment_types.push(PaymentType {
                payment_type,
                schemes: Vec::new(),
            });
        }
        let payments = match processor.payment_types.last_mut() {
            Some(pt) => pt,
            None => continue,
        };

        let scheme_code = match scheme_code {
            Some(code) => code,
            None => continue,
        };

        // Adjacent duplicate scheme codes collapse to the first row
        if payments.schemes.last().map(|s| s.scheme_code.as_str()) == Some(scheme_code.as_str()) {
            continue;
        }
        payments.schemes.push(Scheme {
            scheme_code,
            scheme_name: scheme_name.unwrap_or_default(),
        });
    }

    Ok(processors)
}

// ============================================================================
// TESTS
// ============================================================================

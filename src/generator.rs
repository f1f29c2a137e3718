// Data generator - seed a catalog database for performance testing
//
// Mirrors the production dataset shape: a few hundred processors, a pool of
// shared schemes, and a large payment table that maps random processors to
// random schemes under a handful of payment types.

use crate::db::{
    count_payments, count_processors, count_schemes, insert_payment, insert_processor,
    insert_scheme,
};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusqlite::Connection;

/// Payment types assigned at random to generated payment rows.
pub const PAYMENT_TYPES: [&str; 5] = [
    "MOBILE",
    "CREDIT_CARD",
    "BANK_TRANSFER",
    "VIRTUAL_ACCOUNT",
    "GIFT_CARD",
];

// ============================================================================
// CONFIG
// ============================================================================

pub struct SeedConfig {
    /// Number of processors to generate (ids P0001..)
    pub processor_count: u32,

    /// Number of schemes to generate (codes SCHEME_00001..)
    pub scheme_count: u32,

    /// Number of payment rows to generate
    pub payment_count: u32,

    /// Fixed RNG seed; None draws from entropy
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            processor_count: 100,
            scheme_count: 1_000,
            payment_count: 10_000,
            rng_seed: None,
        }
    }
}

/// Row counts actually present after seeding, re-read from the database.
#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub processors: i64,
    pub schemes: i64,
    pub payments: i64,
}

// ============================================================================
// SEED
// ============================================================================

/// Populate the catalog tables per the config. The schema must already be
/// set up. Id formats match the production convention: `P0001`,
/// `PARTNER_001`, `SCHEME_00001`.
pub fn seed(conn: &Connection, config: &SeedConfig) -> Result<SeedSummary> {
    let mut rng = match config.rng_seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    for i in 1..=config.processor_count {
        insert_processor(
            conn,
            &format!("P{:04}", i),
            &format!("Processor {}", i),
            &format!("PARTNER_{:03}", i),
        )?;
    }

    for i in 1..=config.scheme_count {
        insert_scheme(
            conn,
            &format!("SCHEME_{:05}", i),
            &format!("Scheme {}", i),
        )?;
    }

    for _ in 0..config.payment_count {
        let processor_index = rng.gen_range(1..=config.processor_count);
        let scheme_index = rng.gen_range(1..=config.scheme_count);
        let payment_type = PAYMENT_TYPES[rng.gen_range(0..PAYMENT_TYPES.len())];

        insert_payment(
            conn,
            &format!("P{:04}", processor_index),
            &format!("PARTNER_{:03}", processor_index),
            payment_type,
            Some(&format!("SCHEME_{:05}", scheme_index)),
        )?;
    }

    Ok(SeedSummary {
        processors: count_processors(conn)?,
        schemes: count_schemes(conn)?,
        payments: count_payments(conn)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{fetch_flat_records, setup_database};

    fn small_config() -> SeedConfig {
        SeedConfig {
            processor_count: 5,
            scheme_count: 10,
            payment_count: 50,
            rng_seed: Some(42),
        }
    }

    #[test]
    fn test_seed_counts() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let summary = seed(&conn, &small_config()).unwrap();

        assert_eq!(summary.processors, 5);
        assert_eq!(summary.schemes, 10);
        assert_eq!(summary.payments, 50);
    }

    #[test]
    fn test_seed_is_reproducible_with_fixed_rng_seed() {
        let conn_a = Connection::open_in_memory().unwrap();
        setup_database(&conn_a).unwrap();
        seed(&conn_a, &small_config()).unwrap();

        let conn_b = Connection::open_in_memory().unwrap();
        setup_database(&conn_b).unwrap();
        seed(&conn_b, &small_config()).unwrap();

        let rows_a = fetch_flat_records(&conn_a).unwrap();
        let rows_b = fetch_flat_records(&conn_b).unwrap();
        assert_eq!(rows_a, rows_b);
    }

    #[test]
    fn test_generated_payments_reference_existing_processors() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        seed(&conn, &small_config()).unwrap();

        let orphans: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM payment
                 WHERE processor_id NOT IN (SELECT processor_id FROM processor)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_generated_payment_types_come_from_known_set() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        seed(&conn, &small_config()).unwrap();

        let rows = fetch_flat_records(&conn).unwrap();
        for row in rows {
            if let Some(pt) = row.payment_type {
                assert!(PAYMENT_TYPES.contains(&pt.as_str()), "unexpected type {}", pt);
            }
        }
    }
}

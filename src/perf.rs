// Comparison harness - time both fetch strategies back to back
//
// Both strategies implement ProcessorSource and are selected explicitly:
// JoinedSource assembles the tree at the store, FlatSource fetches flat rows
// and runs the Hierarchy Builder. The harness runs them strictly
// sequentially and reports whole-millisecond wall-clock timings. The clock
// is injected so tests can assert the report without real timing variance.

use crate::builder::build_hierarchy;
use crate::db::{fetch_flat_records, fetch_processors_joined};
use crate::model::Processor;
use anyhow::Result;
use rusqlite::Connection;
use std::time::Instant;

// ============================================================================
// CLOCK
// ============================================================================

pub trait Clock {
    /// Milliseconds elapsed on some fixed monotonic origin.
    fn now_millis(&self) -> u64;
}

/// Wall clock measured against a held `Instant`, so readings are monotonic
/// and unaffected by system time adjustments.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

// ============================================================================
// FETCH STRATEGIES
// ============================================================================

/// A complete way of producing the processor tree.
pub trait ProcessorSource {
    fn fetch(&self) -> Result<Vec<Processor>>;
}

/// Strategy (a): the store walks the ordered join and assembles the
/// hierarchy itself.
pub struct JoinedSource<'a> {
    conn: &'a Connection,
}

impl<'a> JoinedSource<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        JoinedSource { conn }
    }
}

impl ProcessorSource for JoinedSource<'_> {
    fn fetch(&self) -> Result<Vec<Processor>> {
        fetch_processors_joined(self.conn)
    }
}

/// Strategy (b): fetch flat rows, then transform in memory.
pub struct FlatSource<'a> {
    conn: &'a Connection,
}

impl<'a> FlatSource<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        FlatSource { conn }
    }
}

impl ProcessorSource for FlatSource<'_> {
    fn fetch(&self) -> Result<Vec<Processor>> {
        let records = fetch_flat_records(self.conn)?;
        Ok(build_hierarchy(&records))
    }
}

// ============================================================================
// COMPARISON
// ============================================================================

/// Run the joined strategy, then the flat strategy, timing each end to end,
/// and format the report.
///
/// Calls are strictly sequential and measured back to back; the second call
/// may still benefit from page caching done by the first, which is accepted.
/// Any fetch error propagates unchanged; no partial report is produced.
pub fn compare_sources(
    joined: &dyn ProcessorSource,
    flat: &dyn ProcessorSource,
    clock: &dyn Clock,
) -> Result<String> {
    let t1 = clock.now_millis();
    joined.fetch()?;
    let t2 = clock.now_millis();
    flat.fetch()?;
    let t3 = clock.now_millis();

    Ok(format!("[resultMap] ms: {}, [stream] ms: {}", t2 - t1, t3 - t2))
}

// ============================================================================
// TESTS
// ============================================================================

use anyhow::Result;
use rusqlite::Connection;
use std::env;

use processor_catalog::{
    compare_sources, seed, setup_database, FlatSource, JoinedSource, SeedConfig, SystemClock,
};

const DEFAULT_DB_PATH: &str = "catalog.db";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("seed") => run_seed(args.get(2).map(String::as_str)),
        Some("compare") => run_compare(args.get(2).map(String::as_str)),
        _ => {
            eprintln!("Usage: processor-catalog <seed|compare> [db-path]");
            eprintln!("  seed     create schema and generate the test dataset");
            eprintln!("  compare  time both fetch strategies on the dataset");
            std::process::exit(1)
        }
    }
}

fn run_seed(db_path: Option<&str>) -> Result<()> {
    let db_path = db_path.unwrap_or(DEFAULT_DB_PATH);

    println!("🗄️  Seeding catalog database: {}", db_path);

    let conn = Connection::open(db_path)?;
    setup_database(&conn)?;
    println!("✓ Schema ready (WAL mode)");

    let summary = seed(&conn, &SeedConfig::default())?;
    println!("✓ Processors: {}", summary.processors);
    println!("✓ Schemes:    {}", summary.schemes);
    println!("✓ Payments:   {}", summary.payments);

    Ok(())
}

fn run_compare(db_path: Option<&str>) -> Result<()> {
    let db_path = db_path.unwrap_or(DEFAULT_DB_PATH);

    let path = std::path::Path::new(db_path);
    if !path.exists() {
        eprintln!("❌ Database not found at {:?}", path);
        eprintln!("   Run: processor-catalog seed");
        std::process::exit(1);
    }

    let conn = Connection::open(path)?;
    let clock = SystemClock::new();

    let report = compare_sources(
        &JoinedSource::new(&conn),
        &FlatSource::new(&conn),
        &clock,
    )?;
    println!("{}", report);

    Ok(())
}

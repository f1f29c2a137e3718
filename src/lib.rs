// Processor Catalog - Core Library
// Exposes all modules for use in the CLI, API server, and tests

pub mod builder;
pub mod db;
pub mod generator;
pub mod model;
pub mod perf;

// Re-export commonly used types
pub use builder::build_hierarchy;
pub use db::{
    count_payments, count_processors, count_schemes, fetch_flat_records,
    fetch_processors_joined, insert_payment, insert_processor, insert_scheme, setup_database,
};
pub use generator::{seed, SeedConfig, SeedSummary, PAYMENT_TYPES};
pub use model::{FlatRecord, PaymentType, Processor, Scheme};
pub use perf::{compare_sources, Clock, FlatSource, JoinedSource, ProcessorSource, SystemClock};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Random ledger generation for benchmarks, demos and the CLI.

pub mod scenario;

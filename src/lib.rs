//! # divy-ledger
//!
//! Expense splitting and net balance engine for shared group ledgers.
//!
//! Given a group's members, the expenses they paid for one another and the
//! payments they made to settle up, this engine computes how each expense
//! splits, where every member stands, and a short list of transfers that
//! squares the group.
//!
//! ## Architecture
//!
//! - **core**: Foundational types: members, groups, expenses, payments, balances
//! - **engine**: Splitting, balance computation, settlement plans, group ledgers
//! - **api**: Request/response payloads of the shared-expense endpoints
//! - **config**: Defaults and environment overrides
//! - **simulation**: Random ledger generation for load testing

pub mod api;
pub mod config;
pub mod core;
pub mod engine;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::NetBalance;
    pub use crate::core::currency::CurrencyCode;
    pub use crate::core::error::LedgerError;
    pub use crate::core::expense::{Expense, SplitPolicy};
    pub use crate::core::group::{Group, GroupId};
    pub use crate::core::member::{Member, MemberId};
    pub use crate::core::payment::{Payment, PaymentStatus};
    pub use crate::engine::balances::compute_net_balances;
    pub use crate::engine::ledger::GroupLedger;
    pub use crate::engine::settlement::{simplify_debts, Transfer};
    pub use crate::engine::split::{compute_split, Split};
}

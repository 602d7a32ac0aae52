//! The ledger engine: expense splits, net balances and settlement plans.
//!
//! Everything here is a pure function of its inputs. [`ledger::GroupLedger`]
//! bundles one group's records into a snapshot the functions run over.

pub mod balances;
pub mod ledger;
pub mod settlement;
pub mod split;

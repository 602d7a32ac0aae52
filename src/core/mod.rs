//! Foundational types: members, groups, expenses, payments, balances.

pub mod balance;
pub mod currency;
pub mod error;
pub mod expense;
pub mod group;
pub mod member;
pub mod payment;

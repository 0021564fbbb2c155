//! Balance and transfer operations exposed as tools.

pub mod balance;
pub mod transfer;

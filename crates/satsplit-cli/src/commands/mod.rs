pub mod balances;
pub mod convert;
pub mod settle;

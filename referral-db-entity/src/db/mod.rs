pub mod referral_edges;
pub mod tasks;
pub mod users;
pub mod verifications;
pub mod withdrawals;

pub mod access;
pub mod cleanup;
pub mod issue;
pub mod redeem;

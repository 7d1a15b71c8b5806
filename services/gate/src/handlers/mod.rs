pub mod find;
pub mod health;
pub mod index;
pub mod share;

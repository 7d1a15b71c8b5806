pub mod db;
pub mod memory;
pub mod scheduler;
pub mod vision;

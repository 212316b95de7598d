pub mod cascade;
pub mod db;
pub mod orm;

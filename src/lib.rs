pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod grouping;
pub mod providers;
pub mod services;
pub mod storage;

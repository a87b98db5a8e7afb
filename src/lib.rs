pub mod config;
pub mod filters;
pub mod input;
pub mod load;
pub mod pager;
pub mod prompt;
pub mod session;
pub mod stats;
pub mod table;

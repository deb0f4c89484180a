pub mod config;
pub mod datastore;
pub mod task;

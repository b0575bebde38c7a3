pub mod config;
pub mod doc;
pub mod exporters;
pub mod generate;
pub mod graph;
pub mod init;
pub mod scan;
pub mod validate;

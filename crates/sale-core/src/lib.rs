pub mod config;
pub mod deployment;
pub mod error;
pub mod io;
pub mod opcode;
pub mod paths;
pub mod report;
pub mod sale;
pub mod subgraph;

pub use error::{Result, SaleError};

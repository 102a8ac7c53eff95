//! Command handlers, one module per top-level subcommand.

pub mod instances;
pub mod menu;
pub mod transfer;
pub mod util;

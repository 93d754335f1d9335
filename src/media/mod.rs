pub mod config;
pub mod documents;
pub mod ledger;
pub mod paths;
pub mod pipeline;
pub mod propagate;
pub mod relocate;
pub mod resolver;
pub mod rewrite;
pub mod sanitize;
pub mod scanner;
pub mod warn;

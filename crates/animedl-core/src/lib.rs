pub mod config;
pub mod logging;

pub mod navigation;
pub mod query;
pub mod resolver;
pub mod session;
pub mod site;

pub mod cli;
pub mod host;
pub mod logging;
pub mod script;

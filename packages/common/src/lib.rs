//! Common infrastructure shared by the jwx crates
//!
//! Currently this is the logging bootstrap plus helpers that keep secret
//! material out of log output.

pub mod logging;

pub use logging::LoggingTransformer;

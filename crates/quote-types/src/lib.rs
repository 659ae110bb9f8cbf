//! Quote Types - Pure type definitions
//!
//! Data types shared by the quote server and the command line tooling.
//! No async runtime or database dependencies live here.

pub mod quote;

pub use quote::*;

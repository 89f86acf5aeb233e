//! Compute passes.

pub mod dao;

pub use dao::DaoPass;

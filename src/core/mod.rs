//! Access layer internals

pub mod acl;
pub mod config;
pub mod global;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

pub mod corpus;
pub mod demo;
pub mod domain;
pub mod error;
pub mod format;
pub mod metrics;
pub mod normalize;
pub mod store;
pub mod validate;

pub mod enrich;
pub mod fallback;
pub mod matcher;
pub mod pipeline;
pub mod rank;

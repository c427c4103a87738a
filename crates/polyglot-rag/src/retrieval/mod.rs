//! Context assembly from stored documents

mod context;

pub use context::{Context, ContextAssembler, ExcerptStrategy, LeadingExcerpt};

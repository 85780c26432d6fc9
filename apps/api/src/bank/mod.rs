// Snippet bank: merge engine, session workspace, import flow and HTTP handlers.

pub mod handlers;
pub mod import;
pub mod merge;
pub mod workspace;

pub use workspace::Workspace;

//! Handle to a deployed program and the models of its RPC calls.

mod api;
mod model;

pub use api::Program;
pub use model::*;

pub mod context;
pub mod types;

pub mod acl;
pub mod handler;
pub mod list;
pub mod meta;
pub mod publish;
pub mod resolve;

#[cfg(test)]
mod test_utils;

pub use context::ApiContext;
pub use handler::ApiHandler;
pub use types::*;

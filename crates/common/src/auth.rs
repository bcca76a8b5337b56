mod context;

pub use context::{Role, UserContext};

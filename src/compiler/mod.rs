pub mod eval;
pub mod inline;
pub mod ir;

pub use eval::{eval, Env};
pub use inline::{inline_primitives, rewrite, InlineRule, RULES};
pub use ir::{Field, Node, StaticType, TypeEnv};

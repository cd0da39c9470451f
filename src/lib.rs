pub mod aop;
pub mod components;
pub mod engine;
pub mod host;
pub mod tree;
pub mod types;

pub use components::*;
pub use engine::{RuleEngine, RuleObserver};
pub use types::*;

mod apps;
mod observer;
pub mod rule;
mod runtime;

pub use apps::ActiveAppTracker;
pub use observer::{DynRuleObserver, RuleObserver};
pub use rule::RuleEngine;
pub use runtime::RuleRuntime;

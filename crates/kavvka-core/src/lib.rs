pub mod aggregate;
pub mod compare_set;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod marker;
pub mod mover;
pub mod operator;
pub mod output;
pub mod paths;
pub mod progress;
pub mod reconcile;
pub mod resolver;

pub use aggregate::{BatchResult, BatchState, InputFailure, InputRecord};
pub use config::AppConfig;
pub use descriptor::{describe, Descriptor};
pub use engine::{PartitionEngine, PlanReport};
pub use error::Error;
pub use operator::{AutoOperator, Operator, ScriptedOperator};
pub use progress::{PartitionObserver, SilentObserver};

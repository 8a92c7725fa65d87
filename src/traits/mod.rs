pub mod logger;
pub mod operator;
pub mod simple;

pub use logger::{NodeLogger, TracingLogger};
pub use operator::{Message, Operator, OperatorFactory};
pub use simple::{FnFactory, FnOperator};

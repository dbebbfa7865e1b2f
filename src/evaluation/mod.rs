//! Route distance and feasibility checking.

mod evaluator;

pub use evaluator::RouteEvaluator;

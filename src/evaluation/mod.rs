pub mod breakdown;
pub mod compare;
pub mod engine;

pub use breakdown::{domain_stats, DomainStats, StatsFilter};
pub use compare::{compare_matrix, CompareCell, CompareFilter, CompareRow};
pub use engine::{evaluate_products, max_possible, KoViolation, ProductEvaluation};

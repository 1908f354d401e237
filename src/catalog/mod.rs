pub mod facets;
pub mod pagination;
pub mod predicate;
pub mod pricing;
pub mod projection;

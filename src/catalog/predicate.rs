//! Conjunctive product filter built from a [`FacetSelection`].
//!
//! Values inside one facet are OR-ed, facets are AND-ed. The same tree can
//! be evaluated in memory with [`Predicate::matches`] or lowered to a bound
//! SeaORM [`Condition`] with [`Predicate::to_condition`].

use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, Query, SimpleExpr, extension::postgres::PgExpr},
};

use crate::{
    catalog::{facets::FacetSelection, facets::PriceBucket, pricing::final_price_expr},
    entity::{brands, categories, leagues, product_sizes, products},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    FinalPriceIn(PriceBucket),
    CategoryIn(Vec<String>),
    BrandIn(Vec<String>),
    LeagueContains(String),
    HasSizeIn(Vec<String>),
    NameContains(String),
}

/// The attributes of a product the predicate looks at.
#[derive(Debug, Clone, Default)]
pub struct ProductFacts {
    pub name: String,
    pub final_price: i64,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub league: Option<String>,
    pub sizes: Vec<String>,
}

impl Predicate {
    /// Always-true predicate.
    pub fn any_product() -> Self {
        Predicate::All(Vec::new())
    }

    pub fn from_selection(selection: &FacetSelection, search: Option<&str>) -> Self {
        let mut clauses = Vec::new();

        if !selection.prices.is_empty() {
            clauses.push(Predicate::Any(
                selection
                    .prices
                    .iter()
                    .copied()
                    .map(Predicate::FinalPriceIn)
                    .collect(),
            ));
        }
        if !selection.categories.is_empty() {
            clauses.push(Predicate::CategoryIn(selection.categories.clone()));
        }
        if !selection.brands.is_empty() {
            clauses.push(Predicate::BrandIn(selection.brands.clone()));
        }
        if !selection.leagues.is_empty() {
            clauses.push(Predicate::Any(
                selection
                    .leagues
                    .iter()
                    .cloned()
                    .map(Predicate::LeagueContains)
                    .collect(),
            ));
        }
        if !selection.sizes.is_empty() {
            clauses.push(Predicate::HasSizeIn(selection.sizes.clone()));
        }
        if let Some(term) = search {
            clauses.push(Predicate::NameContains(term.to_string()));
        }

        Predicate::All(clauses)
    }

    pub fn is_trivial(&self) -> bool {
        matches!(self, Predicate::All(clauses) if clauses.is_empty())
    }

    pub fn matches(&self, product: &ProductFacts) -> bool {
        match self {
            Predicate::All(clauses) => clauses.iter().all(|p| p.matches(product)),
            Predicate::Any(clauses) => clauses.iter().any(|p| p.matches(product)),
            Predicate::FinalPriceIn(bucket) => bucket.contains(product.final_price),
            Predicate::CategoryIn(names) => product
                .category
                .as_ref()
                .is_some_and(|c| names.contains(c)),
            Predicate::BrandIn(names) => product.brand.as_ref().is_some_and(|b| names.contains(b)),
            Predicate::LeagueContains(needle) => product
                .league
                .as_deref()
                .is_some_and(|l| contains_ignore_case(l, needle)),
            Predicate::HasSizeIn(sizes) => product.sizes.iter().any(|s| sizes.contains(s)),
            Predicate::NameContains(needle) => contains_ignore_case(&product.name, needle),
        }
    }

    /// Lower to a SeaORM condition over `products` joined with `categories`,
    /// `brands` and `leagues`. Every user value is bound, never spliced.
    pub fn to_condition(&self) -> Condition {
        match self {
            Predicate::All(clauses) => clauses
                .iter()
                .fold(Condition::all(), |cond, p| cond.add(p.to_condition())),
            Predicate::Any(clauses) => clauses
                .iter()
                .fold(Condition::any(), |cond, p| cond.add(p.to_condition())),
            leaf => Condition::all().add(leaf.leaf_expr()),
        }
    }

    fn leaf_expr(&self) -> SimpleExpr {
        match self {
            Predicate::FinalPriceIn(bucket) => {
                let price = Expr::expr(final_price_expr());
                match bucket.bounds() {
                    (Some(min), Some(max)) => price.between(min, max),
                    (Some(min), None) => price.gte(min),
                    (None, Some(max)) => price.lte(max),
                    (None, None) => Expr::value(true),
                }
            }
            Predicate::CategoryIn(names) => categories::Column::Name.is_in(names.clone()),
            Predicate::BrandIn(names) => brands::Column::Name.is_in(names.clone()),
            Predicate::LeagueContains(needle) => {
                Expr::col((leagues::Entity, leagues::Column::Name)).ilike(like_pattern(needle))
            }
            Predicate::HasSizeIn(sizes) => products::Column::Id.in_subquery(
                Query::select()
                    .column(product_sizes::Column::ProductId)
                    .from(product_sizes::Entity)
                    .and_where(product_sizes::Column::Size.is_in(sizes.clone()))
                    .to_owned(),
            ),
            Predicate::NameContains(needle) => {
                Expr::col((products::Entity, products::Column::Name)).ilike(like_pattern(needle))
            }
            Predicate::All(_) | Predicate::Any(_) => Expr::value(true),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// `%needle%` with LIKE wildcards in the needle escaped.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn empty_selection_is_trivial() {
        let p = Predicate::from_selection(&FacetSelection::default(), None);
        assert!(p.is_trivial());
        assert_eq!(p, Predicate::any_product());
    }
}

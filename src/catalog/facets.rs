//! Translates storefront filter tokens into the values stored in the catalog.
//!
//! Every facet arrives as a comma separated list in the query string, e.g.
//! `?prices=duoi500,tren1000&categories=ao-bong-da&leagues=premier`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::pagination::{PageRequest, Pagination};

pub const BUCKET_LOW_MAX: i64 = 500_000;
pub const BUCKET_HIGH_MIN: i64 = 1_000_000;

const CATEGORY_SLUGS: [(&str, &str); 5] = [
    ("ao-bong-da", "Áo bóng đá"),
    ("giay-bong-da", "Giày bóng đá"),
    ("bong-da", "Bóng đá"),
    ("gang-tay-thu-mon", "Găng tay thủ môn"),
    ("phu-kien", "Phụ kiện"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PriceBucket {
    /// Final price below 500,000
    #[serde(rename = "duoi500")]
    Under500,
    /// Final price from 500,000 to 1,000,000 inclusive
    #[serde(rename = "500-1000")]
    From500To1000,
    /// Final price above 1,000,000
    #[serde(rename = "tren1000")]
    Over1000,
}

impl PriceBucket {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "duoi500" => Some(Self::Under500),
            "500-1000" => Some(Self::From500To1000),
            "tren1000" => Some(Self::Over1000),
            _ => None,
        }
    }

    /// Inclusive `(min, max)` bounds on the final price; `None` is unbounded.
    pub fn bounds(&self) -> (Option<i64>, Option<i64>) {
        match self {
            Self::Under500 => (None, Some(BUCKET_LOW_MAX - 1)),
            Self::From500To1000 => (Some(BUCKET_LOW_MAX), Some(BUCKET_HIGH_MIN)),
            Self::Over1000 => (Some(BUCKET_HIGH_MIN + 1), None),
        }
    }

    pub fn contains(&self, final_price: i64) -> bool {
        let (min, max) = self.bounds();
        min.is_none_or(|min| final_price >= min) && max.is_none_or(|max| final_price <= max)
    }
}

/// Known category slugs map to their stored names; anything else is kept
/// verbatim and simply matches nothing if no such category exists.
pub fn normalize_category(token: &str) -> String {
    CATEGORY_SLUGS
        .iter()
        .find(|(slug, _)| *slug == token)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| token.to_string())
}

pub fn normalize_size(token: &str) -> String {
    token.to_uppercase()
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ProductFilterQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Price buckets: duoi500, 500-1000, tren1000
    pub prices: Option<String>,
    /// Category slugs or names
    pub categories: Option<String>,
    /// Brand names
    pub brands: Option<String>,
    /// League name fragments
    pub leagues: Option<String>,
    /// Size labels
    pub sizes: Option<String>,
    /// Free text matched against the product name
    pub q: Option<String>,
    pub sort: Option<ProductSort>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    NameAsc,
}

impl ProductFilterQuery {
    pub fn page_request(&self) -> PageRequest {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
        .normalize()
    }

    /// Trimmed search term, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// The request-scoped set of selected facet values, already normalized.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FacetSelection {
    pub prices: Vec<PriceBucket>,
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub leagues: Vec<String>,
    pub sizes: Vec<String>,
}

impl FacetSelection {
    pub fn from_query(query: &ProductFilterQuery) -> Self {
        Self {
            prices: split_tokens(query.prices.as_deref())
                .into_iter()
                .filter_map(|t| PriceBucket::parse(&t))
                .fold(Vec::new(), dedup_push),
            categories: split_tokens(query.categories.as_deref())
                .into_iter()
                .map(|t| normalize_category(&t))
                .fold(Vec::new(), dedup_push),
            brands: split_tokens(query.brands.as_deref()),
            leagues: split_tokens(query.leagues.as_deref()),
            sizes: split_tokens(query.sizes.as_deref())
                .into_iter()
                .map(|t| normalize_size(&t))
                .fold(Vec::new(), dedup_push),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
            && self.categories.is_empty()
            && self.brands.is_empty()
            && self.leagues.is_empty()
            && self.sizes.is_empty()
    }
}

/// Split on commas, trim, drop blanks and repeats.
fn split_tokens(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .fold(Vec::new(), dedup_push)
}

fn dedup_push<T: PartialEq>(mut acc: Vec<T>, item: T) -> Vec<T> {
    if !acc.contains(&item) {
        acc.push(item);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_drops_blank_and_duplicate_tokens() {
        assert_eq!(
            split_tokens(Some(" nike, ,adidas,nike,")),
            vec!["nike".to_string(), "adidas".to_string()]
        );
        assert!(split_tokens(None).is_empty());
    }

    #[test]
    fn unknown_price_tokens_are_ignored() {
        let query = ProductFilterQuery {
            prices: Some("duoi500,cheap,500-1000".into()),
            ..Default::default()
        };
        let selection = FacetSelection::from_query(&query);
        assert_eq!(
            selection.prices,
            vec![PriceBucket::Under500, PriceBucket::From500To1000]
        );
    }
}

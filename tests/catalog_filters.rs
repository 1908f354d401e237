use football_store_api::{
    catalog::{
        facets::{FacetSelection, PriceBucket, ProductFilterQuery},
        pagination::{PageRequest, Pagination},
        pricing::final_price,
        predicate::{Predicate, ProductFacts},
        projection::{DEFAULT_UNIT, ProductRow, project},
    },
    entity::products,
};
use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};
use uuid::Uuid;

fn query(f: impl FnOnce(&mut ProductFilterQuery)) -> ProductFilterQuery {
    let mut q = ProductFilterQuery::default();
    f(&mut q);
    q
}

fn predicate_for(q: &ProductFilterQuery) -> Predicate {
    Predicate::from_selection(&FacetSelection::from_query(q), q.search_term())
}

fn jersey(list_price: i64, discount: i32) -> ProductFacts {
    ProductFacts {
        name: "Áo đấu Arsenal sân nhà".into(),
        final_price: final_price(list_price, discount),
        category: Some("Áo bóng đá".into()),
        brand: Some("Adidas".into()),
        league: Some("Premier League".into()),
        sizes: vec!["M".into(), "L".into()],
    }
}

#[test]
fn empty_selection_matches_every_product() {
    let p = predicate_for(&ProductFilterQuery::default());
    assert!(p.is_trivial());
    for facts in [jersey(0, 0), jersey(90_000, 0), jersey(5_000_000, 50), ProductFacts::default()] {
        assert!(p.matches(&facts));
    }
}

#[test]
fn five_hundred_thousand_is_in_the_middle_bucket() {
    let product = jersey(500_000, 0);
    let mid = predicate_for(&query(|q| q.prices = Some("500-1000".into())));
    let low = predicate_for(&query(|q| q.prices = Some("duoi500".into())));
    assert!(mid.matches(&product));
    assert!(!low.matches(&product));
}

#[test]
fn discount_moves_a_product_out_of_the_top_bucket() {
    let product = jersey(1_000_000, 10);
    assert_eq!(product.final_price, 900_000);

    let mid = predicate_for(&query(|q| q.prices = Some("500-1000".into())));
    let high = predicate_for(&query(|q| q.prices = Some("tren1000".into())));
    assert!(mid.matches(&product));
    assert!(!high.matches(&product));
}

#[test]
fn bucket_edges() {
    assert!(PriceBucket::Under500.contains(499_999));
    assert!(!PriceBucket::Under500.contains(500_000));
    assert!(PriceBucket::From500To1000.contains(1_000_000));
    assert!(!PriceBucket::Over1000.contains(1_000_000));
    assert!(PriceBucket::Over1000.contains(1_000_001));
}

#[test]
fn values_within_a_facet_are_alternatives() {
    let p = predicate_for(&query(|q| q.prices = Some("duoi500,tren1000".into())));
    assert!(p.matches(&jersey(300_000, 0)));
    assert!(p.matches(&jersey(2_000_000, 0)));
    assert!(!p.matches(&jersey(700_000, 0)));
}

#[test]
fn facets_are_combined_with_and() {
    let p = predicate_for(&query(|q| {
        q.categories = Some("ao-bong-da".into());
        q.brands = Some("Nike".into());
    }));
    // right category, wrong brand
    assert!(!p.matches(&jersey(450_000, 0)));

    let mut nike = jersey(450_000, 0);
    nike.brand = Some("Nike".into());
    assert!(p.matches(&nike));
}

#[test]
fn category_slug_resolves_to_display_name() {
    let selection = FacetSelection::from_query(&query(|q| {
        q.categories = Some("ao-bong-da,gang-tay-thu-mon".into())
    }));
    assert_eq!(selection.categories, vec!["Áo bóng đá", "Găng tay thủ môn"]);
}

#[test]
fn league_and_name_match_case_insensitively() {
    let league = predicate_for(&query(|q| q.leagues = Some("premier".into())));
    assert!(league.matches(&jersey(450_000, 0)));

    let search = predicate_for(&query(|q| q.q = Some("  ARSENAL ".into())));
    assert!(search.matches(&jersey(450_000, 0)));

    let blank = predicate_for(&query(|q| q.q = Some("   ".into())));
    assert!(blank.is_trivial());
}

#[test]
fn size_filter_is_uppercased_and_needs_one_match() {
    let p = predicate_for(&query(|q| q.sizes = Some("xl, l".into())));
    assert!(p.matches(&jersey(450_000, 0)));

    let mut ball = jersey(450_000, 0);
    ball.sizes.clear();
    assert!(!p.matches(&ball));
}

#[test]
fn pagination_offsets_and_page_counts() {
    let page = Pagination {
        page: Some(2),
        limit: Some(16),
    }
    .normalize();
    assert_eq!(page.offset(), 16);
    assert_eq!(page.total_pages(33), 3);
    assert_eq!(page.total_pages(0), 1);

    let clamped = Pagination {
        page: Some(0),
        limit: Some(1_000),
    }
    .normalize();
    assert_eq!(clamped.page(), 1);
    assert_eq!(clamped.size(), 100);

    assert_eq!(PageRequest::new(3, 10).offset(), 20);
}

#[test]
fn projection_fills_defaults() {
    let row = ProductRow {
        id: Uuid::new_v4(),
        name: "Bóng thi đấu".into(),
        description: None,
        price: 1_000_000,
        discount: 10,
        stock: 4,
        unit: None,
        image_url: None,
        status: None,
        category_name: Some("Bóng đá".into()),
        brand_name: None,
        league_name: None,
        created_at: chrono::Utc::now().fixed_offset(),
    };

    let card = project(row.clone(), None);
    assert_eq!(card.unit, DEFAULT_UNIT);
    assert_eq!(card.sizes, "");
    assert_eq!(card.status, "active");
    assert_eq!(card.final_price, 900_000);

    let sizes = vec!["M".to_string(), "L".to_string()];
    let card = project(row, Some(&sizes));
    assert_eq!(card.sizes, "M,L");
    assert_eq!(card.facts().sizes, sizes);
}

#[test]
fn sql_binds_user_values() {
    let hostile = "x'; DROP TABLE products; --";
    let p = predicate_for(&query(|q| {
        q.q = Some(hostile.into());
        q.brands = Some("Nike".into());
    }));

    let stmt = products::Entity::find()
        .filter(p.to_condition())
        .build(DbBackend::Postgres);

    assert!(!stmt.sql.contains("DROP TABLE"));
    assert!(stmt.sql.contains("ILIKE"));
    assert!(stmt.sql.contains("$1"));
    let values = format!("{:?}", stmt.values);
    assert!(values.contains("DROP TABLE"));
    assert!(values.contains("Nike"));
}

#[test]
fn sql_filters_on_the_discounted_price() {
    let p = predicate_for(&query(|q| q.prices = Some("500-1000".into())));
    let sql = products::Entity::find()
        .filter(p.to_condition())
        .build(DbBackend::Postgres)
        .sql;

    assert!(sql.contains(r#""products"."discount""#));
    assert!(sql.contains("BETWEEN"));
}

#[test]
fn sql_size_filter_uses_a_subquery() {
    let p = predicate_for(&query(|q| q.sizes = Some("M".into())));
    let sql = products::Entity::find()
        .filter(p.to_condition())
        .build(DbBackend::Postgres)
        .sql;

    assert!(sql.contains(r#""product_sizes""#));
    assert!(sql.contains(" IN (SELECT"));
}

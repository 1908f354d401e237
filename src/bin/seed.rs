use football_store_api::{
    config::AppConfig,
    db::{DbPool, create_pool, run_migrations},
    models::{ROLE_CUSTOMER, ROLE_SUPERADMIN},
    services::auth_service::hash_password,
};
use uuid::Uuid;

const CATEGORIES: [(&str, &str); 5] = [
    ("Áo bóng đá", "ao-bong-da"),
    ("Giày bóng đá", "giay-bong-da"),
    ("Bóng đá", "bong-da"),
    ("Găng tay thủ môn", "gang-tay-thu-mon"),
    ("Phụ kiện", "phu-kien"),
];

const BRANDS: [(&str, &str); 4] = [
    ("Nike", "nike"),
    ("Adidas", "adidas"),
    ("Puma", "puma"),
    ("Mizuno", "mizuno"),
];

const LEAGUES: [(&str, &str); 4] = [
    ("Premier League", "premier-league"),
    ("La Liga", "la-liga"),
    ("Serie A", "serie-a"),
    ("V-League", "v-league"),
];

struct SeedProduct {
    name: &'static str,
    price: i64,
    discount: i32,
    category: &'static str,
    brand: &'static str,
    league: Option<&'static str>,
    unit: &'static str,
    sizes: &'static [(&'static str, i32)],
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Áo đấu Manchester United sân nhà",
        price: 450_000,
        discount: 0,
        category: "ao-bong-da",
        brand: "adidas",
        league: Some("premier-league"),
        unit: "cái",
        sizes: &[("S", 10), ("M", 15), ("L", 12), ("XL", 6)],
    },
    SeedProduct {
        name: "Áo đấu Real Madrid sân khách",
        price: 1_000_000,
        discount: 10,
        category: "ao-bong-da",
        brand: "adidas",
        league: Some("la-liga"),
        unit: "cái",
        sizes: &[("M", 8), ("L", 8)],
    },
    SeedProduct {
        name: "Giày Mercurial Vapor",
        price: 2_300_000,
        discount: 15,
        category: "giay-bong-da",
        brand: "nike",
        league: None,
        unit: "đôi",
        sizes: &[("40", 4), ("41", 6), ("42", 5)],
    },
    SeedProduct {
        name: "Bóng thi đấu Serie A",
        price: 500_000,
        discount: 0,
        category: "bong-da",
        brand: "puma",
        league: Some("serie-a"),
        unit: "quả",
        sizes: &[],
    },
    SeedProduct {
        name: "Găng tay thủ môn Morelia",
        price: 750_000,
        discount: 20,
        category: "gang-tay-thu-mon",
        brand: "mizuno",
        league: None,
        unit: "đôi",
        sizes: &[("8", 3), ("9", 2)],
    },
    SeedProduct {
        name: "Tất bóng đá chống trượt",
        price: 90_000,
        discount: 0,
        category: "phu-kien",
        brand: "nike",
        league: Some("v-league"),
        unit: "đôi",
        sizes: &[],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "Store Admin", ROLE_SUPERADMIN).await?;
    let user_id = ensure_user(&pool, "user@example.com", "user123", "Demo Customer", ROLE_CUSTOMER).await?;
    seed_lookup(&pool, "categories", &CATEGORIES).await?;
    seed_lookup(&pool, "brands", &BRANDS).await?;
    seed_lookup(&pool, "leagues", &LEAGUES).await?;
    seed_products(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &DbPool,
    email: &str,
    password: &str,
    full_name: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, role, email_verified)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(id)
}

/// `table` is one of the fixed lookup tables above, never user input.
async fn seed_lookup(pool: &DbPool, table: &str, rows: &[(&str, &str)]) -> anyhow::Result<()> {
    let sql = format!(
        "INSERT INTO {table} (id, name, slug) VALUES ($1, $2, $3) ON CONFLICT (slug) DO NOTHING"
    );
    for (name, slug) in rows {
        sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(*name)
            .bind(*slug)
            .execute(pool)
            .await?;
    }
    println!("Seeded {table}");
    Ok(())
}

async fn seed_products(pool: &DbPool) -> anyhow::Result<()> {
    for product in PRODUCTS {
        let stock: i32 = if product.sizes.is_empty() {
            30
        } else {
            product.sizes.iter().map(|(_, stock)| stock).sum()
        };

        let inserted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO products
                (id, name, price, discount, stock, unit, status, category_id, brand_id, league_id)
            VALUES (
                $1, $2, $3, $4, $5, $6, 'active',
                (SELECT id FROM categories WHERE slug = $7),
                (SELECT id FROM brands WHERE slug = $8),
                (SELECT id FROM leagues WHERE slug = $9)
            )
            ON CONFLICT (name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product.name)
        .bind(product.price)
        .bind(product.discount)
        .bind(stock)
        .bind(product.unit)
        .bind(product.category)
        .bind(product.brand)
        .bind(product.league)
        .fetch_optional(pool)
        .await?;

        // already seeded
        let Some((product_id,)) = inserted else {
            continue;
        };
        for (size, size_stock) in product.sizes {
            sqlx::query(
                "INSERT INTO product_sizes (id, product_id, size, stock) VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(product_id)
            .bind(*size)
            .bind(*size_stock)
            .execute(pool)
            .await?;
        }
    }

    println!("Seeded products");
    Ok(())
}

//! Catalog seed command.
//!
//! Inserts the launch jersey catalog. Idempotent: products are keyed by
//! name and existing rows are left untouched, so the command is safe to
//! re-run against a live database.

use rust_decimal::Decimal;
use tracing::info;

use super::{CommandError, connect};

/// One catalog entry to seed.
struct SeedProduct {
    name: &'static str,
    team: &'static str,
    description: &'static str,
    /// Price in centavos.
    price_cents: i64,
    /// Pre-promotion price in centavos, when discounted.
    original_price_cents: Option<i64>,
    image: &'static str,
    category: &'static str,
    stock: i32,
    /// Rating in tenths (48 = 4.8).
    rating_tenths: i64,
    review_count: i32,
}

const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        name: "Camisa Flamengo I 2024",
        team: "Flamengo",
        description: "Camisa oficial do Flamengo para a temporada 2024. Produzida com tecnologia de alta performance, tecido leve e respirável. Ideal para torcer com estilo e conforto.",
        price_cents: 199_90,
        original_price_cents: Some(299_90),
        image: "https://images.unsplash.com/photo-1551854304-dbbb1c3a6fba?w=600&h=600&fit=crop",
        category: "Brasileiro",
        stock: 3,
        rating_tenths: 48,
        review_count: 234,
    },
    SeedProduct {
        name: "Camisa Corinthians I 2024",
        team: "Corinthians",
        description: "A camisa titular do Corinthians 2024 combina tradição e modernidade. Design clássico em preto e branco com detalhes exclusivos.",
        price_cents: 249_90,
        original_price_cents: None,
        image: "https://images.unsplash.com/photo-1517466787929-bc90951d0974?w=600&h=600&fit=crop",
        category: "Brasileiro",
        stock: 15,
        rating_tenths: 46,
        review_count: 189,
    },
    SeedProduct {
        name: "Camisa Barcelona I 2024",
        team: "Barcelona",
        description: "Camisa oficial do FC Barcelona temporada 2024/25. As tradicionais listras azul e grená em um design moderno e inovador.",
        price_cents: 349_90,
        original_price_cents: Some(449_90),
        image: "https://images.unsplash.com/photo-1489944440615-453fc2b6a9a9?w=600&h=600&fit=crop",
        category: "Europeu",
        stock: 8,
        rating_tenths: 49,
        review_count: 412,
    },
    SeedProduct {
        name: "Camisa Real Madrid I 2024",
        team: "Real Madrid",
        description: "A elegante camisa branca do Real Madrid para 2024/25. Símbolo de grandeza e tradição no futebol mundial.",
        price_cents: 349_90,
        original_price_cents: None,
        image: "https://images.unsplash.com/photo-1431324155629-1a6deb1dec8d?w=600&h=600&fit=crop",
        category: "Europeu",
        stock: 20,
        rating_tenths: 47,
        review_count: 356,
    },
    SeedProduct {
        name: "Camisa Palmeiras I 2024",
        team: "Palmeiras",
        description: "Camisa oficial do Palmeiras 2024. O verde alviverde em um design que une tradição e inovação tecnológica.",
        price_cents: 229_90,
        original_price_cents: Some(279_90),
        image: "https://images.unsplash.com/photo-1459865264687-595d652de67e?w=600&h=600&fit=crop",
        category: "Brasileiro",
        stock: 2,
        rating_tenths: 45,
        review_count: 178,
    },
    SeedProduct {
        name: "Camisa São Paulo I 2024",
        team: "São Paulo",
        description: "A clássica camisa tricolor do São Paulo FC para 2024. Branca com a faixa horizontal vermelha e preta.",
        price_cents: 239_90,
        original_price_cents: None,
        image: "https://images.unsplash.com/photo-1606107557195-0e29a4b5b4aa?w=600&h=600&fit=crop",
        category: "Brasileiro",
        stock: 12,
        rating_tenths: 44,
        review_count: 145,
    },
    SeedProduct {
        name: "Camisa Manchester City I 2024",
        team: "Manchester City",
        description: "Camisa titular do Manchester City 2024/25. O azul celeste dos campeões em tecido de última geração.",
        price_cents: 379_90,
        original_price_cents: Some(449_90),
        image: "https://images.unsplash.com/photo-1553778263-73a83bab9b0c?w=600&h=600&fit=crop",
        category: "Europeu",
        stock: 5,
        rating_tenths: 48,
        review_count: 267,
    },
    SeedProduct {
        name: "Camisa Seleção Brasil I 2024",
        team: "Brasil",
        description: "A amarelinha oficial da Seleção Brasileira. O manto sagrado do futebol brasileiro para vestir com orgulho.",
        price_cents: 299_90,
        original_price_cents: None,
        image: "https://images.unsplash.com/photo-1518091043644-c1d4457512c6?w=600&h=600&fit=crop",
        category: "Seleções",
        stock: 25,
        rating_tenths: 49,
        review_count: 523,
    },
];

/// Seed the jersey catalog.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    info!("Connecting to storefront database...");
    let pool = connect().await?;

    let mut inserted = 0_u32;
    for product in CATALOG {
        let result = sqlx::query(
            r"
            INSERT INTO products
                (name, team, description, price, original_price, image,
                 category, stock, is_promotion, rating, review_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (name) DO NOTHING
            ",
        )
        .bind(product.name)
        .bind(product.team)
        .bind(product.description)
        .bind(Decimal::new(product.price_cents, 2))
        .bind(product.original_price_cents.map(|c| Decimal::new(c, 2)))
        .bind(product.image)
        .bind(product.category)
        .bind(product.stock)
        .bind(product.original_price_cents.is_some())
        .bind(Decimal::new(product.rating_tenths, 1))
        .bind(product.review_count)
        .execute(&pool)
        .await?;

        inserted += u32::try_from(result.rows_affected()).unwrap_or(0);
    }

    info!(
        "Catalog seed complete: {inserted} inserted, {} already present",
        CATALOG.len() - inserted as usize
    );
    Ok(())
}

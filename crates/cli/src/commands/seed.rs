//! Catalog seeding command.
//!
//! Inserts a dozen sample products so a fresh install has something to
//! browse. Skips seeding when the catalog already has rows.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::migrate::{MigrationError, database_url};

struct SeedProduct {
    title: &'static str,
    description: &'static str,
    image: &'static str,
    price: Decimal,
    quantity: i32,
    rating: Decimal,
}

fn sample_products() -> Vec<SeedProduct> {
    // price/rating constructed as (mantissa, scale): (2499, 2) == 24.99
    vec![
        SeedProduct {
            title: "Desk Lamp",
            description: "Warm white LED desk lamp with adjustable arm",
            image: "https://picsum.photos/seed/lamp/400",
            price: Decimal::new(2499, 2),
            quantity: 40,
            rating: Decimal::new(42, 1),
        },
        SeedProduct {
            title: "Ceramic Mug",
            description: "350ml stoneware mug, dishwasher safe",
            image: "https://picsum.photos/seed/mug/400",
            price: Decimal::new(1299, 2),
            quantity: 120,
            rating: Decimal::new(46, 1),
        },
        SeedProduct {
            title: "Notebook A5",
            description: "Dotted 120-page notebook with lay-flat binding",
            image: "https://picsum.photos/seed/notebook/400",
            price: Decimal::new(899, 2),
            quantity: 200,
            rating: Decimal::new(44, 1),
        },
        SeedProduct {
            title: "Mechanical Keyboard",
            description: "Tenkeyless board with hot-swappable switches",
            image: "https://picsum.photos/seed/keyboard/400",
            price: Decimal::new(8900, 2),
            quantity: 25,
            rating: Decimal::new(47, 1),
        },
        SeedProduct {
            title: "Water Bottle",
            description: "750ml insulated steel bottle",
            image: "https://picsum.photos/seed/bottle/400",
            price: Decimal::new(1999, 2),
            quantity: 80,
            rating: Decimal::new(41, 1),
        },
        SeedProduct {
            title: "Canvas Tote",
            description: "Heavy cotton tote with internal pocket",
            image: "https://picsum.photos/seed/tote/400",
            price: Decimal::new(1599, 2),
            quantity: 60,
            rating: Decimal::new(39, 1),
        },
        SeedProduct {
            title: "Wireless Mouse",
            description: "Silent-click mouse, USB-C rechargeable",
            image: "https://picsum.photos/seed/mouse/400",
            price: Decimal::new(3499, 2),
            quantity: 45,
            rating: Decimal::new(43, 1),
        },
        SeedProduct {
            title: "Phone Stand",
            description: "Foldable aluminium stand for phones and tablets",
            image: "https://picsum.photos/seed/stand/400",
            price: Decimal::new(1499, 2),
            quantity: 90,
            rating: Decimal::new(40, 1),
        },
        SeedProduct {
            title: "Desk Mat",
            description: "80x30cm vegan leather desk mat",
            image: "https://picsum.photos/seed/mat/400",
            price: Decimal::new(2299, 2),
            quantity: 70,
            rating: Decimal::new(45, 1),
        },
        SeedProduct {
            title: "Cable Organizer",
            description: "Magnetic cable clips, pack of six",
            image: "https://picsum.photos/seed/cables/400",
            price: Decimal::new(799, 2),
            quantity: 150,
            rating: Decimal::new(38, 1),
        },
        SeedProduct {
            title: "Travel Adapter",
            description: "Universal adapter with dual USB ports",
            image: "https://picsum.photos/seed/adapter/400",
            price: Decimal::new(2799, 2),
            quantity: 55,
            rating: Decimal::new(42, 1),
        },
        SeedProduct {
            title: "Plant Pot",
            description: "12cm terracotta pot with drainage dish",
            image: "https://picsum.photos/seed/pot/400",
            price: Decimal::new(999, 2),
            quantity: 100,
            rating: Decimal::new(44, 1),
        },
    ]
}

/// Seed the catalog.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or an insert
/// fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;

    if existing > 0 {
        tracing::info!(existing, "catalog already seeded, skipping");
        return Ok(());
    }

    let products = sample_products();
    for product in &products {
        sqlx::query(
            "INSERT INTO products (title, description, image, price, quantity, is_active, rating)
             VALUES ($1, $2, $3, $4, $5, TRUE, $6)",
        )
        .bind(product.title)
        .bind(product.description)
        .bind(product.image)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.rating)
        .execute(&pool)
        .await?;
    }

    tracing::info!(count = products.len(), "catalog seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_products_are_valid() {
        for product in sample_products() {
            assert!(!product.title.is_empty());
            assert!(product.price > Decimal::ZERO);
            assert!(product.quantity > 0);
            assert!(product.rating >= Decimal::ZERO && product.rating <= Decimal::from(5));
        }
    }
}

//! Built-in sample listings used when a live page yields nothing.

use crate::extract::{PriceNormalizer, ProductRecord};

const SAMPLE_LISTINGS: &[(&str, &str)] = &[
    ("Calvin Klein CK One Eau de Toilette - 200ml", "R 799.00"),
    ("Hugo Boss Bottled Eau de Toilette - 100ml", "R 1299.00"),
    ("DKNY Be Delicious Women Eau de Parfum - 50ml", "R 1199.00"),
    ("Versace Bright Crystal Eau de Toilette - 90ml", "R 1699.00"),
    ("Davidoff Cool Water Eau de Toilette - 125ml", "R 899.00"),
    ("Dolce & Gabbana Light Blue Eau de Toilette - 100ml", "R 1799.00"),
    ("Jimmy Choo Eau de Parfum - 60ml", "R 1499.00"),
    ("Marc Jacobs Daisy Eau de Toilette - 50ml", "R 1399.00"),
    ("Lacoste Essential Eau de Toilette - 125ml", "R 1099.00"),
    ("Burberry London for Men Eau de Toilette - 100ml", "R 1299.00"),
    ("Paco Rabanne 1 Million Eau de Toilette - 100ml", "R 1599.00"),
    ("Gucci Guilty Eau de Toilette - 90ml", "R 1899.00"),
    ("Aramis Classic Eau de Toilette - 110ml", "R 899.00"),
    ("Elizabeth Arden Green Tea Scent Spray - 100ml", "R 699.00"),
    ("Diesel Only The Brave Eau de Toilette - 75ml", "R 1299.00"),
];

/// Sample fragrance records priced with `normalizer`'s currency symbol.
pub fn sample_products(normalizer: &PriceNormalizer) -> Vec<ProductRecord> {
    SAMPLE_LISTINGS
        .iter()
        .filter_map(|(name, price)| {
            let price = normalizer.normalize(price).ok()?;
            ProductRecord::new(*name, price)
        })
        .collect()
}

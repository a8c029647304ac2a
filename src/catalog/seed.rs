//! Sample catalog loaded at start-up.

use crate::catalog::{Category, NewProduct, Specifications};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn specs(capacity: &str, material: &str, dimensions: &str, weight: &str, color: &str) -> Specifications {
    Specifications {
        capacity: capacity.to_string(),
        material: material.to_string(),
        dimensions: dimensions.to_string(),
        weight: weight.to_string(),
        color: color.to_string(),
    }
}

const IMG_STEEL: &str = "https://images.unsplash.com/photo-1602143407151-7111542de6e8?w=500";
const IMG_OUTDOOR: &str = "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=500";
const IMG_BAMBOO: &str = "https://images.unsplash.com/photo-1583394838336-acd977736f90?w=500";

/// The five products of the demo store.
pub fn sample_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "EcoFlow Pro Water Bottle".to_string(),
            description: "Premium stainless steel water bottle with advanced insulation technology. \
                Keeps drinks cold for 24 hours and hot for 12 hours. Perfect for outdoor adventures and daily use."
                .to_string(),
            price: 49.99,
            original_price: Some(69.99),
            images: strings(&[IMG_STEEL, IMG_OUTDOOR]),
            category: Category::WaterBottles,
            in_stock: true,
            stock_quantity: 100,
            rating: 4.8,
            num_reviews: 156,
            features: strings(&[
                "24-hour cold retention",
                "12-hour hot retention",
                "Leak-proof design",
                "BPA-free materials",
                "Dishwasher safe",
            ]),
            specifications: specs(
                "32oz (950ml)",
                "18/8 Stainless Steel",
                "11.5\" x 3.5\" x 3.5\"",
                "1.2 lbs",
                "Matte Black",
            ),
            is_featured: true,
            tags: strings(&["bestseller", "premium", "insulated"]),
        },
        NewProduct {
            name: "GreenLife Bamboo Bottle".to_string(),
            description: "Sustainable bamboo fiber water bottle with natural antimicrobial properties. \
                Lightweight and eco-friendly alternative to plastic bottles."
                .to_string(),
            price: 29.99,
            original_price: Some(39.99),
            images: strings(&[IMG_BAMBOO, IMG_OUTDOOR]),
            category: Category::WaterBottles,
            in_stock: true,
            stock_quantity: 75,
            rating: 4.5,
            num_reviews: 89,
            features: strings(&[
                "Bamboo fiber construction",
                "Natural antimicrobial",
                "Lightweight design",
                "Eco-friendly materials",
                "Easy to clean",
            ]),
            specifications: specs(
                "20oz (600ml)",
                "Bamboo Fiber",
                "9.5\" x 2.8\" x 2.8\"",
                "0.8 lbs",
                "Natural Bamboo",
            ),
            is_featured: true,
            tags: strings(&["eco-friendly", "bamboo", "lightweight"]),
        },
        NewProduct {
            name: "HydroMax Sports Bottle".to_string(),
            description: "High-performance sports water bottle designed for athletes. \
                Features a wide mouth for easy filling and a secure flip-top lid for quick access during workouts."
                .to_string(),
            price: 24.99,
            original_price: None,
            images: strings(&[IMG_STEEL, IMG_OUTDOOR]),
            category: Category::WaterBottles,
            in_stock: true,
            stock_quantity: 120,
            rating: 4.3,
            num_reviews: 203,
            features: strings(&[
                "Wide mouth design",
                "Flip-top lid",
                "Non-slip grip",
                "Durable construction",
                "BPA-free",
            ]),
            specifications: specs(
                "28oz (830ml)",
                "Tritan Plastic",
                "10.5\" x 3.2\" x 3.2\"",
                "0.6 lbs",
                "Blue",
            ),
            is_featured: false,
            tags: strings(&["sports", "athletic", "durable"]),
        },
        NewProduct {
            name: "Bottle Cleaning Kit".to_string(),
            description: "Complete cleaning kit for maintaining your water bottles. \
                Includes brushes, cleaning tablets, and storage case."
                .to_string(),
            price: 19.99,
            original_price: None,
            images: strings(&[IMG_BAMBOO]),
            category: Category::Accessories,
            in_stock: true,
            stock_quantity: 50,
            rating: 4.6,
            num_reviews: 67,
            features: strings(&[
                "Multiple brush sizes",
                "Cleaning tablets",
                "Storage case",
                "Long-lasting",
                "Easy to use",
            ]),
            specifications: specs("N/A", "Silicone & Plastic", "8\" x 4\" x 2\"", "0.3 lbs", "Multi-color"),
            is_featured: false,
            tags: strings(&["cleaning", "maintenance", "accessories"]),
        },
        NewProduct {
            name: "Eco Starter Pack".to_string(),
            description: "Perfect starter pack for eco-conscious individuals. \
                Includes our best-selling water bottle, cleaning kit, and reusable straws."
                .to_string(),
            price: 79.99,
            original_price: Some(99.99),
            images: strings(&[IMG_STEEL, IMG_BAMBOO]),
            category: Category::GiftSets,
            in_stock: true,
            stock_quantity: 25,
            rating: 4.9,
            num_reviews: 34,
            features: strings(&[
                "Complete starter set",
                "Best value package",
                "Gift-ready packaging",
                "Eco-friendly materials",
                "Perfect for beginners",
            ]),
            specifications: specs(
                "32oz + Accessories",
                "Stainless Steel + Accessories",
                "12\" x 8\" x 6\"",
                "2.1 lbs",
                "Gift Box",
            ),
            is_featured: true,
            tags: strings(&["gift", "starter", "bundle", "value"]),
        },
    ]
}

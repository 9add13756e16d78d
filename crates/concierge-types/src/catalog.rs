use serde::{Deserialize, Serialize};

/// A denormalized catalog record used only for grounding the assistant.
///
/// Price fields are VND. `sale_price` comes from the lowest-ordered
/// variant when a promotion is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub brand: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub concentration: Option<String>,
    #[serde(default)]
    pub scents: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub price: f64,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub volume_ml: Option<u32>,
}

/// Optional shopper context blended into the system prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopperContext {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub cart: Vec<CartItem>,
    /// Product names on the wishlist.
    #[serde(default)]
    pub wishlist: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_name: String,
    pub quantity: u32,
}

/// One completed turn, logged out-of-band to the analytics sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionLog {
    #[serde(default)]
    pub user_id: Option<String>,
    pub query: String,
    pub response: String,
    pub timestamp: String,
}

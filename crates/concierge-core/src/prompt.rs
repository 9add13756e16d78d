//! System-prompt assembly.
//!
//! Pure and deterministic: identical inputs produce an identical prompt.
//! The prompt is a fixed policy block followed by one formatted record per
//! catalog product, plus optional shopper context (cart, wishlist).

use concierge_types::{
    catalog::{ProductSummary, ShopperContext},
    config::ShopConfig,
};

/// Build the full system prompt for one session.
///
/// An empty catalog still yields a valid prompt — the products section is
/// simply omitted. Output length is bounded only by the upstream fetch limit.
pub fn build_system_prompt(
    products: &[ProductSummary],
    shopper: &ShopperContext,
    shop: &ShopConfig,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Bạn là trợ lý mua sắm của cửa hàng nước hoa {}.\n\n",
        shop.shop_name
    ));
    prompt.push_str(POLICY_BLOCK);
    prompt.push_str(&format!(
        "- Khi nhắc đến sản phẩm, luôn kèm liên kết dạng {}/san-pham/<slug>.\n\n",
        shop.base_url
    ));

    if !products.is_empty() {
        prompt.push_str("Danh sách sản phẩm hiện có:\n");
        for product in products {
            prompt.push_str(&format_product(product, shop));
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    if let Some(name) = &shopper.display_name {
        prompt.push_str(&format!("Khách hàng hiện tại: {}.\n", name));
    }
    if !shopper.cart.is_empty() {
        prompt.push_str("Giỏ hàng của khách:\n");
        for item in &shopper.cart {
            prompt.push_str(&format!("- {} x{}\n", item.product_name, item.quantity));
        }
    }
    if !shopper.wishlist.is_empty() {
        prompt.push_str("Danh sách yêu thích của khách:\n");
        for name in &shopper.wishlist {
            prompt.push_str(&format!("- {}\n", name));
        }
    }

    prompt
}

const POLICY_BLOCK: &str = "\
Quy tắc trả lời:\n\
- Luôn trả lời bằng tiếng Việt, trừ khi khách yêu cầu ngôn ngữ khác.\n\
- Sẵn sàng giải thích thuật ngữ nước hoa (EDP, EDT, tầng hương...) khi được hỏi.\n\
- Chỉ tư vấn về nước hoa và sản phẩm của cửa hàng, không bàn chủ đề khác.\n\
- Không đưa ý kiến cá nhân, chỉ dựa trên thông tin sản phẩm.\n\
- Không dẫn liên kết ra ngoài cửa hàng.\n";

/// Canonical product URL: `{base_url}/san-pham/{slug}`.
pub fn product_url(shop: &ShopConfig, slug: &str) -> String {
    format!("{}/san-pham/{}", shop.base_url, slug)
}

fn format_product(p: &ProductSummary, shop: &ShopConfig) -> String {
    let mut line = format!("- {} — {}", p.name, p.brand);

    if let Some(gender) = &p.gender {
        line.push_str(&format!(" | {}", gender));
    }
    if let Some(concentration) = &p.concentration {
        line.push_str(&format!(" | {}", concentration));
    }
    if let Some(volume) = p.volume_ml {
        line.push_str(&format!(" | {}ml", volume));
    }

    match p.sale_price {
        Some(sale) if sale < p.price => {
            line.push_str(&format!(
                " | {} (giảm còn {})",
                format_vnd(p.price),
                format_vnd(sale)
            ));
        }
        _ => line.push_str(&format!(" | {}", format_vnd(p.price))),
    }

    if !p.scents.is_empty() {
        line.push_str(&format!(" | hương: {}", p.scents.join(", ")));
    }

    line.push_str(&format!(" | {}", product_url(shop, &p.slug)));
    line
}

/// Format a VND amount with dot thousand separators, e.g. `1.250.000₫`.
pub fn format_vnd(amount: f64) -> String {
    let value = amount.round() as i64;
    let digits = value.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if value < 0 {
        format!("-{}₫", grouped)
    } else {
        format!("{}₫", grouped)
    }
}

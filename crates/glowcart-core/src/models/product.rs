use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::FormData;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    /// Sale price, when the product is on offer.
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub shades: Vec<String>,
    #[serde(default)]
    pub stock: Option<u32>,
}

impl Product {
    /// Price a customer pays right now.
    pub fn effective_price(&self) -> f64 {
        match self.discount_price {
            Some(sale) if sale > 0.0 && sale < self.price => sale,
            _ => self.price,
        }
    }

    pub fn is_on_sale(&self) -> bool {
        self.effective_price() < self.price
    }

    /// Unknown stock counts as available.
    pub fn in_stock(&self) -> bool {
        self.stock.map(|s| s > 0).unwrap_or(true)
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsPayload {
    #[serde(default, alias = "data")]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    #[serde(alias = "data")]
    pub product: Product,
}

/// Filters for the product listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ProductQuery {
    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Query params, leaving out unset filters. `None` when nothing is set.
    pub fn to_params(&self) -> Option<Value> {
        let mut params = Map::new();
        if let Some(limit) = self.limit {
            params.insert("limit".to_string(), limit.into());
        }
        if let Some(page) = self.page {
            params.insert("page".to_string(), page.into());
        }
        if let Some(ref category) = self.category {
            params.insert("category".to_string(), category.clone().into());
        }
        if let Some(search) = self.search.as_ref().filter(|s| !s.trim().is_empty()) {
            params.insert("search".to_string(), search.trim().into());
        }
        if params.is_empty() {
            None
        } else {
            Some(Value::Object(params))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Fields for creating or updating a product, sent as multipart form data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpload {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub shades: Vec<String>,
    pub images: Vec<ImageUpload>,
}

impl ProductUpload {
    pub fn to_form_data(&self, id: Option<&str>) -> FormData {
        let mut form = FormData::new();
        if let Some(id) = id {
            form = form.text("id", id);
        }
        form = form
            .text("name", self.name.clone())
            .text("price", self.price.to_string());
        if let Some(ref description) = self.description {
            form = form.text("description", description.clone());
        }
        if let Some(discount) = self.discount_price {
            form = form.text("discountPrice", discount.to_string());
        }
        if let Some(ref category) = self.category {
            form = form.text("category", category.clone());
        }
        if let Some(stock) = self.stock {
            form = form.text("stock", stock.to_string());
        }
        for shade in &self.shades {
            form = form.text("shades", shade.clone());
        }
        for image in &self.images {
            form = form.file(
                "images",
                image.file_name.clone(),
                image.mime.clone(),
                image.bytes.clone(),
            );
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lip_oil() -> Product {
        serde_json::from_value(json!({
            "_id": "p-1",
            "name": "Rose Lip Oil",
            "price": 4500.0,
            "discountPrice": 3800.0,
            "images": ["https://cdn.glowcart.test/rose.png"],
            "stock": 0
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_backend_product() {
        let product = lip_oil();
        assert_eq!(product.id, "p-1");
        assert_eq!(product.effective_price(), 3800.0);
        assert!(product.is_on_sale());
        assert!(!product.in_stock());
        assert_eq!(product.thumbnail(), Some("https://cdn.glowcart.test/rose.png"));
    }

    #[test]
    fn test_sale_price_above_price_is_ignored() {
        let mut product = lip_oil();
        product.discount_price = Some(9000.0);
        assert_eq!(product.effective_price(), 4500.0);
        assert!(!product.is_on_sale());
    }

    #[test]
    fn test_query_params() {
        assert_eq!(ProductQuery::default().to_params(), None);
        assert_eq!(ProductQuery::limit(20).to_params(), Some(json!({ "limit": 20 })));

        let query = ProductQuery {
            page: Some(2),
            search: Some("  serum ".to_string()),
            ..ProductQuery::default()
        };
        assert_eq!(query.to_params(), Some(json!({ "page": 2, "search": "serum" })));
    }

    #[test]
    fn test_upload_form_fields() {
        let upload = ProductUpload {
            name: "Glow Serum".to_string(),
            price: 12000.0,
            shades: vec!["Light".to_string(), "Deep".to_string()],
            images: vec![ImageUpload {
                file_name: "serum.jpg".to_string(),
                mime: "image/jpeg".to_string(),
                bytes: vec![0xff, 0xd8],
            }],
            ..ProductUpload::default()
        };
        // id, name, price, two shades, one image
        assert_eq!(upload.to_form_data(Some("p-9")).len(), 6);
        assert_eq!(upload.to_form_data(None).len(), 5);
    }
}

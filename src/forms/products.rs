use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::category::Category;
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{
    CategoryId, ProductDescription, ProductName, ProductPrice, StockCount,
};
use crate::forms::validation::{FieldErrors, IntegerRule, Rejection, TextRule, escape};

/// `category` as submitted: missing, a single checkbox or several.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRefsInput {
    One(String),
    Many(Vec<String>),
}

impl CategoryRefsInput {
    /// Absent becomes empty, a scalar becomes a single element. Values are
    /// trimmed, blanks dropped and duplicates removed keeping the first.
    pub fn normalize(input: Option<Self>) -> Vec<String> {
        let raw = match input {
            None => Vec::new(),
            Some(Self::One(value)) => vec![value],
            Some(Self::Many(values)) => values,
        };

        let mut refs: Vec<String> = Vec::with_capacity(raw.len());
        for value in raw {
            let value = value.trim();
            if !value.is_empty() && !refs.iter().any(|r| r == value) {
                refs.push(value.to_string());
            }
        }
        refs
    }
}

/// Raw product form as submitted by the create and update pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default, rename = "numberInStock")]
    pub number_in_stock: String,
    #[serde(default)]
    pub category: Option<CategoryRefsInput>,
}

impl ProductForm {
    /// Builds the form from urlencoded pairs, folding repeated keys into a list.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, serde_json::Error> {
        let mut fields = Map::new();
        for (key, value) in pairs {
            match fields.get_mut(&key) {
                Some(Value::Array(items)) => items.push(Value::String(value)),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
                None => {
                    fields.insert(key, Value::String(value));
                }
            }
        }
        serde_json::from_value(Value::Object(fields))
    }
}

/// Sanitized values rendered back into the product form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductFormValues {
    pub name: String,
    pub description: String,
    pub price: String,
    pub number_in_stock: String,
    pub category: Vec<String>,
}

impl From<&Product> for ProductFormValues {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.as_str().to_string(),
            description: product.description.as_str().to_string(),
            price: product.price.to_string(),
            number_in_stock: product.number_in_stock.to_string(),
            category: product.category_ids.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Per-operation rule set for product forms.
#[derive(Debug, Clone, Copy)]
pub struct ProductRules {
    pub name: TextRule,
    pub description: TextRule,
    pub price: IntegerRule,
    pub number_in_stock: IntegerRule,
}

const PRICE: IntegerRule = IntegerRule::new(
    "Price",
    10,
    "Price must be a number",
    "Product cannot have a negative cost",
);

const NUMBER_IN_STOCK: IntegerRule = IntegerRule::new(
    "NumberInStock",
    10,
    "NumberInStock must be a number",
    "Stock cannot have a negative number of products",
);

const DESCRIPTION: TextRule = TextRule::new(
    "Description",
    1,
    Some(300),
    "Description must not be empty.",
);

impl ProductRules {
    pub const CREATE: Self = Self {
        name: TextRule::new("Name", 1, Some(50), "Name must not be empty."),
        description: DESCRIPTION,
        price: PRICE,
        number_in_stock: NUMBER_IN_STOCK,
    };

    /// Updates only enforce the stored record's 100 character name limit.
    pub const UPDATE: Self = Self {
        name: TextRule::new("Name", 1, Some(100), "Name must not be empty."),
        ..Self::CREATE
    };
}

/// Validated and sanitized product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFormPayload {
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: ProductPrice,
    pub number_in_stock: StockCount,
    pub category_ids: Vec<CategoryId>,
    pub values: ProductFormValues,
}

impl ProductFormPayload {
    pub fn into_new_product(self) -> NewProduct {
        let now = Utc::now().naive_utc();
        NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            number_in_stock: self.number_in_stock,
            category_ids: self.category_ids,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ProductForm {
    /// Normalizes category refs, then trims, checks and escapes every field.
    ///
    /// Each ref must name one of `categories`.
    pub fn validate_with(
        self,
        rules: &ProductRules,
        categories: &[Category],
    ) -> Result<ProductFormPayload, Rejection<ProductFormValues>> {
        let mut errors = FieldErrors::default();

        let refs = CategoryRefsInput::normalize(self.category);
        let name = self.name.trim();
        let description = self.description.trim();
        let price = self.price.trim();
        let number_in_stock = self.number_in_stock.trim();

        rules.name.check("name", name, &mut errors);
        rules.description.check("description", description, &mut errors);
        let price_value = rules.price.check("price", price, &mut errors);
        let stock_value = rules
            .number_in_stock
            .check("numberInStock", number_in_stock, &mut errors);

        let mut category_ids = Vec::with_capacity(refs.len());
        for value in &refs {
            match value.parse::<CategoryId>() {
                // "1" and "01" name the same category; the first one wins.
                Ok(id) if category_ids.contains(&id) => {}
                Ok(id) if categories.iter().any(|c| c.id == id) => category_ids.push(id),
                _ => errors.add("category", "Selected category does not exist"),
            }
        }

        let values = ProductFormValues {
            name: escape(name),
            description: escape(description),
            price: escape(price),
            number_in_stock: escape(number_in_stock),
            category: refs.iter().map(|r| escape(r)).collect(),
        };

        let name = errors.typed("name", ProductName::new(values.name.clone()));
        let description = errors.typed(
            "description",
            ProductDescription::new(values.description.clone()),
        );
        let price = price_value.and_then(|p| errors.typed("price", ProductPrice::new(p as f64)));
        let number_in_stock =
            stock_value.and_then(|s| errors.typed("numberInStock", StockCount::new(s)));

        match (name, description, price, number_in_stock) {
            (Some(name), Some(description), Some(price), Some(number_in_stock))
                if errors.is_empty() =>
            {
                Ok(ProductFormPayload {
                    name,
                    description,
                    price,
                    number_in_stock,
                    category_ids,
                    values,
                })
            }
            _ => Err(Rejection {
                values,
                errors: errors.into_vec(),
            }),
        }
    }
}

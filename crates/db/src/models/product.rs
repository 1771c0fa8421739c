//! Product request DTOs and write models.

use bson::{Bson, Document};
use catalog_core::error::CoreError;
use catalog_core::product::{
    check_required, coerce_number, NumericInput, DEFAULT_IS_SPARE_PART, DEFAULT_LOW_VALUE_FLAG,
    DEFAULT_MAIN_BOOST, DEFAULT_NEW_PRODUCT, DEFAULT_POPULARITY, DEFAULT_PRICE_CASH,
    DEFAULT_SHOW_IN_APP, FIELD_BRAND_LOGO, FIELD_BRAND_NAME, FIELD_CATEGORY_NAME,
    FIELD_DESCRIPTION, FIELD_DISCOUNT, FIELD_IS_SPARE_PART, FIELD_LINK, FIELD_NEW_PRODUCT,
    FIELD_PRICE_CASH, FIELD_PRODUCT_NAME, FIELD_SHOW_IN_APP, MAX_LINKS, MAX_TEXT_LEN,
};
use catalog_core::types::{ProductId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::validation_message;

const INVALID_PRICE: &str = "Invalid price format";
const INVALID_DATA: &str = "Invalid data format";

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Body of `POST /products`.
///
/// Everything is optional at the type level so that a missing required field
/// is reported by [`CreateProduct::into_draft`] with its name, not as a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(max = MAX_TEXT_LEN))]
    pub product_code: Option<String>,
    #[validate(length(max = MAX_TEXT_LEN))]
    pub product_name: Option<String>,
    #[validate(length(max = MAX_TEXT_LEN))]
    pub category_name: Option<String>,
    #[validate(length(max = MAX_TEXT_LEN))]
    pub brand_name: Option<String>,
    #[validate(length(max = MAX_TEXT_LEN))]
    pub brand_logo: Option<String>,
    pub price_cash: Option<NumericInput>,
    #[validate(length(max = MAX_TEXT_LEN))]
    pub description: Option<String>,
    #[validate(length(max = MAX_LINKS))]
    pub link: Option<Vec<String>>,
    pub show_in_app: Option<bool>,
    pub new_product: Option<bool>,
    pub discount: Option<NumericInput>,
    pub is_spare_part: Option<bool>,
    pub main_boost: Option<NumericInput>,
    pub low_value_flag: Option<NumericInput>,
    pub popularity: Option<NumericInput>,
}

impl CreateProduct {
    /// Check required fields, text limits and numeric formats, then fill
    /// defaults.
    ///
    /// Required fields are checked first and in a fixed order, so the error
    /// names the first one missing.
    pub fn into_draft(self) -> Result<ProductDraft, CoreError> {
        check_required([
            (FIELD_PRODUCT_NAME, self.product_name.as_deref()),
            (FIELD_CATEGORY_NAME, self.category_name.as_deref()),
            (FIELD_BRAND_NAME, self.brand_name.as_deref()),
        ])?;

        self.validate().map_err(|e| CoreError::Validation(validation_message(&e)))?;

        let price_cash = coerce_number(self.price_cash.as_ref(), INVALID_PRICE)?;
        let discount = coerce_number(self.discount.as_ref(), INVALID_DATA)?;
        let main_boost = coerce_number(self.main_boost.as_ref(), INVALID_DATA)?;
        let low_value_flag = coerce_number(self.low_value_flag.as_ref(), INVALID_DATA)?;
        let popularity = coerce_number(self.popularity.as_ref(), INVALID_DATA)?;

        Ok(ProductDraft {
            product_code: self.product_code,
            // Presence checked above.
            product_name: self.product_name.unwrap_or_default(),
            category_name: self.category_name.unwrap_or_default(),
            brand_name: self.brand_name.unwrap_or_default(),
            brand_logo: self.brand_logo,
            price_cash: price_cash.unwrap_or(DEFAULT_PRICE_CASH),
            description: self.description.unwrap_or_default(),
            link: self.link.unwrap_or_default(),
            show_in_app: self.show_in_app.unwrap_or(DEFAULT_SHOW_IN_APP),
            new_product: self.new_product.unwrap_or(DEFAULT_NEW_PRODUCT),
            discount,
            is_spare_part: self.is_spare_part.unwrap_or(DEFAULT_IS_SPARE_PART),
            main_boost: main_boost.unwrap_or(DEFAULT_MAIN_BOOST),
            low_value_flag: low_value_flag.unwrap_or(DEFAULT_LOW_VALUE_FLAG),
            popularity: popularity.unwrap_or(DEFAULT_POPULARITY),
        })
    }
}

/// Body of `PUT /products/{id}`.
///
/// Only these fields may change; any other key in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(max = MAX_TEXT_LEN))]
    pub product_name: Option<String>,
    #[validate(length(max = MAX_TEXT_LEN))]
    pub category_name: Option<String>,
    #[validate(length(max = MAX_TEXT_LEN))]
    pub brand_name: Option<String>,
    #[validate(length(max = MAX_TEXT_LEN))]
    pub brand_logo: Option<String>,
    #[validate(length(max = MAX_TEXT_LEN))]
    pub description: Option<String>,
    #[validate(length(max = MAX_LINKS))]
    pub link: Option<Vec<String>>,
    pub show_in_app: Option<bool>,
    pub new_product: Option<bool>,
    /// `Some(None)` clears the discount.
    #[serde(default, deserialize_with = "present")]
    pub discount: Option<Option<NumericInput>>,
    pub is_spare_part: Option<bool>,
    pub price_cash: Option<NumericInput>,
}

impl UpdateProduct {
    /// Validate and coerce the allowed fields into a [`ProductPatch`].
    pub fn into_patch(self) -> Result<ProductPatch, CoreError> {
        self.validate().map_err(|e| CoreError::Validation(validation_message(&e)))?;

        let price_cash = match &self.price_cash {
            None => None,
            Some(input) => Some(
                input
                    .coerce()
                    .ok()
                    .flatten()
                    .ok_or_else(|| CoreError::Validation(INVALID_PRICE.to_string()))?,
            ),
        };

        let discount = match &self.discount {
            None => None,
            Some(None) => Some(None),
            Some(Some(input)) => Some(coerce_number(Some(input), INVALID_DATA)?),
        };

        let patch = ProductPatch {
            product_name: self.product_name,
            category_name: self.category_name,
            brand_name: self.brand_name,
            brand_logo: self.brand_logo,
            description: self.description,
            link: self.link,
            show_in_app: self.show_in_app,
            new_product: self.new_product,
            discount,
            is_spare_part: self.is_spare_part,
            price_cash,
        };

        if patch.is_empty() {
            return Err(CoreError::Validation(
                "No valid fields to update".to_string(),
            ));
        }

        Ok(patch)
    }
}

/// Deserialize a field that may be explicitly `null`, keeping "present but
/// null" distinct from "absent" (absent comes from `#[serde(default)]`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Write models
// ---------------------------------------------------------------------------

/// A validated product awaiting its `product_id` and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    pub product_name: String,
    pub category_name: String,
    pub brand_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_logo: Option<String>,
    pub price_cash: f64,
    pub description: String,
    pub link: Vec<String>,
    pub show_in_app: bool,
    pub new_product: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    pub is_spare_part: bool,
    pub main_boost: f64,
    pub low_value_flag: f64,
    pub popularity: f64,
}

/// The document inserted for a new product.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub product_id: ProductId,
    #[serde(flatten)]
    pub draft: ProductDraft,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl NewProduct {
    pub fn new(product_id: ProductId, draft: ProductDraft, now: Timestamp) -> Self {
        let stamp = bson::DateTime::from_chrono(now);
        Self {
            product_id,
            draft,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    pub fn to_document(&self) -> Result<Document, bson::ser::Error> {
        bson::to_document(self)
    }
}

/// A validated set of field changes. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub product_name: Option<String>,
    pub category_name: Option<String>,
    pub brand_name: Option<String>,
    pub brand_logo: Option<String>,
    pub description: Option<String>,
    pub link: Option<Vec<String>>,
    pub show_in_app: Option<bool>,
    pub new_product: Option<bool>,
    pub discount: Option<Option<f64>>,
    pub is_spare_part: Option<bool>,
    pub price_cash: Option<f64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.to_document().is_empty()
    }

    /// The `$set` body for this patch (without `updated_at`).
    pub fn to_document(&self) -> Document {
        let mut set = Document::new();

        let texts = [
            (FIELD_PRODUCT_NAME, &self.product_name),
            (FIELD_CATEGORY_NAME, &self.category_name),
            (FIELD_BRAND_NAME, &self.brand_name),
            (FIELD_BRAND_LOGO, &self.brand_logo),
            (FIELD_DESCRIPTION, &self.description),
        ];
        for (field, value) in texts {
            if let Some(v) = value {
                set.insert(field, v.clone());
            }
        }

        if let Some(link) = &self.link {
            set.insert(FIELD_LINK, link.clone());
        }

        let flags = [
            (FIELD_SHOW_IN_APP, self.show_in_app),
            (FIELD_NEW_PRODUCT, self.new_product),
            (FIELD_IS_SPARE_PART, self.is_spare_part),
        ];
        for (field, value) in flags {
            if let Some(v) = value {
                set.insert(field, v);
            }
        }

        if let Some(discount) = self.discount {
            set.insert(FIELD_DISCOUNT, discount.map_or(Bson::Null, Bson::Double));
        }
        if let Some(price) = self.price_cash {
            set.insert(FIELD_PRICE_CASH, price);
        }

        set
    }
}

//! MongoDB implementation of [`ProductStore`].

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use catalog_core::product::{
    FIELD_OBJECT_ID, FIELD_PRODUCT_CODE, FIELD_PRODUCT_ID, FIELD_PRODUCT_NAME, FIELD_SHOW_IN_APP,
    FIELD_UPDATED_AT, LIST_FIELDS,
};
use catalog_core::search::{numeric_term, Visibility};
use catalog_core::types::ProductId;
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database, IndexModel};

use crate::error::{StoreError, StoreResult};
use crate::store::{integer_field, product_id_of, Page, ProductFilter, ProductStore};

/// `_id` of the counter document that backs `product_id` allocation.
const PRODUCT_ID_COUNTER: &str = "product_id";

/// Connection settings for the product collection.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub counters_collection: String,
}

/// Product store backed by a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoProductStore {
    database: Database,
    products: Collection<Document>,
    counters: Collection<Document>,
}

impl MongoProductStore {
    /// Connect using `config` and verify the server answers a ping.
    pub async fn connect(config: &MongoConfig) -> StoreResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let store = Self::from_client(&client, config);
        store.ping().await?;
        Ok(store)
    }

    /// Build a store from an existing client without any I/O.
    pub fn from_client(client: &Client, config: &MongoConfig) -> Self {
        let database = client.database(&config.database);
        Self {
            products: database.collection(&config.collection),
            counters: database.collection(&config.counters_collection),
            database,
        }
    }

    /// Create the ascending `product_id` index used for sorting and lookups.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { FIELD_PRODUCT_ID: 1 })
            .build();
        self.products.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find_by_product_id(&self, product_id: ProductId) -> StoreResult<Option<Document>> {
        Ok(self
            .products
            .find_one(doc! { FIELD_PRODUCT_ID: product_id })
            .await?)
    }

    async fn find_by_object_id(&self, id: ObjectId) -> StoreResult<Option<Document>> {
        Ok(self.products.find_one(doc! { FIELD_OBJECT_ID: id }).await?)
    }

    async fn list(&self, filter: &ProductFilter, page: Page) -> StoreResult<Vec<Document>> {
        let cursor = self
            .products
            .find(filter_document(filter))
            .projection(list_projection())
            .sort(doc! { FIELD_PRODUCT_ID: 1 })
            .skip(page.skip.max(0) as u64)
            .limit(page.limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, filter: &ProductFilter) -> StoreResult<u64> {
        Ok(self
            .products
            .count_documents(filter_document(filter))
            .await?)
    }

    async fn max_product_id(&self) -> StoreResult<Option<ProductId>> {
        // Walk down from the largest number; non-integral values are skipped.
        let mut cursor = self
            .products
            .find(doc! { FIELD_PRODUCT_ID: { "$type": "number" } })
            .sort(doc! { FIELD_PRODUCT_ID: -1 })
            .projection(doc! { FIELD_PRODUCT_ID: 1 })
            .await?;
        while let Some(doc) = cursor.try_next().await? {
            if let Some(id) = product_id_of(&doc) {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    async fn allocate_product_id(&self, floor: ProductId) -> StoreResult<ProductId> {
        // Pipeline update so the floor is applied and the counter advanced in
        // one atomic step.
        let update = vec![doc! {
            "$set": {
                "seq": {
                    "$add": [
                        { "$max": [ { "$ifNull": ["$seq", 0_i64] }, floor ] },
                        1_i64,
                    ]
                }
            }
        }];

        let counter = self
            .counters
            .find_one_and_update(doc! { FIELD_OBJECT_ID: PRODUCT_ID_COUNTER }, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(StoreError::CounterUnavailable)?;

        integer_field(&counter, "seq").ok_or(StoreError::CounterUnavailable)
    }

    async fn insert(&self, doc: Document) -> StoreResult<ObjectId> {
        let result = self.products.insert_one(doc).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::MissingObjectId)
    }

    async fn set_fields(&self, id: ObjectId, fields: Document) -> StoreResult<u64> {
        let result = self
            .products
            .update_one(doc! { FIELD_OBJECT_ID: id }, doc! { "$set": fields })
            .await?;
        Ok(result.modified_count)
    }

    async fn deactivate(&self, id: ObjectId, at: bson::DateTime) -> StoreResult<bool> {
        let result = self
            .products
            .update_one(
                doc! { FIELD_OBJECT_ID: id, FIELD_SHOW_IN_APP: { "$ne": false } },
                doc! { "$set": { FIELD_SHOW_IN_APP: false, FIELD_UPDATED_AT: at } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }
}

/// Translate a [`ProductFilter`] into a MongoDB query document.
///
/// The search term is matched literally (regex metacharacters escaped),
/// case-insensitively, against name and code; an all-digit term also matches
/// `product_id` exactly.
pub fn filter_document(filter: &ProductFilter) -> Document {
    let mut query = Document::new();

    if let Some(term) = &filter.search {
        let pattern = regex::escape(term);
        let mut alternatives = vec![
            doc! { FIELD_PRODUCT_NAME: { "$regex": pattern.clone(), "$options": "i" } },
            doc! { FIELD_PRODUCT_CODE: { "$regex": pattern, "$options": "i" } },
        ];
        if let Some(product_id) = numeric_term(term) {
            alternatives.push(doc! { FIELD_PRODUCT_ID: product_id });
        }
        query.insert("$or", alternatives);
    }

    match filter.visibility {
        Visibility::Any => {}
        Visibility::Visible => {
            query.insert(FIELD_SHOW_IN_APP, doc! { "$ne": false });
        }
        Visibility::Hidden => {
            query.insert(FIELD_SHOW_IN_APP, false);
        }
    }

    query
}

/// Projection for listings: `_id` (implicit) plus the listing fields.
fn list_projection() -> Document {
    LIST_FIELDS
        .iter()
        .map(|field| (field.to_string(), Bson::Int32(1)))
        .collect()
}

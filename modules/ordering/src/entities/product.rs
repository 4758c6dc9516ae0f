use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use rust_decimal::Decimal;
use sqlx::types::Json;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightOption {
    pub weight: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category_id: i32,
    pub images: Vec<String>,
    /// Base price, used when a cart line matches no weight option.
    pub price: Decimal,
    pub weight_options: Json<Vec<WeightOption>>,
    pub is_eggless: bool,
    pub has_egg_option: bool,
    pub stock: i32,
    pub order_count: i32,
    pub is_active: bool,
    pub is_pre_order: bool,
    pub pre_order_available_date: Option<time::Date>,
    pub pre_order_delivery_date: Option<time::Date>,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

const PRODUCT_COLUMNS: &str = "id, name, description, category_id, images, price, \
     weight_options, is_eggless, has_egg_option, stock, order_count, is_active, \
     is_pre_order, pre_order_available_date, pre_order_delivery_date, created_at, updated_at";

#[derive(Debug, Clone, Copy, Default)]
pub struct ListActiveProducts {
    pub category_id: Option<i32>,
    pub limit: Option<i64>,
}

impl Processor<ListActiveProducts> for DatabaseProcessor {
    type Output = Vec<Product>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListActiveProducts", err)]
    async fn process(&self, input: ListActiveProducts) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"SELECT {PRODUCT_COLUMNS} FROM "shop"."product"
               WHERE is_active AND ($1::int4 IS NULL OR category_id = $1)
               ORDER BY name
               LIMIT $2"#
        ))
        .bind(input.category_id)
        .bind(input.limit.unwrap_or(100))
        .fetch_all(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListAllProducts;

impl Processor<ListAllProducts> for DatabaseProcessor {
    type Output = Vec<Product>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListAllProducts", err)]
    async fn process(&self, _input: ListAllProducts) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"SELECT {PRODUCT_COLUMNS} FROM "shop"."product" ORDER BY created_at DESC"#
        ))
        .fetch_all(self.db())
        .await
    }
}

/// Storefront "bestsellers" rail, ranked by lifetime ordered quantity.
#[derive(Debug, Clone, Copy)]
pub struct ListBestsellers {
    pub limit: i64,
}

impl Processor<ListBestsellers> for DatabaseProcessor {
    type Output = Vec<Product>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListBestsellers", err)]
    async fn process(&self, input: ListBestsellers) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"SELECT {PRODUCT_COLUMNS} FROM "shop"."product"
               WHERE is_active AND order_count > 0
               ORDER BY order_count DESC
               LIMIT $1"#
        ))
        .bind(input.limit)
        .fetch_all(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FindProductById {
    pub id: i32,
}

impl Processor<FindProductById> for DatabaseProcessor {
    type Output = Option<Product>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:FindProductById", err)]
    async fn process(&self, input: FindProductById) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"SELECT {PRODUCT_COLUMNS} FROM "shop"."product" WHERE id = $1"#
        ))
        .bind(input.id)
        .fetch_optional(self.db())
        .await
    }
}

#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub category_id: i32,
    pub images: Vec<String>,
    pub price: Decimal,
    pub weight_options: Vec<WeightOption>,
    pub is_eggless: bool,
    pub has_egg_option: bool,
    pub stock: i32,
    pub is_pre_order: bool,
    pub pre_order_available_date: Option<time::Date>,
    pub pre_order_delivery_date: Option<time::Date>,
}

impl Processor<CreateProduct> for DatabaseProcessor {
    type Output = Product;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:CreateProduct", err)]
    async fn process(&self, input: CreateProduct) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"INSERT INTO "shop"."product"
                   (name, description, category_id, images, price, weight_options,
                    is_eggless, has_egg_option, stock, is_pre_order,
                    pre_order_available_date, pre_order_delivery_date)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               RETURNING {PRODUCT_COLUMNS}"#
        ))
        .bind(input.name)
        .bind(input.description)
        .bind(input.category_id)
        .bind(input.images)
        .bind(input.price)
        .bind(Json(input.weight_options))
        .bind(input.is_eggless)
        .bind(input.has_egg_option)
        .bind(input.stock)
        .bind(input.is_pre_order)
        .bind(input.pre_order_available_date)
        .bind(input.pre_order_delivery_date)
        .fetch_one(self.db())
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub images: Option<Vec<String>>,
    pub price: Option<Decimal>,
    pub weight_options: Option<Vec<WeightOption>>,
    pub is_eggless: Option<bool>,
    pub has_egg_option: Option<bool>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
    pub is_pre_order: Option<bool>,
    pub pre_order_available_date: Option<time::Date>,
    pub pre_order_delivery_date: Option<time::Date>,
}

impl Processor<UpdateProduct> for DatabaseProcessor {
    type Output = Option<Product>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:UpdateProduct", err)]
    async fn process(&self, input: UpdateProduct) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"UPDATE "shop"."product"
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   category_id = COALESCE($4, category_id),
                   images = COALESCE($5, images),
                   price = COALESCE($6, price),
                   weight_options = COALESCE($7, weight_options),
                   is_eggless = COALESCE($8, is_eggless),
                   has_egg_option = COALESCE($9, has_egg_option),
                   stock = COALESCE($10, stock),
                   is_active = COALESCE($11, is_active),
                   is_pre_order = COALESCE($12, is_pre_order),
                   pre_order_available_date = COALESCE($13, pre_order_available_date),
                   pre_order_delivery_date = COALESCE($14, pre_order_delivery_date),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {PRODUCT_COLUMNS}"#
        ))
        .bind(input.id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.category_id)
        .bind(input.images)
        .bind(input.price)
        .bind(input.weight_options.map(Json))
        .bind(input.is_eggless)
        .bind(input.has_egg_option)
        .bind(input.stock)
        .bind(input.is_active)
        .bind(input.is_pre_order)
        .bind(input.pre_order_available_date)
        .bind(input.pre_order_delivery_date)
        .fetch_optional(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteProduct {
    pub id: i32,
}

impl Processor<DeleteProduct> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:DeleteProduct", err)]
    async fn process(&self, input: DeleteProduct) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM "shop"."product" WHERE id = $1"#)
            .bind(input.id)
            .execute(self.db())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Bumps the lifetime ordered quantity after checkout.
#[derive(Debug, Clone, Copy)]
pub struct IncrementOrderCount {
    pub id: i32,
    pub by: i32,
}

impl Processor<IncrementOrderCount> for DatabaseProcessor {
    type Output = ();
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:IncrementOrderCount", err)]
    async fn process(&self, input: IncrementOrderCount) -> Result<(), sqlx::Error> {
        sqlx::query(r#"UPDATE "shop"."product" SET order_count = order_count + $2 WHERE id = $1"#)
            .bind(input.id)
            .bind(input.by)
            .execute(self.db())
            .await?;
        Ok(())
    }
}

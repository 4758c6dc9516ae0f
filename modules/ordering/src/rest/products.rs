use crate::entities::product::{
    CreateProduct, DeleteProduct, FindProductById, ListActiveProducts, ListAllProducts,
    ListBestsellers, Product, UpdateProduct, WeightOption,
};
use crate::rest::{MessageResponse, OrderingRest};
use auth::entities::user_account::Role;
use auth::rest::middleware::CurrentUser;
use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use framework::Error;
use kanau::processor::Processor;
use rust_decimal::Decimal;

#[derive(Debug, serde::Deserialize)]
struct ListQuery {
    category: Option<i32>,
    limit: Option<i64>,
}

async fn list_active(
    State(state): State<OrderingRest>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, Error> {
    let products = state
        .db
        .process(ListActiveProducts {
            category_id: query.category,
            limit: query.limit,
        })
        .await?;
    Ok(Json(products))
}

async fn list_all(
    State(state): State<OrderingRest>,
    user: CurrentUser,
) -> Result<Json<Vec<Product>>, Error> {
    user.require(Role::SuperAdmin)?;
    Ok(Json(state.db.process(ListAllProducts).await?))
}

async fn bestsellers(State(state): State<OrderingRest>) -> Result<Json<Vec<Product>>, Error> {
    Ok(Json(state.db.process(ListBestsellers { limit: 10 }).await?))
}

async fn get_one(
    State(state): State<OrderingRest>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, Error> {
    state
        .db
        .process(FindProductById { id })
        .await?
        .map(Json)
        .ok_or(Error::NotFound("Product"))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProductRequest {
    name: String,
    #[serde(default)]
    description: String,
    category_id: i32,
    #[serde(default)]
    images: Vec<String>,
    price: Decimal,
    #[serde(default)]
    weight_options: Vec<WeightOption>,
    #[serde(default)]
    is_eggless: bool,
    #[serde(default = "default_true")]
    has_egg_option: bool,
    #[serde(default)]
    stock: i32,
    #[serde(default)]
    is_pre_order: bool,
    #[serde(default)]
    pre_order_available_date: Option<time::Date>,
    #[serde(default)]
    pre_order_delivery_date: Option<time::Date>,
}

fn default_true() -> bool {
    true
}

async fn create(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Json(body): Json<CreateProductRequest>,
) -> Result<Json<Product>, Error> {
    user.require(Role::SuperAdmin)?;
    if body.name.trim().is_empty() {
        return Err(Error::validation("Product name is required"));
    }
    if body.price < Decimal::ZERO {
        return Err(Error::validation("Price cannot be negative"));
    }
    let product = state
        .db
        .process(CreateProduct {
            name: body.name,
            description: body.description,
            category_id: body.category_id,
            images: body.images,
            price: body.price,
            weight_options: body.weight_options,
            is_eggless: body.is_eggless,
            has_egg_option: body.has_egg_option,
            stock: body.stock,
            is_pre_order: body.is_pre_order,
            pre_order_available_date: body.pre_order_available_date,
            pre_order_delivery_date: body.pre_order_delivery_date,
        })
        .await?;
    Ok(Json(product))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProductRequest {
    name: Option<String>,
    description: Option<String>,
    category_id: Option<i32>,
    images: Option<Vec<String>>,
    price: Option<Decimal>,
    weight_options: Option<Vec<WeightOption>>,
    is_eggless: Option<bool>,
    has_egg_option: Option<bool>,
    stock: Option<i32>,
    is_active: Option<bool>,
    is_pre_order: Option<bool>,
    pre_order_available_date: Option<time::Date>,
    pre_order_delivery_date: Option<time::Date>,
}

async fn update(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>, Error> {
    user.require(Role::SuperAdmin)?;
    state
        .db
        .process(UpdateProduct {
            id,
            name: body.name,
            description: body.description,
            category_id: body.category_id,
            images: body.images,
            price: body.price,
            weight_options: body.weight_options,
            is_eggless: body.is_eggless,
            has_egg_option: body.has_egg_option,
            stock: body.stock,
            is_active: body.is_active,
            is_pre_order: body.is_pre_order,
            pre_order_available_date: body.pre_order_available_date,
            pre_order_delivery_date: body.pre_order_delivery_date,
        })
        .await?
        .map(Json)
        .ok_or(Error::NotFound("Product"))
}

async fn remove(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, Error> {
    user.require(Role::SuperAdmin)?;
    if state.db.process(DeleteProduct { id }).await? {
        Ok(Json(MessageResponse {
            message: "Product deleted",
        }))
    } else {
        Err(Error::NotFound("Product"))
    }
}

pub fn router(state: OrderingRest) -> Router {
    Router::new()
        .route("/", get(list_active).post(create))
        .route("/all", get(list_all))
        .route("/bestsellers", get(bestsellers))
        .route("/{id}", get(get_one).put(update).delete(remove))
        .with_state(state)
}

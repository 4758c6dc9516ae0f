use crate::entities::category::{
    Category, CreateCategory, DeleteCategory, ListActiveCategories, ListAllCategories,
    UpdateCategory,
};
use crate::rest::{MessageResponse, OrderingRest};
use auth::entities::user_account::Role;
use auth::rest::middleware::CurrentUser;
use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use framework::Error;
use kanau::processor::Processor;

async fn list_active(State(state): State<OrderingRest>) -> Result<Json<Vec<Category>>, Error> {
    Ok(Json(state.db.process(ListActiveCategories).await?))
}

async fn list_all(
    State(state): State<OrderingRest>,
    user: CurrentUser,
) -> Result<Json<Vec<Category>>, Error> {
    user.require(Role::SuperAdmin)?;
    Ok(Json(state.db.process(ListAllCategories).await?))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCategoryRequest {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    sort_order: i32,
}

async fn create(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<Json<Category>, Error> {
    user.require(Role::SuperAdmin)?;
    if body.name.trim().is_empty() {
        return Err(Error::validation("Category name is required"));
    }
    let category = state
        .db
        .process(CreateCategory {
            name: body.name,
            description: body.description,
            image: body.image,
            sort_order: body.sort_order,
        })
        .await?;
    Ok(Json(category))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCategoryRequest {
    name: Option<String>,
    description: Option<String>,
    image: Option<String>,
    is_active: Option<bool>,
    sort_order: Option<i32>,
}

async fn update(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, Error> {
    user.require(Role::SuperAdmin)?;
    state
        .db
        .process(UpdateCategory {
            id,
            name: body.name,
            description: body.description,
            image: body.image,
            is_active: body.is_active,
            sort_order: body.sort_order,
        })
        .await?
        .map(Json)
        .ok_or(Error::NotFound("Category"))
}

async fn remove(
    State(state): State<OrderingRest>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, Error> {
    user.require(Role::SuperAdmin)?;
    if state.db.process(DeleteCategory { id }).await? {
        Ok(Json(MessageResponse {
            message: "Category deleted",
        }))
    } else {
        Err(Error::NotFound("Category"))
    }
}

pub fn router(state: OrderingRest) -> Router {
    Router::new()
        .route("/", get(list_active).post(create))
        .route("/all", get(list_all))
        .route("/{id}", put(update).delete(remove))
        .with_state(state)
}

use crate::entities::banner::{
    Banner, CreateBanner, DeleteBanner, ListActiveBanners, ListAllBanners, UpdateBanner,
};
use crate::rest::{AdminRest, MessageResponse};
use auth::entities::user_account::Role;
use auth::rest::middleware::CurrentUser;
use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use framework::Error;
use kanau::processor::Processor;

async fn list_active(State(state): State<AdminRest>) -> Result<Json<Vec<Banner>>, Error> {
    Ok(Json(state.db.process(ListActiveBanners).await?))
}

async fn list_all(
    State(state): State<AdminRest>,
    user: CurrentUser,
) -> Result<Json<Vec<Banner>>, Error> {
    user.require(Role::SuperAdmin)?;
    Ok(Json(state.db.process(ListAllBanners).await?))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBannerRequest {
    title: String,
    #[serde(default)]
    description: String,
    image: String,
    #[serde(default)]
    button_text: String,
    #[serde(default)]
    coupon_code: Option<String>,
    #[serde(default, alias = "order")]
    sort_order: i32,
}

async fn create(
    State(state): State<AdminRest>,
    user: CurrentUser,
    Json(body): Json<CreateBannerRequest>,
) -> Result<Json<Banner>, Error> {
    user.require(Role::SuperAdmin)?;
    if body.title.trim().is_empty() || body.image.trim().is_empty() {
        return Err(Error::validation("Banner title and image are required"));
    }
    let banner = state
        .db
        .process(CreateBanner {
            title: body.title,
            description: body.description,
            image: body.image,
            button_text: body.button_text,
            coupon_code: body.coupon_code,
            sort_order: body.sort_order,
        })
        .await?;
    Ok(Json(banner))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBannerRequest {
    title: Option<String>,
    description: Option<String>,
    image: Option<String>,
    button_text: Option<String>,
    coupon_code: Option<String>,
    #[serde(default, alias = "order")]
    sort_order: Option<i32>,
    is_active: Option<bool>,
}

async fn update(
    State(state): State<AdminRest>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateBannerRequest>,
) -> Result<Json<Banner>, Error> {
    user.require(Role::SuperAdmin)?;
    state
        .db
        .process(UpdateBanner {
            id,
            title: body.title,
            description: body.description,
            image: body.image,
            button_text: body.button_text,
            coupon_code: body.coupon_code,
            sort_order: body.sort_order,
            is_active: body.is_active,
        })
        .await?
        .map(Json)
        .ok_or(Error::NotFound("Banner"))
}

async fn remove(
    State(state): State<AdminRest>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, Error> {
    user.require(Role::SuperAdmin)?;
    if state.db.process(DeleteBanner { id }).await? {
        Ok(Json(MessageResponse {
            message: "Banner deleted",
        }))
    } else {
        Err(Error::NotFound("Banner"))
    }
}

pub fn router(state: AdminRest) -> Router {
    Router::new()
        .route("/", get(list_active).post(create))
        .route("/all", get(list_all))
        .route("/{id}", put(update).delete(remove))
        .with_state(state)
}

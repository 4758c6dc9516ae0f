use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use tracing::instrument;

/// Storefront hero banner, optionally carrying a coupon code to surface.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image: String,
    pub button_text: String,
    pub coupon_code: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

const BANNER_COLUMNS: &str = "id, title, description, image, button_text, coupon_code, \
     sort_order, is_active, created_at, updated_at";

#[derive(Debug, Clone, Copy)]
pub struct ListActiveBanners;

impl Processor<ListActiveBanners> for DatabaseProcessor {
    type Output = Vec<Banner>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListActiveBanners", err)]
    async fn process(&self, _input: ListActiveBanners) -> Result<Vec<Banner>, sqlx::Error> {
        sqlx::query_as::<_, Banner>(&format!(
            r#"SELECT {BANNER_COLUMNS} FROM "shop"."banner"
               WHERE is_active ORDER BY sort_order, id"#
        ))
        .fetch_all(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListAllBanners;

impl Processor<ListAllBanners> for DatabaseProcessor {
    type Output = Vec<Banner>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListAllBanners", err)]
    async fn process(&self, _input: ListAllBanners) -> Result<Vec<Banner>, sqlx::Error> {
        sqlx::query_as::<_, Banner>(&format!(
            r#"SELECT {BANNER_COLUMNS} FROM "shop"."banner" ORDER BY sort_order, id"#
        ))
        .fetch_all(self.db())
        .await
    }
}

#[derive(Debug, Clone)]
pub struct CreateBanner {
    pub title: String,
    pub description: String,
    pub image: String,
    pub button_text: String,
    pub coupon_code: Option<String>,
    pub sort_order: i32,
}

impl Processor<CreateBanner> for DatabaseProcessor {
    type Output = Banner;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:CreateBanner", err)]
    async fn process(&self, input: CreateBanner) -> Result<Banner, sqlx::Error> {
        sqlx::query_as::<_, Banner>(&format!(
            r#"INSERT INTO "shop"."banner"
                   (title, description, image, button_text, coupon_code, sort_order)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {BANNER_COLUMNS}"#
        ))
        .bind(input.title)
        .bind(input.description)
        .bind(input.image)
        .bind(input.button_text)
        .bind(input.coupon_code)
        .bind(input.sort_order)
        .fetch_one(self.db())
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdateBanner {
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub button_text: Option<String>,
    pub coupon_code: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl Processor<UpdateBanner> for DatabaseProcessor {
    type Output = Option<Banner>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:UpdateBanner", err)]
    async fn process(&self, input: UpdateBanner) -> Result<Option<Banner>, sqlx::Error> {
        sqlx::query_as::<_, Banner>(&format!(
            r#"UPDATE "shop"."banner"
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   image = COALESCE($4, image),
                   button_text = COALESCE($5, button_text),
                   coupon_code = COALESCE($6, coupon_code),
                   sort_order = COALESCE($7, sort_order),
                   is_active = COALESCE($8, is_active),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {BANNER_COLUMNS}"#
        ))
        .bind(input.id)
        .bind(input.title)
        .bind(input.description)
        .bind(input.image)
        .bind(input.button_text)
        .bind(input.coupon_code)
        .bind(input.sort_order)
        .bind(input.is_active)
        .fetch_optional(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteBanner {
    pub id: i32,
}

impl Processor<DeleteBanner> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:DeleteBanner", err)]
    async fn process(&self, input: DeleteBanner) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM "shop"."banner" WHERE id = $1"#)
            .bind(input.id)
            .execute(self.db())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

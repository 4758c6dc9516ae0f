use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

const CATEGORY_COLUMNS: &str =
    "id, name, description, image, is_active, sort_order, created_at, updated_at";

#[derive(Debug, Clone, Copy)]
pub struct ListActiveCategories;

impl Processor<ListActiveCategories> for DatabaseProcessor {
    type Output = Vec<Category>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListActiveCategories", err)]
    async fn process(&self, _input: ListActiveCategories) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(&format!(
            r#"SELECT {CATEGORY_COLUMNS} FROM "shop"."category"
               WHERE is_active ORDER BY sort_order, name"#
        ))
        .fetch_all(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListAllCategories;

impl Processor<ListAllCategories> for DatabaseProcessor {
    type Output = Vec<Category>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListAllCategories", err)]
    async fn process(&self, _input: ListAllCategories) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(&format!(
            r#"SELECT {CATEGORY_COLUMNS} FROM "shop"."category" ORDER BY sort_order, name"#
        ))
        .fetch_all(self.db())
        .await
    }
}

#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub sort_order: i32,
}

impl Processor<CreateCategory> for DatabaseProcessor {
    type Output = Category;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:CreateCategory", err)]
    async fn process(&self, input: CreateCategory) -> Result<Category, sqlx::Error> {
        sqlx::query_as::<_, Category>(&format!(
            r#"INSERT INTO "shop"."category" (name, description, image, sort_order)
               VALUES ($1, $2, $3, $4)
               RETURNING {CATEGORY_COLUMNS}"#
        ))
        .bind(input.name)
        .bind(input.description)
        .bind(input.image)
        .bind(input.sort_order)
        .fetch_one(self.db())
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdateCategory {
    pub id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

impl Processor<UpdateCategory> for DatabaseProcessor {
    type Output = Option<Category>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:UpdateCategory", err)]
    async fn process(&self, input: UpdateCategory) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(&format!(
            r#"UPDATE "shop"."category"
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   image = COALESCE($4, image),
                   is_active = COALESCE($5, is_active),
                   sort_order = COALESCE($6, sort_order),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {CATEGORY_COLUMNS}"#
        ))
        .bind(input.id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.image)
        .bind(input.is_active)
        .bind(input.sort_order)
        .fetch_optional(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteCategory {
    pub id: i32,
}

impl Processor<DeleteCategory> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:DeleteCategory", err)]
    async fn process(&self, input: DeleteCategory) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM "shop"."category" WHERE id = $1"#)
            .bind(input.id)
            .execute(self.db())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

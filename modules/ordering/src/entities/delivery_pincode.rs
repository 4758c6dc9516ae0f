use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPincode {
    pub id: i32,
    pub pincode: String,
    pub area: String,
    pub is_active: bool,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

const PINCODE_COLUMNS: &str = "id, pincode, area, is_active, created_at, updated_at";

/// Serviceability gate used by checkout and the storefront pincode check.
#[derive(Debug, Clone)]
pub struct FindActivePincode {
    pub pincode: String,
}

impl Processor<FindActivePincode> for DatabaseProcessor {
    type Output = Option<DeliveryPincode>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:FindActivePincode", err)]
    async fn process(
        &self,
        input: FindActivePincode,
    ) -> Result<Option<DeliveryPincode>, sqlx::Error> {
        sqlx::query_as::<_, DeliveryPincode>(&format!(
            r#"SELECT {PINCODE_COLUMNS} FROM "shop"."delivery_pincode"
               WHERE pincode = $1 AND is_active"#
        ))
        .bind(input.pincode.trim().to_owned())
        .fetch_optional(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListPincodes;

impl Processor<ListPincodes> for DatabaseProcessor {
    type Output = Vec<DeliveryPincode>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListPincodes", err)]
    async fn process(&self, _input: ListPincodes) -> Result<Vec<DeliveryPincode>, sqlx::Error> {
        sqlx::query_as::<_, DeliveryPincode>(&format!(
            r#"SELECT {PINCODE_COLUMNS} FROM "shop"."delivery_pincode" ORDER BY pincode"#
        ))
        .fetch_all(self.db())
        .await
    }
}

#[derive(Debug, Clone)]
pub struct CreatePincode {
    pub pincode: String,
    pub area: String,
}

impl Processor<CreatePincode> for DatabaseProcessor {
    type Output = DeliveryPincode;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:CreatePincode", err)]
    async fn process(&self, input: CreatePincode) -> Result<DeliveryPincode, sqlx::Error> {
        sqlx::query_as::<_, DeliveryPincode>(&format!(
            r#"INSERT INTO "shop"."delivery_pincode" (pincode, area)
               VALUES ($1, $2)
               RETURNING {PINCODE_COLUMNS}"#
        ))
        .bind(input.pincode.trim().to_owned())
        .bind(input.area)
        .fetch_one(self.db())
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePincode {
    pub id: i32,
    pub area: Option<String>,
    pub is_active: Option<bool>,
}

impl Processor<UpdatePincode> for DatabaseProcessor {
    type Output = Option<DeliveryPincode>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:UpdatePincode", err)]
    async fn process(&self, input: UpdatePincode) -> Result<Option<DeliveryPincode>, sqlx::Error> {
        sqlx::query_as::<_, DeliveryPincode>(&format!(
            r#"UPDATE "shop"."delivery_pincode"
               SET area = COALESCE($2, area),
                   is_active = COALESCE($3, is_active),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {PINCODE_COLUMNS}"#
        ))
        .bind(input.id)
        .bind(input.area)
        .bind(input.is_active)
        .fetch_optional(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeletePincode {
    pub id: i32,
}

impl Processor<DeletePincode> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:DeletePincode", err)]
    async fn process(&self, input: DeletePincode) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM "shop"."delivery_pincode" WHERE id = $1"#)
            .bind(input.id)
            .execute(self.db())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

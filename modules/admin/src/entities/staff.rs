use auth::entities::user_account::UserAccount;
use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use tracing::instrument;
use uuid::Uuid;

const STAFF_COLUMNS: &str = "id, email, name, mobile_number, role, is_active, \
     vehicle_type, vehicle_number, created_at, updated_at";

#[derive(Debug, Clone, Copy)]
pub struct ListDeliveryStaff;

impl Processor<ListDeliveryStaff> for DatabaseProcessor {
    type Output = Vec<UserAccount>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListDeliveryStaff", err)]
    async fn process(&self, _input: ListDeliveryStaff) -> Result<Vec<UserAccount>, sqlx::Error> {
        sqlx::query_as::<_, UserAccount>(&format!(
            r#"SELECT {STAFF_COLUMNS} FROM "auth"."user_account"
               WHERE role = 'delivery_boy' ORDER BY created_at DESC"#
        ))
        .fetch_all(self.db())
        .await
    }
}

/// Staff accounts are created by the back office, not by OTP signup.
#[derive(Debug, Clone)]
pub struct CreateDeliveryStaff {
    pub email: String,
    pub name: String,
    pub mobile_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_number: Option<String>,
}

impl Processor<CreateDeliveryStaff> for DatabaseProcessor {
    type Output = UserAccount;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:CreateDeliveryStaff", err)]
    async fn process(&self, input: CreateDeliveryStaff) -> Result<UserAccount, sqlx::Error> {
        sqlx::query_as::<_, UserAccount>(&format!(
            r#"INSERT INTO "auth"."user_account"
                   (email, name, mobile_number, role, vehicle_type, vehicle_number)
               VALUES ($1, $2, $3, 'delivery_boy', $4, $5)
               RETURNING {STAFF_COLUMNS}"#
        ))
        .bind(input.email)
        .bind(input.name)
        .bind(input.mobile_number)
        .bind(input.vehicle_type)
        .bind(input.vehicle_number)
        .fetch_one(self.db())
        .await
    }
}

/// Scoped to delivery staff so an admin cannot flip other roles through this
/// endpoint.
#[derive(Debug, Clone)]
pub struct UpdateDeliveryStaff {
    pub id: Uuid,
    pub name: Option<String>,
    pub mobile_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_number: Option<String>,
    pub is_active: Option<bool>,
}

impl Processor<UpdateDeliveryStaff> for DatabaseProcessor {
    type Output = Option<UserAccount>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:UpdateDeliveryStaff", err)]
    async fn process(&self, input: UpdateDeliveryStaff) -> Result<Option<UserAccount>, sqlx::Error> {
        sqlx::query_as::<_, UserAccount>(&format!(
            r#"UPDATE "auth"."user_account"
               SET name = COALESCE($2, name),
                   mobile_number = COALESCE($3, mobile_number),
                   vehicle_type = COALESCE($4, vehicle_type),
                   vehicle_number = COALESCE($5, vehicle_number),
                   is_active = COALESCE($6, is_active),
                   updated_at = NOW()
               WHERE id = $1 AND role = 'delivery_boy'
               RETURNING {STAFF_COLUMNS}"#
        ))
        .bind(input.id)
        .bind(input.name)
        .bind(input.mobile_number)
        .bind(input.vehicle_type)
        .bind(input.vehicle_number)
        .bind(input.is_active)
        .fetch_optional(self.db())
        .await
    }
}

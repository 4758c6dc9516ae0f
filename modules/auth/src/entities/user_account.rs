use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use tracing::instrument;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize,
)]
#[sqlx(type_name = "auth.user_role", rename_all = "snake_case")]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Customer,
    DeliveryBoy,
    SuperAdmin,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub mobile_number: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub vehicle_type: Option<String>,
    pub vehicle_number: Option<String>,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

const USER_COLUMNS: &str = "id, email, name, mobile_number, role, is_active, \
     vehicle_type, vehicle_number, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct FindUserAccountByEmail {
    pub email: String,
}

impl Processor<FindUserAccountByEmail> for DatabaseProcessor {
    type Output = Option<UserAccount>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:FindUserAccountByEmail", err)]
    async fn process(
        &self,
        input: FindUserAccountByEmail,
    ) -> Result<Option<UserAccount>, sqlx::Error> {
        sqlx::query_as::<_, UserAccount>(&format!(
            r#"SELECT {USER_COLUMNS} FROM "auth"."user_account" WHERE email = $1"#
        ))
        .bind(input.email)
        .fetch_optional(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FindUserAccountById {
    pub id: Uuid,
}

impl Processor<FindUserAccountById> for DatabaseProcessor {
    type Output = Option<UserAccount>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:FindUserAccountById", err)]
    async fn process(
        &self,
        input: FindUserAccountById,
    ) -> Result<Option<UserAccount>, sqlx::Error> {
        sqlx::query_as::<_, UserAccount>(&format!(
            r#"SELECT {USER_COLUMNS} FROM "auth"."user_account" WHERE id = $1"#
        ))
        .bind(input.id)
        .fetch_optional(self.db())
        .await
    }
}

/// Batch lookup for attaching user summaries to order lists.
#[derive(Debug, Clone)]
pub struct FindUserAccountsByIds {
    pub ids: Vec<Uuid>,
}

impl Processor<FindUserAccountsByIds> for DatabaseProcessor {
    type Output = Vec<UserAccount>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:FindUserAccountsByIds", err)]
    async fn process(&self, input: FindUserAccountsByIds) -> Result<Vec<UserAccount>, sqlx::Error> {
        sqlx::query_as::<_, UserAccount>(&format!(
            r#"SELECT {USER_COLUMNS} FROM "auth"."user_account" WHERE id = ANY($1)"#
        ))
        .bind(input.ids)
        .fetch_all(self.db())
        .await
    }
}

/// Recipients for back-office notification mail.
#[derive(Debug, Clone, Copy)]
pub struct ListActiveAdmins;

impl Processor<ListActiveAdmins> for DatabaseProcessor {
    type Output = Vec<UserAccount>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListActiveAdmins", err)]
    async fn process(&self, _input: ListActiveAdmins) -> Result<Vec<UserAccount>, sqlx::Error> {
        sqlx::query_as::<_, UserAccount>(&format!(
            r#"SELECT {USER_COLUMNS} FROM "auth"."user_account"
               WHERE role = 'super_admin' AND is_active"#
        ))
        .fetch_all(self.db())
        .await
    }
}

/// First OTP login for an unknown email registers a customer account.
#[derive(Debug, Clone)]
pub struct CreateCustomerAccount {
    pub email: String,
}

impl Processor<CreateCustomerAccount> for DatabaseProcessor {
    type Output = UserAccount;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:CreateCustomerAccount", err)]
    async fn process(&self, input: CreateCustomerAccount) -> Result<UserAccount, sqlx::Error> {
        sqlx::query_as::<_, UserAccount>(&format!(
            r#"INSERT INTO "auth"."user_account" (email, role)
               VALUES ($1, 'customer')
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(input.email)
        .fetch_one(self.db())
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdateUserProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub mobile_number: Option<String>,
}

impl Processor<UpdateUserProfile> for DatabaseProcessor {
    type Output = UserAccount;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:UpdateUserProfile", err)]
    async fn process(&self, input: UpdateUserProfile) -> Result<UserAccount, sqlx::Error> {
        sqlx::query_as::<_, UserAccount>(&format!(
            r#"UPDATE "auth"."user_account"
               SET name = COALESCE($2, name),
                   mobile_number = COALESCE($3, mobile_number),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(input.id)
        .bind(input.name)
        .bind(input.mobile_number)
        .fetch_one(self.db())
        .await
    }
}

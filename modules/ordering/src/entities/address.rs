use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use tracing::instrument;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize,
)]
#[sqlx(type_name = "shop.address_type", rename_all = "snake_case")]
#[serde(rename_all = "camelCase")]
pub enum AddressType {
    Home,
    Work,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub mobile_number: String,
    pub house_no: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub address_type: AddressType,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

const ADDRESS_COLUMNS: &str = "id, user_id, full_name, mobile_number, house_no, street, \
     city, state, pincode, address_type, created_at, updated_at";

#[derive(Debug, Clone, Copy)]
pub struct ListAddressesByUser {
    pub user_id: Uuid,
}

impl Processor<ListAddressesByUser> for DatabaseProcessor {
    type Output = Vec<Address>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:ListAddressesByUser", err)]
    async fn process(&self, input: ListAddressesByUser) -> Result<Vec<Address>, sqlx::Error> {
        sqlx::query_as::<_, Address>(&format!(
            r#"SELECT {ADDRESS_COLUMNS} FROM "shop"."address"
               WHERE user_id = $1 ORDER BY created_at DESC"#
        ))
        .bind(input.user_id)
        .fetch_all(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FindAddressById {
    pub id: Uuid,
}

impl Processor<FindAddressById> for DatabaseProcessor {
    type Output = Option<Address>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:FindAddressById", err)]
    async fn process(&self, input: FindAddressById) -> Result<Option<Address>, sqlx::Error> {
        sqlx::query_as::<_, Address>(&format!(
            r#"SELECT {ADDRESS_COLUMNS} FROM "shop"."address" WHERE id = $1"#
        ))
        .bind(input.id)
        .fetch_optional(self.db())
        .await
    }
}

/// Batch lookup for attaching addresses to order lists.
#[derive(Debug, Clone)]
pub struct FindAddressesByIds {
    pub ids: Vec<Uuid>,
}

impl Processor<FindAddressesByIds> for DatabaseProcessor {
    type Output = Vec<Address>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:FindAddressesByIds", err)]
    async fn process(&self, input: FindAddressesByIds) -> Result<Vec<Address>, sqlx::Error> {
        sqlx::query_as::<_, Address>(&format!(
            r#"SELECT {ADDRESS_COLUMNS} FROM "shop"."address" WHERE id = ANY($1)"#
        ))
        .bind(input.ids)
        .fetch_all(self.db())
        .await
    }
}

#[derive(Debug, Clone)]
pub struct CreateAddress {
    pub user_id: Uuid,
    pub full_name: String,
    pub mobile_number: String,
    pub house_no: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub address_type: AddressType,
}

impl Processor<CreateAddress> for DatabaseProcessor {
    type Output = Address;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:CreateAddress", err)]
    async fn process(&self, input: CreateAddress) -> Result<Address, sqlx::Error> {
        sqlx::query_as::<_, Address>(&format!(
            r#"INSERT INTO "shop"."address"
                   (user_id, full_name, mobile_number, house_no, street, city,
                    state, pincode, address_type)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {ADDRESS_COLUMNS}"#
        ))
        .bind(input.user_id)
        .bind(input.full_name)
        .bind(input.mobile_number)
        .bind(input.house_no)
        .bind(input.street)
        .bind(input.city)
        .bind(input.state)
        .bind(input.pincode)
        .bind(input.address_type)
        .fetch_one(self.db())
        .await
    }
}

/// Scoped to the owner; a stranger updating someone else's address simply
/// matches no row.
#[derive(Debug, Clone)]
pub struct UpdateAddress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub mobile_number: Option<String>,
    pub house_no: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub address_type: Option<AddressType>,
}

impl Processor<UpdateAddress> for DatabaseProcessor {
    type Output = Option<Address>;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:UpdateAddress", err)]
    async fn process(&self, input: UpdateAddress) -> Result<Option<Address>, sqlx::Error> {
        sqlx::query_as::<_, Address>(&format!(
            r#"UPDATE "shop"."address"
               SET full_name = COALESCE($3, full_name),
                   mobile_number = COALESCE($4, mobile_number),
                   house_no = COALESCE($5, house_no),
                   street = COALESCE($6, street),
                   city = COALESCE($7, city),
                   state = COALESCE($8, state),
                   pincode = COALESCE($9, pincode),
                   address_type = COALESCE($10, address_type),
                   updated_at = NOW()
               WHERE id = $1 AND user_id = $2
               RETURNING {ADDRESS_COLUMNS}"#
        ))
        .bind(input.id)
        .bind(input.user_id)
        .bind(input.full_name)
        .bind(input.mobile_number)
        .bind(input.house_no)
        .bind(input.street)
        .bind(input.city)
        .bind(input.state)
        .bind(input.pincode)
        .bind(input.address_type)
        .fetch_optional(self.db())
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteAddress {
    pub id: Uuid,
    pub user_id: Uuid,
}

impl Processor<DeleteAddress> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[instrument(skip_all, name = "SQL:DeleteAddress", err)]
    async fn process(&self, input: DeleteAddress) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM "shop"."address" WHERE id = $1 AND user_id = $2"#)
            .bind(input.id)
            .bind(input.user_id)
            .execute(self.db())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

use crate::config::Config;
use admin::rest::AdminRest;
use admin::services::media::{MediaClient, MediaConfig};
use auth::config::AuthConfig;
use auth::entities::otp_store::OtpStore;
use auth::rest::middleware::AuthLayer;
use auth::services::email_login::EmailLoginService;
use auth::utils::jwt::JwtSigner;
use framework::mailer::Mailer;
use framework::sqlx::DatabaseProcessor;
use ordering::config::OrderingConfig;
use ordering::rest::OrderingRest;
use ordering::services::assignment::AssignmentService;
use ordering::services::checkout::CheckoutService;
use ordering::services::gateway::{GatewayConfig, PaymentGatewayService};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

/// Everything the routers need, built once at startup.
pub struct Services {
    pub auth_layer: AuthLayer,
    pub login: EmailLoginService,
    pub ordering: OrderingRest,
    pub admin: AdminRest,
}

impl Services {
    pub async fn build(config: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        let db = DatabaseProcessor::from_pool(pool);

        let mailer = Mailer::new(&config.mailer)?;
        let auth_config = Arc::new(AuthConfig::default());
        let jwt = Arc::new(JwtSigner::new(
            config.access_token_secret.as_bytes(),
            config.refresh_token_secret.as_bytes(),
            auth_config.token.clone(),
        ));

        let login = EmailLoginService {
            db: db.clone(),
            otp_store: OtpStore::new(),
            mailer: mailer.clone(),
            jwt: jwt.clone(),
            config: auth_config,
        };

        let ordering_config = Arc::new(OrderingConfig {
            delivery_charge: config.delivery_charge,
            commission_percentage: config.commission_percentage,
        });
        let http_client = reqwest::Client::new();
        let ordering = OrderingRest {
            db: db.clone(),
            checkout: CheckoutService {
                db: db.clone(),
                mailer,
                config: ordering_config,
            },
            assignment: AssignmentService { db: db.clone() },
            gateway: PaymentGatewayService {
                client: http_client.clone(),
                config: Arc::new(GatewayConfig {
                    base_url: config.gateway_base_url.clone(),
                    key_id: config.gateway_key_id.clone(),
                    key_secret: config.gateway_key_secret.clone(),
                    currency: config.gateway_currency.clone(),
                }),
            },
        };

        let admin = AdminRest {
            db: db.clone(),
            media: MediaClient {
                client: http_client,
                config: Arc::new(MediaConfig {
                    upload_url: config.media_upload_url.clone(),
                    upload_preset: config.media_upload_preset.clone(),
                }),
            },
        };

        Ok(Self {
            auth_layer: AuthLayer::new(db, jwt),
            login,
            ordering,
            admin,
        })
    }
}

use crate::entities::user_account::{FindUserAccountById, Role, UserAccount};
use crate::utils::jwt::JwtSigner;
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use framework::Error;
use framework::sqlx::DatabaseProcessor;
use kanau::processor::Processor;
use std::pin::Pin;
use std::sync::Arc;

/// The authenticated caller, attached to request extensions by [`AuthLayer`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserAccount);

impl CurrentUser {
    pub fn id(&self) -> uuid::Uuid {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    /// Per-route role gate. Roles are checked exactly, there is no implied
    /// hierarchy between them.
    pub fn require(&self, role: Role) -> Result<(), Error> {
        if self.0.role == role {
            Ok(())
        } else {
            Err(Error::Forbidden("Access denied"))
        }
    }
}

impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(Error::Unauthorized("Authentication required"))
    }
}

#[derive(Clone)]
pub struct AuthLayer {
    db: DatabaseProcessor,
    jwt: Arc<JwtSigner>,
}

impl AuthLayer {
    pub fn new(db: DatabaseProcessor, jwt: Arc<JwtSigner>) -> Self {
        Self { db, jwt }
    }
}

impl<S> tower::Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;
    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            db: self.db.clone(),
            jwt: self.jwt.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    db: DatabaseProcessor,
    jwt: Arc<JwtSigner>,
}

impl<S, ReqBody> tower::Service<axum::http::Request<ReqBody>> for AuthMiddleware<S>
where
    S: tower::Service<axum::http::Request<ReqBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future =
        Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<ReqBody>) -> Self::Future {
        let db = self.db.clone();
        let jwt = self.jwt.clone();
        let inner_clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, inner_clone);
        Box::pin(async move {
            // Unauthenticated requests pass through without the extension;
            // protected handlers reject via the CurrentUser extractor.
            if let Ok(user) = bearer_auth(req.headers(), &db, &jwt).await {
                req.extensions_mut().insert(CurrentUser(user));
            }
            inner.call(req).await
        })
    }
}

async fn bearer_auth(
    headers: &HeaderMap,
    db: &DatabaseProcessor,
    jwt: &JwtSigner,
) -> Result<UserAccount, Error> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(Error::Unauthorized("Authentication required"))?;
    let claims = jwt.verify_access(token)?;
    let user = db
        .process(FindUserAccountById { id: claims.sub })
        .await?
        .ok_or(Error::Unauthorized("Invalid token"))?;
    if !user.is_active {
        return Err(Error::Unauthorized("Account is inactive"));
    }
    Ok(user)
}

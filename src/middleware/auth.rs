use crate::core::AppError;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

/// Paths served without an API key
const PUBLIC_PATHS: [&str; 3] = ["/", "/health", "/ready"];

/// API key authentication middleware
///
/// Every request outside `PUBLIC_PATHS` must carry an `X-API-Key` header
/// matching the configured Argon2 hash.
#[derive(Clone)]
pub struct ApiKeyAuth {
    key_hash: Arc<str>,
}

impl ApiKeyAuth {
    pub fn new(key_hash: impl Into<Arc<str>>) -> Self {
        Self {
            key_hash: key_hash.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware {
            service: Rc::new(service),
            key_hash: self.key_hash.clone(),
        }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: Rc<S>,
    key_hash: Arc<str>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let key_hash = self.key_hash.clone();

        Box::pin(async move {
            if PUBLIC_PATHS.contains(&req.path()) {
                return svc.call(req).await;
            }

            let api_key = req
                .headers()
                .get("X-API-Key")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| Error::from(AppError::unauthorized("Missing X-API-Key header")))?;

            if !verify_api_key(api_key, &key_hash).map_err(Error::from)? {
                tracing::warn!(path = %req.path(), "Rejected request with invalid API key");
                return Err(Error::from(AppError::unauthorized("Invalid API key")));
            }

            svc.call(req).await
        })
    }
}

/// Hash an API key with Argon2, for the `API_KEY_HASH` setting
pub fn hash_api_key(api_key: &str) -> crate::core::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(api_key.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash API key: {}", e)))
}

/// Check an API key against an Argon2 hash
pub fn verify_api_key(api_key: &str, hash: &str) -> crate::core::Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Configuration(format!("Invalid API key hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(api_key.as_bytes(), &parsed_hash)
        .is_ok())
}

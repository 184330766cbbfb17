use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{errors::AuthError, AppState};

pub const ADMIN_PREFIX: &str = "/api/v1/admin";

/// Guards the admin API. Requests outside it pass straight through; admin
/// requests need a valid bearer token whose email is on the admin list.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if !requires_admin(req.path(), req.method().as_str()) {
                return service.call(req).await;
            }

            match admin_claims(&req) {
                Ok(claims) => {
                    tracing::debug!(sub = %claims.sub, "Admin request authorized");
                    req.extensions_mut().insert(claims);
                    service.call(req).await
                }
                Err(err) => {
                    tracing::warn!(path = %req.path(), error = %err, "Admin request rejected");
                    Ok(req.into_response(err.error_response()))
                }
            }
        })
    }
}

fn requires_admin(path: &str, method: &str) -> bool {
    if method == "OPTIONS" {
        return false;
    }
    path == ADMIN_PREFIX || path.starts_with(&format!("{}/", ADMIN_PREFIX))
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

fn admin_claims(req: &ServiceRequest) -> Result<crate::entities::token::Claims, AuthError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState missing in middleware");
        AuthError::MissingJwtService
    })?;

    let token = extract_token(req).ok_or(AuthError::MissingCredentials)?;
    state.jwt_service.authorize_admin(&token)
}

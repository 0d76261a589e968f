//! Token validation for the data plane's validation endpoint.
//!
//! Tokens are HS256 JWTs. After the signature and expiry are verified, every
//! registered [`ValidationRule`] runs against the claims.
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::store::ContractNegotiationStore;
use dsc_spi::types::DataAddress;
use dsc_spi::validation::{Claims, ValidationRule};
use dsc_web::ApiResult;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub const TOKEN_SECRET_SETTING: &str = "edc.dataplane.token.secret";
pub const CONTRACT_ID_CLAIM: &str = "cid";
pub const DATA_ADDRESS_CLAIM: &str = "dad";

pub struct TokenValidationService {
    key: DecodingKey,
    validation: Validation,
    rules: Vec<Arc<dyn ValidationRule>>,
}

impl TokenValidationService {
    pub fn new(secret: &SecretString, rules: Vec<Arc<dyn ValidationRule>>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        Self {
            key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
            rules,
        }
    }

    /// Verifies the token and returns its claims.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    ConnectorError::new(ErrorCode::TokenExpired, "Token has expired")
                }
                _ => ConnectorError::new(ErrorCode::InvalidToken, format!("Invalid token: {}", e)),
            })?
            .claims;

        for rule in &self.rules {
            rule.check_rule(&claims)?;
        }
        Ok(claims)
    }
}

#[derive(Error, Debug)]
pub enum ContractClaimError {
    #[error("Missing contract id claim `cid`")]
    MissingContractId,
    #[error("Failed to parse claims")]
    MalformedClaims,
    #[error("No contract agreement found for id: {0}")]
    AgreementNotFound(String),
    #[error("Contract has expired")]
    ContractExpired,
}

impl From<ContractClaimError> for ConnectorError {
    fn from(err: ContractClaimError) -> Self {
        ConnectorError::new(ErrorCode::AuthorizationFailed, err.to_string())
    }
}

/// Requires a `cid` claim naming an unexpired contract agreement.
pub struct ContractValidationRule {
    store: Arc<dyn ContractNegotiationStore>,
}

impl ContractValidationRule {
    pub fn new(store: Arc<dyn ContractNegotiationStore>) -> Self {
        Self { store }
    }
}

impl ValidationRule for ContractValidationRule {
    fn check_rule(&self, claims: &Claims) -> Result<()> {
        let contract_id = match claims.get(CONTRACT_ID_CLAIM) {
            None | Some(Value::Null) => return Err(ContractClaimError::MissingContractId.into()),
            Some(Value::String(id)) => id,
            Some(_) => return Err(ContractClaimError::MalformedClaims.into()),
        };

        let agreement = self
            .store
            .find_contract_agreement(contract_id)
            .ok_or_else(|| ContractClaimError::AgreementNotFound(contract_id.clone()))?;

        if agreement.is_expired_at(chrono::Utc::now().timestamp()) {
            return Err(ContractClaimError::ContractExpired.into());
        }
        Ok(())
    }
}

/// `GET /validation`: answers with the data address carried by a valid token.
pub fn create_validation_router(service: Arc<TokenValidationService>) -> Router {
    Router::new()
        .route("/validation", get(validate_token))
        .with_state(service)
}

async fn validate_token(
    State(service): State<Arc<TokenValidationService>>,
    headers: HeaderMap,
) -> ApiResult<Json<DataAddress>> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            ConnectorError::new(ErrorCode::AuthorizationFailed, "Missing Authorization header")
        })?;

    let claims = service.validate(token).inspect_err(|e| {
        debug!(error = %e, "Token validation failed");
    })?;
    Ok(Json(data_address(&claims)?))
}

fn data_address(claims: &Claims) -> Result<DataAddress> {
    let invalid = || {
        ConnectorError::new(
            ErrorCode::AuthorizationFailed,
            "Missing or invalid data address claim `dad`",
        )
    };
    match claims.get(DATA_ADDRESS_CLAIM) {
        Some(Value::String(raw)) => serde_json::from_str(raw).map_err(|_| invalid()),
        Some(value @ Value::Object(_)) => {
            serde_json::from_value(value.clone()).map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use dsc_spi::types::ContractAgreement;
    use dsc_stores::InMemoryContractNegotiationStore;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use tower::ServiceExt;

    const SECRET: &str = "a-test-secret-that-is-long-enough";

    fn agreement(id: &str, end: i64) -> ContractAgreement {
        ContractAgreement {
            id: id.to_string(),
            provider_agent_id: "provider".into(),
            consumer_agent_id: "consumer".into(),
            contract_signing_date: 0,
            contract_start_date: 0,
            contract_end_date: end,
            asset_id: "asset-1".into(),
            policy_id: "policy-1".into(),
        }
    }

    fn service() -> TokenValidationService {
        let store = Arc::new(InMemoryContractNegotiationStore::new());
        let now = chrono::Utc::now().timestamp();
        store.save_agreement(agreement("valid", now + 3600)).unwrap();
        store.save_agreement(agreement("expired", now - 3600)).unwrap();
        TokenValidationService::new(
            &SecretString::from(SECRET.to_string()),
            vec![Arc::new(ContractValidationRule::new(store)) as Arc<dyn ValidationRule>],
        )
    }

    fn token(claims: Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn exp() -> i64 {
        chrono::Utc::now().timestamp() + 600
    }

    #[test]
    fn test_valid_token() {
        let claims = service()
            .validate(&token(json!({"cid": "valid", "exp": exp()})))
            .unwrap();
        assert_eq!(claims["cid"], "valid");
    }

    #[test]
    fn test_rule_failures() {
        let service = service();
        let err = service
            .validate(&token(json!({"exp": exp()})))
            .unwrap_err();
        assert_eq!(err.message, "Missing contract id claim `cid`");

        let err = service
            .validate(&token(json!({"cid": "unknown", "exp": exp()})))
            .unwrap_err();
        assert_eq!(err.message, "No contract agreement found for id: unknown");

        let err = service
            .validate(&token(json!({"cid": "expired", "exp": exp()})))
            .unwrap_err();
        assert_eq!(err.message, "Contract has expired");
    }

    #[test]
    fn test_signature_and_expiry_are_enforced() {
        let service = service();
        let forged = encode(
            &Header::default(),
            &json!({"cid": "valid", "exp": exp()}),
            &EncodingKey::from_secret(b"another-secret"),
        )
        .unwrap();
        assert_eq!(
            service.validate(&forged).unwrap_err().code,
            ErrorCode::InvalidToken
        );

        let stale = token(json!({"cid": "valid", "exp": chrono::Utc::now().timestamp() - 600}));
        assert_eq!(
            service.validate(&stale).unwrap_err().code,
            ErrorCode::TokenExpired
        );
    }

    #[tokio::test]
    async fn test_validation_endpoint_returns_data_address() {
        let router = create_validation_router(Arc::new(service()));
        let address = json!({"properties": {"type": "HttpData", "endpoint": "http://example.com"}});
        let valid = token(json!({"cid": "valid", "exp": exp(), "dad": address.to_string()}));

        let response = router
            .clone()
            .oneshot(
                Request::get("/validation")
                    .header("Authorization", valid)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let returned: DataAddress = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(returned.address_type(), "HttpData");
        assert_eq!(returned.property("endpoint"), Some("http://example.com"));

        let expired = token(json!({"cid": "expired", "exp": exp(), "dad": address.to_string()}));
        let response = router
            .oneshot(
                Request::get("/validation")
                    .header("Authorization", expired)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

use actix_web::HttpRequest;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::User;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: String,
    pub username: String,
    pub is_reviewer: bool,
    pub is_admin: bool,
    pub exp: usize,
}

pub fn generate_jwt(user: &User) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let now = Utc::now();
    let claims = Claims {
        sub: user.username.clone(),
        user_id: user.id.clone(),
        username: user.username.clone(),
        is_reviewer: user.is_reviewer,
        is_admin: user.is_admin,
        exp: (now + chrono::Duration::days(2)).timestamp() as usize,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn verify_jwt(req: &HttpRequest) -> Result<Claims, actix_web::Error> {
    let token = req
        .cookie("access_token")
        .ok_or_else(|| {
            log::error!("No access_token cookie found in request to {}", req.path());
            actix_web::error::ErrorUnauthorized("Token not found")
        })?
        .value()
        .to_string();

    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        log::error!("JWT verification failed: {:?}", e);
        actix_web::error::ErrorUnauthorized(format!("Invalid or expired token: {}", e))
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    fn reviewer() -> User {
        User {
            id: "u-1".to_string(),
            username: "frank".to_string(),
            discord_id: Some("123456789".to_string()),
            discriminator: Some("0042".to_string()),
            image: None,
            is_reviewer: true,
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn roundtrips_claims_through_the_cookie() {
        std::env::set_var("JWT_SECRET", "test-secret");
        let token = generate_jwt(&reviewer()).unwrap();

        let req = TestRequest::default()
            .cookie(Cookie::new("access_token", token))
            .to_http_request();
        let claims = verify_jwt(&req).unwrap();

        assert_eq!(claims.user_id, "u-1");
        assert_eq!(claims.username, "frank");
        assert!(claims.is_reviewer);
        assert!(!claims.is_admin);
    }

    #[test]
    fn rejects_a_request_without_the_cookie() {
        std::env::set_var("JWT_SECRET", "test-secret");
        let req = TestRequest::default().to_http_request();
        assert!(verify_jwt(&req).is_err());
    }

    #[test]
    fn rejects_a_token_signed_with_another_secret() {
        std::env::set_var("JWT_SECRET", "test-secret");
        let user = reviewer();
        let claims = Claims {
            sub: user.username.clone(),
            user_id: user.id.clone(),
            username: user.username.clone(),
            is_reviewer: true,
            is_admin: false,
            exp: (Utc::now() + chrono::Duration::days(2)).timestamp() as usize,
        };
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"not-our-secret"),
        )
        .unwrap();

        let req = TestRequest::default()
            .cookie(Cookie::new("access_token", forged))
            .to_http_request();
        assert!(verify_jwt(&req).is_err());
    }
}

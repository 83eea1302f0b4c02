use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rusqlite::Connection;
use sha1::Sha1;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::User;
use crate::services::validation::FieldErrors;

#[derive(Debug)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

fn hash_password(salt: &str, password: &str) -> anyhow::Result<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(salt.as_bytes())
        .map_err(|_| anyhow::anyhow!("invalid password salt"))?;
    mac.update(password.as_bytes());
    let digest = mac.finalize().into_bytes();
    Ok(base64::engine::general_purpose::STANDARD.encode(digest))
}

fn mint_session(conn: &Connection, ttl_hours: i64, user: User) -> Result<AuthSession, AppError> {
    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let expires_at = Utc::now().naive_utc() + Duration::hours(ttl_hours);
    queries::insert_session(conn, &token, &user.id, &expires_at)?;
    Ok(AuthSession { token, user })
}

pub fn register(
    conn: &Connection,
    ttl_hours: i64,
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
) -> Result<AuthSession, AppError> {
    let mut errors = FieldErrors::default();
    if name.trim().is_empty() {
        errors.add("name", "name is required");
    }
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        errors.add("email", "a valid email address is required");
    }
    if phone.trim().is_empty() {
        errors.add("phone", "phone number is required");
    }
    if password.len() < 8 {
        errors.add("password", "password must be at least 8 characters");
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if queries::email_exists(conn, &email)? {
        return Err(AppError::Conflict(
            "an account with this email already exists".to_string(),
        ));
    }

    let salt = Uuid::new_v4().simple().to_string();
    let hash = hash_password(&salt, password)?;
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        email,
        phone: phone.trim().to_string(),
    };
    queries::insert_user(conn, &user, &salt, &hash)?;

    tracing::info!(user_id = %user.id, "registered new user");
    mint_session(conn, ttl_hours, user)
}

pub fn login(
    conn: &Connection,
    ttl_hours: i64,
    email: &str,
    password: &str,
) -> Result<AuthSession, AppError> {
    let email = email.trim().to_lowercase();
    let creds = queries::get_credentials_by_email(conn, &email)?
        .ok_or(AppError::InvalidCredentials)?;

    let hash = hash_password(&creds.password_salt, password)?;
    if hash != creds.password_hash {
        return Err(AppError::InvalidCredentials);
    }

    mint_session(conn, ttl_hours, creds.user)
}

/// Resolves the bearer token to the session's user. Expired or unknown
/// tokens resolve to None (anonymous); the stale rows themselves are swept
/// opportunistically so the table does not grow unbounded.
pub fn current_user(conn: &Connection, token: &str) -> anyhow::Result<Option<User>> {
    let _ = queries::delete_expired_sessions(conn)?;
    queries::get_session_user(conn, token)
}

pub fn logout(conn: &Connection, token: &str) -> anyhow::Result<bool> {
    queries::delete_session(conn, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    #[test]
    fn test_register_then_login() {
        let conn = setup();
        let session = register(
            &conn,
            24,
            "Rao",
            "rao@example.com",
            "9876543210",
            "password123",
        )
        .unwrap();
        assert_eq!(session.user.name, "Rao");
        assert!(!session.token.is_empty());

        let session = login(&conn, 24, "rao@example.com", "password123").unwrap();
        assert_eq!(session.user.email, "rao@example.com");

        let resolved = current_user(&conn, &session.token).unwrap().unwrap();
        assert_eq!(resolved.id, session.user.id);
    }

    #[test]
    fn test_login_is_case_insensitive_on_email() {
        let conn = setup();
        register(
            &conn,
            24,
            "Rao",
            "Rao@Example.com",
            "9876543210",
            "password123",
        )
        .unwrap();

        assert!(login(&conn, 24, "rao@example.com", "password123").is_ok());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let conn = setup();
        register(
            &conn,
            24,
            "Rao",
            "rao@example.com",
            "9876543210",
            "password123",
        )
        .unwrap();

        let err = login(&conn, 24, "rao@example.com", "hunter2hunter2").unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[test]
    fn test_unknown_email_rejected() {
        let conn = setup();
        let err = login(&conn, 24, "nobody@example.com", "password123").unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[test]
    fn test_duplicate_email_conflict() {
        let conn = setup();
        register(
            &conn,
            24,
            "Rao",
            "rao@example.com",
            "9876543210",
            "password123",
        )
        .unwrap();

        let err = register(
            &conn,
            24,
            "Other",
            "rao@example.com",
            "9000000000",
            "password456",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_register_validates_fields() {
        let conn = setup();
        let err = register(&conn, 24, "", "not-an-email", "", "short").unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.get("name").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("phone").is_some());
        assert!(errors.get("password").is_some());
    }

    #[test]
    fn test_logout_invalidates_session() {
        let conn = setup();
        let session = register(
            &conn,
            24,
            "Rao",
            "rao@example.com",
            "9876543210",
            "password123",
        )
        .unwrap();

        assert!(logout(&conn, &session.token).unwrap());
        assert!(current_user(&conn, &session.token).unwrap().is_none());
        assert!(!logout(&conn, &session.token).unwrap());
    }

    #[test]
    fn test_unknown_token_is_anonymous() {
        let conn = setup();
        assert!(current_user(&conn, "no-such-token").unwrap().is_none());
    }
}

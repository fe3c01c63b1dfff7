use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use regex::Regex;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::core::error::{ConfigError, Error};
use crate::types::response;
use crate::types::user::{Role, User};
use crate::utils::auth::Claims;

const TOKEN_LIFETIME_HOURS: i64 = 1;

#[derive(Clone)]
pub struct UserController {
    pool: SqlitePool,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    username_pattern: Regex,
}

impl std::fmt::Debug for UserController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserController")
            .field("username_pattern", &self.username_pattern.as_str())
            .finish()
    }
}

impl UserController {
    pub fn new(pool: SqlitePool, jwt_secret: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            pool,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            username_pattern: Regex::new(r"^[a-zA-Z0-9_-]{3,20}$")?,
        })
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        match sqlx::query(
            "SELECT id, username, password_hash, role, created_at
             FROM users
             WHERE username = ?",
        )
        .bind(username)
        .map(map_user)
        .fetch_one(&self.pool)
        .await
        {
            Ok(user) => Ok(Some(user)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    /// An unknown username and a wrong password produce the same error, so
    /// the response gives away nothing about which usernames exist.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String), Error> {
        let user = self
            .get_user_by_username(username)
            .await?
            .ok_or(Error::InvalidCredentials)?;

        if !bcrypt::verify(password, &user.password_hash)? {
            return Err(Error::InvalidCredentials);
        }

        let token = self.encode_jwt(&user)?;

        Ok((user, token))
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<i64, Error> {
        if !self.username_pattern.is_match(username) {
            return Err(Error::InvalidUsername);
        }

        if password.len() < 8 {
            return Err(Error::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if self.get_user_by_username(username).await?.is_some() {
            return Err(Error::UsernameTaken);
        }

        let password_hash = self.hash(password)?;
        let role = role.unwrap_or(Role::User);

        // the UNIQUE constraint backstops the check above against a
        // concurrent insert of the same username
        match sqlx::query(
            "INSERT INTO users (username, password_hash, role, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING id",
        )
        .bind(username)
        .bind(&password_hash)
        .bind(role)
        .bind(Utc::now().naive_utc())
        .map(|row: SqliteRow| row.get("id"))
        .fetch_one(&self.pool)
        .await
        {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::UsernameTaken)
            }
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub async fn profile(&self, id: i64) -> Result<response::Profile, Error> {
        match sqlx::query("SELECT id, username, role, created_at FROM users WHERE id = ?")
            .bind(id)
            .map(|row: SqliteRow| response::Profile {
                id: row.get("id"),
                username: row.get("username"),
                role: row.get("role"),
                created_at: row.get("created_at"),
            })
            .fetch_one(&self.pool)
            .await
        {
            Ok(profile) => Ok(profile),
            Err(sqlx::Error::RowNotFound) => Err(Error::UserNotFound),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    fn hash(&self, value: &str) -> Result<String, Error> {
        bcrypt::hash(value, 12).map_err(Error::Bcrypt)
    }

    pub fn encode_jwt(&self, user: &User) -> Result<String, Error> {
        let current_time = Utc::now();
        let expiration_time = current_time + Duration::hours(TOKEN_LIFETIME_HOURS);

        let claims = Claims {
            exp: expiration_time.timestamp() as usize,
            iat: current_time.timestamp() as usize,
            sub: user.username.clone(),
            uid: user.id,
            role: user.role,
        };

        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding_key,
        )?)
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, Error> {
        match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default()) {
            Ok(token_data) => Ok(token_data),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(Error::ExpiredToken),
                _ => Err(Error::Jwt(e)),
            },
        }
    }
}

fn map_user(row: SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        role: row.get("role"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn controller() -> UserController {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::migrate!().run(&pool).await.unwrap();

        UserController::new(pool, "test-secret").unwrap()
    }

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let users = controller().await;

        let id = users
            .register("alice", "password123", None)
            .await
            .unwrap();

        let (user, token) = users.login("alice", "password123").await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::User);

        let claims = users.decode_jwt(&token).unwrap().claims;
        assert_eq!(claims.uid, id);
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, Role::User);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_are_indistinguishable() {
        let users = controller().await;
        users.register("bob", "password123", None).await.unwrap();

        let missing = users.login("nobody", "password123").await.unwrap_err();
        let wrong = users.login("bob", "not-the-password").await.unwrap_err();

        assert!(matches!(missing, Error::InvalidCredentials));
        assert!(matches!(wrong, Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let users = controller().await;
        users.register("carol", "password123", None).await.unwrap();

        let err = users
            .register("carol", "password456", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UsernameTaken));
    }

    #[tokio::test]
    async fn role_override_is_respected() {
        let users = controller().await;
        let id = users
            .register("dana", "password123", Some(Role::Admin))
            .await
            .unwrap();

        let profile = users.profile(id).await.unwrap();
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.username, "dana");
    }

    #[tokio::test]
    async fn malformed_usernames_and_short_passwords_are_rejected() {
        let users = controller().await;

        let err = users.register("x", "password123", None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidUsername));

        let err = users.register("eve", "short", None).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn garbage_token_fails_verification() {
        let users = controller().await;

        let err = users.decode_jwt("not-a-token").unwrap_err();
        assert!(matches!(err, Error::Jwt(_)));
    }

    #[tokio::test]
    async fn expired_token_fails_verification() {
        let users = controller().await;

        // well past the validator's leeway window
        let two_hours_ago = (Utc::now() - Duration::hours(2)).timestamp() as usize;
        let claims = Claims {
            exp: two_hours_ago,
            iat: two_hours_ago,
            sub: "alice".to_string(),
            uid: 1,
            role: Role::User,
        };

        let expired = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret".as_bytes()),
        )
        .unwrap();

        let err = users.decode_jwt(&expired).unwrap_err();
        assert!(matches!(err, Error::ExpiredToken));
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let users = controller().await;
        let id = users.register("frank", "password123", None).await.unwrap();
        let (user, _) = users.login("frank", "password123").await.unwrap();
        assert_eq!(user.id, id);

        let other = UserController::new(users.pool.clone(), "other-secret").unwrap();
        let forged = other.encode_jwt(&user).unwrap();

        let err = users.decode_jwt(&forged).unwrap_err();
        assert!(matches!(err, Error::Jwt(_)));
    }
}

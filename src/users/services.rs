use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    users::{repo::UserRepo, repo_types::User},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Checked registration input.
#[derive(Debug, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

pub fn validate_registration(name: &str, email: &str) -> AppResult<NewUser> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }

    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }

    Ok(NewUser {
        name: name.to_string(),
        email,
    })
}

/// Persists a new user with a fresh session token.
pub async fn register(users: &dyn UserRepo, input: NewUser) -> AppResult<User> {
    if users.find_by_email(&input.email).await?.is_some() {
        warn!(email = %input.email, "email already registered");
        return Err(AppError::DuplicateUser);
    }

    let candidate = User {
        id: Uuid::new_v4(),
        name: input.name,
        email: input.email,
        session_id: Uuid::new_v4(),
    };

    // A concurrent registration can still win between the lookup and the insert.
    let Some(user) = users.create(&candidate).await? else {
        warn!(email = %candidate.email, "email registered concurrently");
        return Err(AppError::DuplicateUser);
    };

    info!(user_id = %user.id, "user registered");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn validate_normalizes_email_and_name() {
        let input = validate_registration("  Ana ", " Ana@Example.COM ").unwrap();
        assert_eq!(
            input,
            NewUser {
                name: "Ana".into(),
                email: "ana@example.com".into(),
            }
        );
    }

    #[test]
    fn validate_rejects_blank_name_and_bad_email() {
        assert!(matches!(
            validate_registration("   ", "ana@example.com"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_registration("Ana", "not-an-email"),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn register_issues_distinct_ids_and_tokens() {
        let store = MemoryStore::default();
        let user = register(&store, validate_registration("Ana", "ana@example.com").unwrap())
            .await
            .unwrap();
        assert_ne!(user.id, user.session_id);

        let found = store.find_by_session(user.session_id).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let store = MemoryStore::default();
        register(&store, validate_registration("Ana", "ana@example.com").unwrap())
            .await
            .unwrap();

        let err = register(&store, validate_registration("Other", "ANA@example.com").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser));
    }
}

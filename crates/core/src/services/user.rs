//! User service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use voyage_common::{AppError, AppResult};
use voyage_db::entities::user::{self, Role};
use voyage_db::repositories::UserRepository;

use super::identity::VerifiedIdentity;

/// Input for completing registration.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 128))]
    pub display_name: Option<String>,
    #[validate(length(min = 4, max = 32))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub home_city: Option<String>,
}

/// Input for updating the own profile.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 128))]
    pub display_name: Option<String>,
    #[validate(length(min = 4, max = 32))]
    pub phone: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub home_city: Option<String>,
}

/// Service for user accounts.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Account for a verified identity, if registered.
    pub async fn find_by_identity(
        &self,
        identity: &VerifiedIdentity,
    ) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_firebase_uid(&identity.uid).await
    }

    /// Get a user by ID.
    pub async fn get(&self, id: i32) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Create the account for a verified identity with the `User` role.
    pub async fn register(
        &self,
        identity: &VerifiedIdentity,
        input: RegisterInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        if self
            .user_repo
            .find_by_firebase_uid(&identity.uid)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Account already registered".to_string()));
        }

        let email = identity
            .email
            .clone()
            .ok_or_else(|| AppError::invalid_field("email", "identity has no email address"))?;

        let model = user::ActiveModel {
            firebase_uid: Set(identity.uid.clone()),
            email: Set(email),
            display_name: Set(input.display_name.or_else(|| identity.name.clone())),
            phone: Set(input.phone),
            avatar_url: Set(identity.picture.clone()),
            home_city: Set(input.home_city),
            role: Set(Role::User),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Update the caller's profile.
    pub async fn update_profile(
        &self,
        user: user::Model,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let mut active: user::ActiveModel = user.into();
        if let Some(display_name) = input.display_name {
            active.display_name = Set(Some(display_name));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        if let Some(home_city) = input.home_city {
            active.home_city = Set(Some(home_city));
        }
        active.updated_at = Set(Some(Utc::now()));

        self.user_repo.update(active).await
    }

    /// List users (admin).
    pub async fn list_users(
        &self,
        role: Option<Role>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all(role, limit, offset).await
    }

    /// Count all users.
    pub async fn count(&self) -> AppResult<u64> {
        self.user_repo.count().await
    }

    /// Change another user's role (admin).
    pub async fn change_role(
        &self,
        actor: &user::Model,
        target_id: i32,
        role: Role,
    ) -> AppResult<user::Model> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only administrators can change roles".to_string(),
            ));
        }
        if actor.id == target_id {
            return Err(AppError::BadRequest(
                "Administrators cannot change their own role".to_string(),
            ));
        }

        let target = self.user_repo.get_by_id(target_id).await?;
        if target.role == role {
            return Ok(target);
        }

        let mut active: user::ActiveModel = target.into();
        active.role = Set(role);
        active.updated_at = Set(Some(Utc::now()));

        let updated = self.user_repo.update(active).await?;
        tracing::info!(
            actor_id = actor.id,
            user_id = updated.id,
            role = ?role,
            "User role changed"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn identity() -> VerifiedIdentity {
        VerifiedIdentity {
            uid: "uid-7".to_string(),
            email: Some("user7@example.com".to_string()),
            email_verified: true,
            name: Some("Ana".to_string()),
            picture: None,
        }
    }

    #[tokio::test]
    async fn test_register_creates_user_role() {
        let created = fixtures::user(7, Role::User);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<user::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 7,
                    rows_affected: 1,
                }])
                .append_query_results([[created]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let user = service
            .register(&identity(), RegisterInput::default())
            .await
            .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[fixtures::user(7, Role::User)]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.register(&identity(), RegisterInput::default()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::MySql).into_connection());

        let service = UserService::new(UserRepository::new(db));
        let input = RegisterInput {
            phone: Some("1".to_string()),
            ..Default::default()
        };
        let result = service.register(&identity(), input).await;

        match result {
            Err(AppError::Validation { fields, .. }) => assert!(fields.contains_key("phone")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_change_own_role_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::MySql).into_connection());

        let service = UserService::new(UserRepository::new(db));
        let admin = fixtures::user(1, Role::Admin);
        let result = service.change_role(&admin, 1, Role::User).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_change_role_promotes() {
        let mut promoted = fixtures::user(2, Role::BusinessAdministrator);
        promoted.updated_at = Some(Utc::now());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[fixtures::user(2, Role::User)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[promoted]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let admin = fixtures::user(1, Role::Admin);
        let user = service
            .change_role(&admin, 2, Role::BusinessAdministrator)
            .await
            .unwrap();

        assert_eq!(user.role, Role::BusinessAdministrator);
    }
}

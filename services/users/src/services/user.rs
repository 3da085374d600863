//! User domain service
//!
//! Enforces the business rules around user accounts (password
//! confirmation, username uniqueness, role validity) and translates the
//! repositories' `RecordNotFound` into user-facing errors. Any other
//! persistence error is returned unchanged.
//!
//! Every operation is a plain future: dropping it (for instance when a
//! request deadline fires) aborts the in-flight statement.

use std::sync::Arc;

use common::error::DatabaseError;
use thiserror::Error;

use crate::{
    models::{CreateUser, RoleId, UpdateUser, User},
    repositories::{RoleStore, UserStore},
};

/// Errors returned by [`UserService`]
///
/// Display text of the business variants is safe to show to end users.
#[derive(Error, Debug)]
pub enum UserServiceError {
    #[error("Passwords do not match")]
    InvalidPasswordConfirmation,

    #[error("This username is already taken")]
    UsernameAlreadyTaken,

    #[error("The specified user role does not exist")]
    InvalidRole,

    #[error("User not found")]
    UserNotFound,

    /// Infrastructure failure passed through from the repositories
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub type UserServiceResult<T> = Result<T, UserServiceError>;

/// User service
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, roles: Arc<dyn RoleStore>) -> Self {
        Self { users, roles }
    }

    /// Create a new user after validating the payload
    pub async fn create(&self, user: &CreateUser) -> UserServiceResult<()> {
        if !user.passwords_match() {
            return Err(UserServiceError::InvalidPasswordConfirmation);
        }

        self.ensure_username_available(&user.username).await?;
        self.ensure_role_exists(user.role_id).await?;

        self.users.add(user).await.map_err(|err| match err {
            // The role vanished between the check and the insert
            DatabaseError::RecordNotFound | DatabaseError::ForeignKeyViolation(_) => {
                UserServiceError::InvalidRole
            }
            // Lost the check-then-insert race against a concurrent create
            DatabaseError::UniqueViolation(_) => UserServiceError::UsernameAlreadyTaken,
            other => other.into(),
        })
    }

    /// Fetch a user by username
    pub async fn get(&self, username: &str) -> UserServiceResult<User> {
        self.users.get(username).await.map_err(not_found_as_user)
    }

    /// Apply a partial update to the user identified by `username`
    pub async fn update(&self, username: &str, fields: &UpdateUser) -> UserServiceResult<()> {
        if let Some(new_username) = &fields.username {
            self.ensure_username_available(new_username).await?;
        }
        if let Some(role_id) = fields.role_id {
            self.ensure_role_exists(role_id).await?;
        }

        self.users
            .update(username, fields)
            .await
            .map_err(|err| match err {
                DatabaseError::UniqueViolation(_) => UserServiceError::UsernameAlreadyTaken,
                DatabaseError::ForeignKeyViolation(_) => UserServiceError::InvalidRole,
                other => not_found_as_user(other),
            })
    }

    /// Soft delete the user identified by `username`
    pub async fn delete(&self, username: &str) -> UserServiceResult<()> {
        self.users.delete(username).await.map_err(not_found_as_user)
    }

    async fn ensure_username_available(&self, username: &str) -> UserServiceResult<()> {
        if !self.users.is_username_available(username).await? {
            return Err(UserServiceError::UsernameAlreadyTaken);
        }
        Ok(())
    }

    async fn ensure_role_exists(&self, role_id: RoleId) -> UserServiceResult<()> {
        if !self.roles.is_role_exist(role_id).await? {
            return Err(UserServiceError::InvalidRole);
        }
        Ok(())
    }
}

fn not_found_as_user(err: DatabaseError) -> UserServiceError {
    if err.is_not_found() {
        UserServiceError::UserNotFound
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MockRoleStore, MockUserStore};
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    fn alice() -> CreateUser {
        CreateUser {
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
            role_id: 1,
        }
    }

    fn service(users: MockUserStore, roles: MockRoleStore) -> UserService {
        UserService::new(Arc::new(users), Arc::new(roles))
    }

    #[tokio::test]
    async fn create_persists_valid_user() {
        let mut users = MockUserStore::new();
        users
            .expect_is_username_available()
            .with(eq("alice"))
            .times(1)
            .returning(|_| Ok(true));
        users
            .expect_add()
            .withf(|user| user.username == "alice" && user.role_id == 1)
            .times(1)
            .returning(|_| Ok(()));

        let mut roles = MockRoleStore::new();
        roles
            .expect_is_role_exist()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(true));

        assert_ok!(service(users, roles).create(&alice()).await);
    }

    #[tokio::test]
    async fn create_rejects_mismatched_passwords_before_touching_the_store() {
        let users = MockUserStore::new();
        let roles = MockRoleStore::new();

        let mut user = alice();
        user.confirm_password = "other".to_string();

        let err = service(users, roles).create(&user).await.unwrap_err();
        assert!(matches!(err, UserServiceError::InvalidPasswordConfirmation));
    }

    #[tokio::test]
    async fn create_rejects_taken_username() {
        let mut users = MockUserStore::new();
        users
            .expect_is_username_available()
            .returning(|_| Ok(false));
        users.expect_add().never();

        let err = service(users, MockRoleStore::new())
            .create(&alice())
            .await
            .unwrap_err();
        assert!(matches!(err, UserServiceError::UsernameAlreadyTaken));
    }

    #[tokio::test]
    async fn create_rejects_unknown_role() {
        let mut users = MockUserStore::new();
        users.expect_is_username_available().returning(|_| Ok(true));
        users.expect_add().never();

        let mut roles = MockRoleStore::new();
        roles.expect_is_role_exist().returning(|_| Ok(false));

        let err = service(users, roles).create(&alice()).await.unwrap_err();
        assert!(matches!(err, UserServiceError::InvalidRole));
    }

    #[tokio::test]
    async fn create_maps_role_disappearing_at_insert_to_invalid_role() {
        let mut users = MockUserStore::new();
        users.expect_is_username_available().returning(|_| Ok(true));
        users
            .expect_add()
            .returning(|_| Err(DatabaseError::RecordNotFound));

        let mut roles = MockRoleStore::new();
        roles.expect_is_role_exist().returning(|_| Ok(true));

        let err = service(users, roles).create(&alice()).await.unwrap_err();
        assert!(matches!(err, UserServiceError::InvalidRole));
    }

    #[tokio::test]
    async fn create_maps_unique_violation_to_username_taken() {
        let mut users = MockUserStore::new();
        users.expect_is_username_available().returning(|_| Ok(true));
        users.expect_add().returning(|_| {
            Err(DatabaseError::UniqueViolation(
                "user_username_active_key".to_string(),
            ))
        });

        let mut roles = MockRoleStore::new();
        roles.expect_is_role_exist().returning(|_| Ok(true));

        let err = service(users, roles).create(&alice()).await.unwrap_err();
        assert!(matches!(err, UserServiceError::UsernameAlreadyTaken));
    }

    #[tokio::test]
    async fn create_passes_infrastructure_errors_through() {
        let mut users = MockUserStore::new();
        users
            .expect_is_username_available()
            .returning(|_| Err(DatabaseError::Connection(sqlx::Error::PoolTimedOut)));

        let err = service(users, MockRoleStore::new())
            .create(&alice())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UserServiceError::Database(DatabaseError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn get_returns_stored_user() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let stored = User {
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password: "pw".to_string(),
            role_id: 1,
            created_at: now,
            updated_at: now,
        };
        let returned = stored.clone();

        let mut users = MockUserStore::new();
        users
            .expect_get()
            .with(eq("alice"))
            .times(2)
            .returning(move |_| Ok(returned.clone()));

        let service = service(users, MockRoleStore::new());
        let first = service.get("alice").await.unwrap();
        let second = service.get("alice").await.unwrap();

        assert_eq!(first, stored);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn get_maps_record_not_found() {
        let mut users = MockUserStore::new();
        users
            .expect_get()
            .returning(|_| Err(DatabaseError::RecordNotFound));

        let err = service(users, MockRoleStore::new())
            .get("ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, UserServiceError::UserNotFound));
    }

    #[tokio::test]
    async fn update_checks_the_new_username_not_the_current_one() {
        let mut users = MockUserStore::new();
        users
            .expect_is_username_available()
            .with(eq("bob"))
            .times(1)
            .returning(|_| Ok(false));
        users.expect_update().never();

        let fields = UpdateUser {
            username: Some("bob".to_string()),
            ..Default::default()
        };

        let err = service(users, MockRoleStore::new())
            .update("alice", &fields)
            .await
            .unwrap_err();
        assert!(matches!(err, UserServiceError::UsernameAlreadyTaken));
    }

    #[tokio::test]
    async fn update_without_fields_skips_checks_and_still_writes() {
        let mut users = MockUserStore::new();
        users.expect_is_username_available().never();
        users
            .expect_update()
            .withf(|username, fields| username == "alice" && fields.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut roles = MockRoleStore::new();
        roles.expect_is_role_exist().never();

        assert_ok!(
            service(users, roles)
                .update("alice", &UpdateUser::default())
                .await
        );
    }

    #[tokio::test]
    async fn update_validates_a_changed_role() {
        let mut users = MockUserStore::new();
        users.expect_update().never();

        let mut roles = MockRoleStore::new();
        roles
            .expect_is_role_exist()
            .with(eq(42))
            .returning(|_| Ok(false));

        let fields = UpdateUser {
            role_id: Some(42),
            ..Default::default()
        };

        let err = service(users, roles)
            .update("alice", &fields)
            .await
            .unwrap_err();
        assert!(matches!(err, UserServiceError::InvalidRole));
    }

    #[tokio::test]
    async fn update_maps_record_not_found() {
        let mut users = MockUserStore::new();
        users
            .expect_update()
            .returning(|_, _| Err(DatabaseError::RecordNotFound));

        let fields = UpdateUser {
            email: Some("new@x.com".to_string()),
            ..Default::default()
        };

        let err = service(users, MockRoleStore::new())
            .update("ghost", &fields)
            .await
            .unwrap_err();
        assert!(matches!(err, UserServiceError::UserNotFound));
    }

    #[tokio::test]
    async fn delete_maps_record_not_found() {
        let mut users = MockUserStore::new();
        users
            .expect_delete()
            .with(eq("ghost"))
            .returning(|_| Err(DatabaseError::RecordNotFound));

        let result = service(users, MockRoleStore::new()).delete("ghost").await;
        let err = assert_err!(result);
        assert!(matches!(err, UserServiceError::UserNotFound));
    }

    #[tokio::test]
    async fn lookups_pass_other_errors_through_unchanged() {
        let mut users = MockUserStore::new();
        users
            .expect_get()
            .returning(|_| Err(DatabaseError::Query(sqlx::Error::PoolClosed)));
        users
            .expect_delete()
            .returning(|_| Err(DatabaseError::Connection(sqlx::Error::PoolTimedOut)));
        let service = service(users, MockRoleStore::new());

        let err = assert_err!(service.get("alice").await);
        assert!(matches!(
            err,
            UserServiceError::Database(DatabaseError::Query(_))
        ));
        let err = assert_err!(service.delete("alice").await);
        assert!(matches!(
            err,
            UserServiceError::Database(DatabaseError::Connection(_))
        ));
    }

    #[test]
    fn business_errors_have_user_facing_messages() {
        assert_eq!(
            UserServiceError::InvalidPasswordConfirmation.to_string(),
            "Passwords do not match"
        );
        assert_eq!(UserServiceError::UserNotFound.to_string(), "User not found");
    }
}

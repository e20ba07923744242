//! PostgreSQL-backed `CredentialStore`.
//!
//! Accounts are read together with their role names from `user_roles`.
//! Soft-deleted users are invisible to every lookup. New accounts and their
//! role links are written in one transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{CredentialStore, CredentialStoreError};
use crate::domain::{Role, UserAccount, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRoleRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{roles, user_roles, users};

diesel::define_sql_function!(fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text);

/// Diesel implementation of the credential store port.
#[derive(Clone)]
pub struct DieselCredentialStore {
    pool: DbPool,
}

impl DieselCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CredentialStoreError {
    map_basic_pool_error(error, CredentialStoreError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CredentialStoreError {
    map_basic_diesel_error(
        error,
        CredentialStoreError::query,
        CredentialStoreError::connection,
    )
}

/// Unique index names from the users migration.
const EMAIL_KEY: &str = "users_email_key";
const USERNAME_KEY: &str = "users_username_key";

fn map_insert_error(error: DieselError, account: &UserAccount) -> CredentialStoreError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        match info.constraint_name() {
            Some(EMAIL_KEY) => {
                return CredentialStoreError::duplicate_email(account.email.as_str());
            }
            Some(USERNAME_KEY) => {
                return CredentialStoreError::duplicate_username(account.username.as_str());
            }
            _ => {}
        }
    }
    map_diesel_error(error)
}

async fn attach_roles(
    conn: &mut AsyncPgConnection,
    row: UserRow,
) -> Result<UserAccount, CredentialStoreError> {
    let names: Vec<String> = user_roles::table
        .inner_join(roles::table)
        .filter(user_roles::user_id.eq(row.id))
        .select(roles::name)
        .order(roles::name.asc())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let roles = names
        .into_iter()
        .filter_map(|name| match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                warn!(user_id = %row.id, error = %err, "ignoring unknown role");
                None
            }
        })
        .collect();

    Ok(UserAccount {
        id: UserId::from_uuid(row.id),
        email: row.email,
        username: row.username,
        password_hash: row.password_hash,
        roles,
    })
}

#[async_trait]
impl CredentialStore for DieselCredentialStore {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(lower(users::email).eq(email.to_lowercase()))
            .filter(users::deleted_at.is_null())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match row {
            Some(row) => attach_roles(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::username.eq(username))
            .filter(users::deleted_at.is_null())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match row {
            Some(row) => attach_roles(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .filter(users::deleted_at.is_null())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match row {
            Some(row) => attach_roles(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create_account(&self, account: &UserAccount) -> Result<(), CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *account.id.as_uuid();
        let row = NewUserRow {
            id: user_id,
            email: &account.email,
            username: &account.username,
            password_hash: &account.password_hash,
        };
        let names: Vec<&'static str> = account.roles.iter().map(|role| role.as_str()).collect();

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                let role_ids: Vec<Uuid> = roles::table
                    .filter(roles::name.eq_any(names))
                    .select(roles::id)
                    .load(conn)
                    .await?;
                let links: Vec<NewUserRoleRow> = role_ids
                    .into_iter()
                    .map(|role_id| NewUserRoleRow { user_id, role_id })
                    .collect();
                diesel::insert_into(user_roles::table)
                    .values(&links)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|error| map_insert_error(error, account))
    }

    async fn grant_role(&self, id: &UserId, role: Role) -> Result<(), CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let role_id: Uuid = roles::table
            .filter(roles::name.eq(role.as_str()))
            .select(roles::id)
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        diesel::insert_into(user_roles::table)
            .values(NewUserRoleRow {
                user_id: *id.as_uuid(),
                role_id,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

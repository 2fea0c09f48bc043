//! User model.
//!
//! Credential handling lives in the outer layer; this model only stores the
//! profile fields and the admin flag the authorization check reads.

use crate::client::GenericClient;
use crate::error::{BoardError, BoardResult};
use crate::fragment::{FieldMap, FragmentMode, RenameMap, build};
use crate::row::{FromRow, RowExt};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const USER_COLUMNS: &str = "username, first_name, last_name, email, is_admin";

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl FromRow for User {
    fn from_row(row: &Row) -> BoardResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            email: row.try_get_column("email")?,
            is_admin: row.try_get_column("is_admin")?,
        })
    }
}

/// Input for creating a user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Partial update for a user, built field by field.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    map: FieldMap,
}

impl UserPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.map.insert("firstName", first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.map.insert("lastName", last_name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.map.insert("email", email.into());
        self
    }

    pub fn is_admin(mut self, is_admin: bool) -> Self {
        self.map.insert("isAdmin", is_admin);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn into_field_map(self) -> FieldMap {
        self.map
    }
}

fn update_rename() -> RenameMap {
    RenameMap::from_pairs(&[
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("isAdmin", "is_admin"),
    ])
}

impl User {
    /// Create a user. A duplicate username is reported as a bad request.
    pub async fn create(client: &impl GenericClient, data: NewUser) -> BoardResult<User> {
        let sql = format!(
            "INSERT INTO users (username, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let row = client
            .query_one(
                &sql,
                &[
                    &data.username,
                    &data.first_name,
                    &data.last_name,
                    &data.email,
                    &data.is_admin,
                ],
            )
            .await
            .map_err(|err| match err {
                BoardError::UniqueViolation(_) => {
                    BoardError::bad_request(format!("Duplicate username: {}", data.username))
                }
                other => other,
            })?;
        User::from_row(&row)
    }

    /// List all users, ordered by username.
    pub async fn find_all(client: &impl GenericClient) -> BoardResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY username");
        let rows = client.query(&sql, &[]).await?;
        rows.iter().map(User::from_row).collect()
    }

    /// Fetch one user by username.
    pub async fn get(client: &impl GenericClient, username: &str) -> BoardResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row = client
            .query_opt(&sql, &[&username])
            .await?
            .ok_or_else(|| BoardError::not_found(format!("No user: {username}")))?;
        User::from_row(&row)
    }

    /// Apply a partial update and return the updated user.
    pub async fn update(
        client: &impl GenericClient,
        username: &str,
        patch: UserPatch,
    ) -> BoardResult<User> {
        let fragment = build(patch.into_field_map(), &update_rename(), FragmentMode::Update)?;
        let key_idx = fragment.len() + 1;
        let sql = format!(
            "UPDATE users SET {} WHERE username = ${key_idx} RETURNING {USER_COLUMNS}",
            fragment.sql()
        );
        let mut params = fragment.params_ref();
        params.push(&username);

        let row = client
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| BoardError::not_found(format!("No user: {username}")))?;
        User::from_row(&row)
    }

    /// Delete a user by username.
    pub async fn remove(client: &impl GenericClient, username: &str) -> BoardResult<()> {
        let deleted = client
            .execute("DELETE FROM users WHERE username = $1", &[&username])
            .await?;
        if deleted == 0 {
            return Err(BoardError::not_found(format!("No user: {username}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    #[test]
    fn patch_renames_camel_case_fields_to_columns() {
        let patch = UserPatch::new()
            .first_name("Phoenix")
            .last_name("Petterson")
            .is_admin(false);
        let fragment =
            build(patch.into_field_map(), &update_rename(), FragmentMode::Update).unwrap();
        assert_eq!(
            fragment.sql(),
            r#""first_name"=$1, "last_name"=$2, "is_admin"=$3"#
        );
        assert_eq!(
            fragment.values(),
            &[
                FieldValue::Text("Phoenix".into()),
                FieldValue::Text("Petterson".into()),
                FieldValue::Bool(false),
            ]
        );
    }

    #[test]
    fn empty_patch_is_bad_request() {
        let err = build(
            UserPatch::new().into_field_map(),
            &update_rename(),
            FragmentMode::Update,
        )
        .unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn email_keeps_its_own_name_without_rename_entry() {
        let patch = UserPatch::new().email("p@example.com");
        let fragment =
            build(patch.into_field_map(), &update_rename(), FragmentMode::Update).unwrap();
        assert_eq!(fragment.sql(), r#""email"=$1"#);
    }
}

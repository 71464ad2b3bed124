//! The four backend operations with their variable and response schemas.

use serde::{Deserialize, Serialize};

use super::client::Operation;
use crate::contract::model::{BackendUser, NewBackendUser};

pub const INSERT_USERS: &str = r#"
mutation InsertUsers($firebase_uid: String, $name: String, $email: String) {
  insert_users(objects: { firebase_uid: $firebase_uid, name: $name, email: $email }) {
    returning {
      id
      firebase_uid
      name
      email
      created_at
    }
  }
}
"#;

pub const QUERY_USER: &str = r#"
query QueryUser($firebase_uid: String) {
  users(where: { firebase_uid: { _eq: $firebase_uid } }) {
    id
  }
}
"#;

pub const DELETE_TODOS: &str = r#"
mutation DeleteTodos($user_id: uuid) {
  delete_todos(where: { user_id: { _eq: $user_id } }) {
    affected_rows
  }
}
"#;

pub const DELETE_USERS: &str = r#"
mutation DeleteUsers($id: uuid) {
  delete_users(where: { id: { _eq: $id } }) {
    affected_rows
  }
}
"#;

// --- variables ---

#[derive(Debug, Serialize)]
pub struct InsertUsersVars<'a> {
    pub firebase_uid: &'a str,
    pub name: &'a str,
    pub email: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct QueryUserVars<'a> {
    pub firebase_uid: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DeleteTodosVars<'a> {
    pub user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DeleteUsersVars<'a> {
    pub id: &'a str,
}

// --- responses ---

#[derive(Debug, Deserialize)]
pub struct Returning<T> {
    pub returning: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct AffectedRows {
    pub affected_rows: u64,
}

#[derive(Debug, Deserialize)]
pub struct InsertUsersData {
    pub insert_users: Option<Returning<BackendUser>>,
}

impl InsertUsersData {
    /// First returned row, if any.
    pub fn into_first(self) -> Option<BackendUser> {
        self.insert_users
            .and_then(|r| r.returning.into_iter().next())
    }
}

#[derive(Debug, Deserialize)]
pub struct IdRow {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryUserData {
    pub users: Vec<IdRow>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTodosData {
    pub delete_todos: Option<AffectedRows>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUsersData {
    pub delete_users: Option<AffectedRows>,
}

// --- builders ---

pub fn insert_users(new_user: &NewBackendUser) -> Operation<'static, InsertUsersVars<'_>> {
    Operation {
        name: "InsertUsers",
        document: INSERT_USERS,
        variables: InsertUsersVars {
            firebase_uid: &new_user.firebase_uid,
            name: &new_user.name,
            email: new_user.email.as_deref(),
        },
    }
}

pub fn query_user(firebase_uid: &str) -> Operation<'static, QueryUserVars<'_>> {
    Operation {
        name: "QueryUser",
        document: QUERY_USER,
        variables: QueryUserVars { firebase_uid },
    }
}

pub fn delete_todos(user_id: &str) -> Operation<'static, DeleteTodosVars<'_>> {
    Operation {
        name: "DeleteTodos",
        document: DELETE_TODOS,
        variables: DeleteTodosVars { user_id },
    }
}

pub fn delete_users(id: &str) -> Operation<'static, DeleteUsersVars<'_>> {
    Operation {
        name: "DeleteUsers",
        document: DELETE_USERS,
        variables: DeleteUsersVars { id },
    }
}

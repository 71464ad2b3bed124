use async_trait::async_trait;

use super::client::GraphqlClient;
use super::operations::{self, DeleteTodosData, DeleteUsersData, InsertUsersData, QueryUserData};
use crate::contract::model::{BackendUser, NewBackendUser};
use crate::domain::error::SyncError;
use crate::domain::ports::UserDirectory;

/// `UserDirectory` backed by the Hasura GraphQL API.
#[derive(Clone)]
pub struct GraphqlUserDirectory {
    client: GraphqlClient,
}

impl GraphqlUserDirectory {
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserDirectory for GraphqlUserDirectory {
    async fn insert_user(
        &self,
        new_user: &NewBackendUser,
    ) -> Result<Option<BackendUser>, SyncError> {
        let data: InsertUsersData = self
            .client
            .execute(&operations::insert_users(new_user))
            .await?;
        Ok(data.into_first())
    }

    async fn find_user_id(&self, firebase_uid: &str) -> Result<Option<String>, SyncError> {
        let data: QueryUserData = self
            .client
            .execute(&operations::query_user(firebase_uid))
            .await?;
        Ok(data.users.into_iter().next().map(|row| row.id))
    }

    async fn delete_todos(&self, user_id: &str) -> Result<u64, SyncError> {
        let data: DeleteTodosData = self
            .client
            .execute(&operations::delete_todos(user_id))
            .await?;
        data.delete_todos
            .map(|r| r.affected_rows)
            .ok_or_else(|| SyncError::backend_error("delete_todos returned null"))
    }

    async fn delete_user(&self, user_id: &str) -> Result<u64, SyncError> {
        let data: DeleteUsersData = self
            .client
            .execute(&operations::delete_users(user_id))
            .await?;
        data.delete_users
            .map(|r| r.affected_rows)
            .ok_or_else(|| SyncError::backend_error("delete_users returned null"))
    }
}

use std::collections::HashMap;

use sea_orm::ConnectionTrait;

use crate::db::dao::{DaoResult, PermissionDao};
use crate::db::entities::list_permission::{self, ListRight};

/// Something a caller can do to a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Read,
}

/// Which rights grant which capability.
///
/// Built once at startup and shared read-only through the application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionPolicy {
    rights: HashMap<Capability, Vec<ListRight>>,
}

impl PermissionPolicy {
    pub fn empty() -> Self {
        Self {
            rights: HashMap::new(),
        }
    }

    pub fn allow(mut self, capability: Capability, right: ListRight) -> Self {
        let rights = self.rights.entry(capability).or_default();
        if !rights.contains(&right) {
            rights.push(right);
        }
        self
    }

    /// Rights granting `capability`. Unmapped capabilities grant nothing.
    pub fn allowed_rights_for(&self, capability: Capability) -> &[ListRight] {
        self.rights
            .get(&capability)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self::empty().allow(Capability::Read, ListRight::Owner)
    }
}

#[derive(Clone)]
pub struct PermissionService {
    permission_dao: PermissionDao,
}

impl PermissionService {
    pub fn new(permission_dao: PermissionDao) -> Self {
        Self { permission_dao }
    }

    /// Makes `user_id` the owner of `list_id` on `conn`.
    pub async fn grant_ownership<C>(
        &self,
        conn: &C,
        list_id: i32,
        user_id: i32,
    ) -> DaoResult<list_permission::Model>
    where
        C: ConnectionTrait + Sync,
    {
        self.permission_dao
            .grant_in(conn, list_id, user_id, ListRight::Owner)
            .await
    }
}

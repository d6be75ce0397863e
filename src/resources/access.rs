//! `/api/access`: users, groups and permissions.
//!
//! ```ignore
//! let admins = client.access().groups().get("admins").await?;
//! let users = client.access().users().list().await?;
//! let key = client.access().users().generate_api_key("alice").await?;
//! ```

use crate::client::OctoPrintClient;
use crate::client::utils::join_path;
use crate::error::Result;
use crate::model::{null_as_default, one_or_many, Extra};
use crate::protocol::paths;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Requirements a permission or group checks against an identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Needs {
    /// Roles required
    #[serde(default, deserialize_with = "one_or_many")]
    pub role: Vec<String>,
    /// Groups required
    #[serde(default, deserialize_with = "one_or_many")]
    pub group: Vec<String>,
    /// Other need kinds
    #[serde(flatten)]
    pub extra: Extra,
}

/// A permission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    /// Identifier, e.g. `FILES_UPLOAD`
    pub key: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Whether granting the permission is security relevant
    #[serde(default)]
    pub dangerous: bool,
    /// Groups that get this permission by default
    #[serde(default, deserialize_with = "one_or_many")]
    pub default_groups: Vec<String>,
    /// What a user needs to hold this permission
    #[serde(default, deserialize_with = "null_as_default")]
    pub needs: Needs,
    /// Fields not declared above
    #[serde(flatten)]
    pub extra: Extra,
}

/// A user group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Identifier, e.g. `admins`
    pub key: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Keys of the permissions granted by the group
    #[serde(default, deserialize_with = "one_or_many")]
    pub permissions: Vec<String>,
    /// Keys of the groups included in this group
    #[serde(default, deserialize_with = "one_or_many")]
    pub subgroups: Vec<String>,
    /// Needs granted by membership
    #[serde(default, deserialize_with = "null_as_default")]
    pub needs: Needs,
    /// Whether new users join this group
    #[serde(default)]
    pub default: bool,
    /// Whether the group can be deleted
    #[serde(default)]
    pub removable: bool,
    /// Whether permissions can be edited
    #[serde(default)]
    pub changeable: bool,
    /// Whether users may be added or removed
    #[serde(default)]
    pub toggleable: bool,
    /// Whether the group grants dangerous permissions
    #[serde(default)]
    pub dangerous: bool,
    /// Unknown fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// A user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Login name
    pub name: String,
    /// Whether the account may log in
    #[serde(default)]
    pub active: bool,
    /// Whether the user has the admin role
    #[serde(default)]
    pub admin: bool,
    /// The user's personal API key
    pub apikey: Option<String>,
    /// Per-user settings (keys normalized)
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: Extra,
    /// Group keys
    #[serde(default, deserialize_with = "one_or_many")]
    pub groups: Vec<String>,
    /// Permissions granted directly, not through groups
    #[serde(default, deserialize_with = "one_or_many")]
    pub permissions: Vec<String>,
    /// Effective needs from permissions and groups
    #[serde(default, deserialize_with = "null_as_default")]
    pub needs: Needs,
    /// Legacy roles
    #[serde(default, deserialize_with = "one_or_many")]
    pub roles: Vec<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Fields of a new user.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    /// Login name
    pub name: String,
    /// Initial password
    pub password: String,
    /// Whether the account may log in right away
    pub active: bool,
    /// Group keys, server default when empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    /// Permissions granted directly
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

impl NewUser {
    /// An active user with default groups.
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            active: true,
            groups: Vec::new(),
            permissions: Vec::new(),
        }
    }
}

/// Changes to an existing user. Unset fields stay untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    /// Enable or disable the account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Grant or revoke admin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    /// Replace group memberships
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    /// Replace direct permissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

/// Fields of a new group.
#[derive(Debug, Clone, Serialize)]
pub struct NewGroup {
    /// Unique identifier
    pub key: String,
    /// Display name
    pub name: String,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Permission keys granted to members
    pub permissions: Vec<String>,
    /// Group keys included in this group
    pub subgroups: Vec<String>,
    /// Whether new users join this group
    pub default: bool,
}

impl NewGroup {
    /// A group without permissions.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: None,
            permissions: Vec::new(),
            subgroups: Vec::new(),
            default: false,
        }
    }
}

/// Changes to an existing group. Unset fields stay untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupUpdate {
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replace permission keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    /// Replace subgroup keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subgroups: Option<Vec<String>>,
    /// Whether new users join this group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct PermissionList {
    #[serde(default)]
    permissions: Vec<Permission>,
}

#[derive(Debug, Deserialize)]
struct GroupList {
    #[serde(default)]
    groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
struct UserList {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct ApiKey {
    apikey: Option<String>,
}

#[derive(Debug, Serialize)]
struct PasswordChange<'a> {
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<&'a str>,
}

/// Handle for the access control endpoints.
pub struct AccessApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> AccessApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// Permissions.
    pub fn permissions(&self) -> PermissionsApi<'a> {
        PermissionsApi {
            client: self.client,
        }
    }

    /// Groups.
    pub fn groups(&self) -> GroupsApi<'a> {
        GroupsApi {
            client: self.client,
        }
    }

    /// Users.
    pub fn users(&self) -> UsersApi<'a> {
        UsersApi {
            client: self.client,
        }
    }
}

/// `/api/access/permissions`
pub struct PermissionsApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> PermissionsApi<'a> {
    /// All registered permissions.
    pub async fn list(&self) -> Result<Vec<Permission>> {
        let list: PermissionList = self.client.get(paths::PERMISSIONS).await?;
        Ok(list.permissions)
    }
}

/// `/api/access/groups`
///
/// Mutating calls answer with the full, updated group list.
pub struct GroupsApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> GroupsApi<'a> {
    /// All groups.
    pub async fn list(&self) -> Result<Vec<Group>> {
        let list: GroupList = self.client.get(paths::GROUPS).await?;
        Ok(list.groups)
    }

    /// A single group.
    pub async fn get(&self, key: &str) -> Result<Group> {
        self.client.get(&self.path(key)).await
    }

    /// Create a group.
    pub async fn create(&self, group: &NewGroup) -> Result<Vec<Group>> {
        let list: GroupList = self.client.post(paths::GROUPS, group).await?;
        Ok(list.groups)
    }

    /// Update a group.
    pub async fn update(&self, key: &str, update: &GroupUpdate) -> Result<Vec<Group>> {
        let list: GroupList = self.client.put(&self.path(key), update).await?;
        Ok(list.groups)
    }

    /// Delete a group.
    pub async fn delete(&self, key: &str) -> Result<Vec<Group>> {
        let list: GroupList = self.client.delete(&self.path(key)).await?;
        Ok(list.groups)
    }

    fn path(&self, key: &str) -> String {
        join_path(&[paths::GROUPS, key])
    }
}

/// `/api/access/users`
///
/// Mutating calls answer with the full, updated user list.
pub struct UsersApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> UsersApi<'a> {
    /// All users.
    pub async fn list(&self) -> Result<Vec<User>> {
        let list: UserList = self.client.get(paths::USERS).await?;
        Ok(list.users)
    }

    /// A single user.
    pub async fn get(&self, name: &str) -> Result<User> {
        self.client.get(&self.path(&[name])).await
    }

    /// Create a user.
    pub async fn create(&self, user: &NewUser) -> Result<Vec<User>> {
        let list: UserList = self.client.post(paths::USERS, user).await?;
        Ok(list.users)
    }

    /// Update a user.
    pub async fn update(&self, name: &str, update: &UserUpdate) -> Result<Vec<User>> {
        let list: UserList = self.client.put(&self.path(&[name]), update).await?;
        Ok(list.users)
    }

    /// Delete a user.
    pub async fn delete(&self, name: &str) -> Result<Vec<User>> {
        let list: UserList = self.client.delete(&self.path(&[name])).await?;
        Ok(list.users)
    }

    /// Change a user's password. Non-admins must pass their `current` one.
    pub async fn change_password(
        &self,
        name: &str,
        password: &str,
        current: Option<&str>,
    ) -> Result<()> {
        let body = serde_json::to_value(PasswordChange { password, current })?;
        self.client
            .send(Method::PUT, &self.path(&[name, "password"]), &[], Some(body))
            .await?;
        Ok(())
    }

    /// A user's personal settings.
    pub async fn settings(&self, name: &str) -> Result<Extra> {
        self.client.get(&self.path(&[name, "settings"])).await
    }

    /// Merge `settings` (camelCase keys) into a user's personal settings.
    pub async fn update_settings(&self, name: &str, settings: &Value) -> Result<()> {
        self.client
            .send(
                Method::PATCH,
                &self.path(&[name, "settings"]),
                &[],
                Some(settings.clone()),
            )
            .await?;
        Ok(())
    }

    /// Generate a new personal API key and return it.
    pub async fn generate_api_key(&self, name: &str) -> Result<Option<String>> {
        let key: ApiKey = self
            .client
            .post(&self.path(&[name, "apikey"]), &serde_json::json!({}))
            .await?;
        Ok(key.apikey)
    }

    /// Remove a user's personal API key.
    pub async fn delete_api_key(&self, name: &str) -> Result<()> {
        self.client
            .send(Method::DELETE, &self.path(&[name, "apikey"]), &[], None)
            .await?;
        Ok(())
    }

    fn path(&self, parts: &[&str]) -> String {
        let mut all = vec![paths::USERS];
        all.extend_from_slice(parts);
        join_path(&all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decode;
    use serde_json::json;

    #[test]
    fn test_decode_group() {
        let group: Group = decode(json!({
            "key": "users",
            "name": "Operator",
            "description": "Default group for users",
            "permissions": ["STATUS", "CONNECTION", "FILES_LIST"],
            "subgroups": [],
            "needs": {"role": ["status", "connection", "files_list"]},
            "default": true,
            "removable": false,
            "changeable": true,
            "toggleable": true
        }))
        .unwrap();

        assert_eq!(group.permissions.len(), 3);
        assert!(group.subgroups.is_empty());
        assert_eq!(group.needs.role[0], "status");
        assert!(group.default && !group.removable);
    }

    #[test]
    fn test_decode_user_with_single_group() {
        let user: User = decode(json!({
            "name": "alice",
            "active": true,
            "apikey": null,
            "groups": "users",
            "settings": {"interface": {"color": "blue"}},
            "needs": null,
            "lastLogin": 1700000000
        }))
        .unwrap();

        assert_eq!(user.groups, vec!["users"]);
        assert!(user.permissions.is_empty());
        assert!(user.apikey.is_none());
        assert_eq!(user.settings["interface"]["color"], "blue");
        assert_eq!(user.extra["last_login"], json!(1700000000));
    }

    #[test]
    fn test_update_bodies_skip_unset() {
        let update = UserUpdate {
            active: Some(false),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"active": false}));

        let body = serde_json::to_value(PasswordChange {
            password: "new",
            current: None,
        })
        .unwrap();
        assert_eq!(body, json!({"password": "new"}));
    }
}

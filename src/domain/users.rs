use serde::{Deserialize, Serialize};

use super::ship::EntityId;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleDto {
    pub id: EntityId,
    pub code: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserDto {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: RoleDto,
}

impl UserDto {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserFormMode {
    Create,
    Update,
}

/// Editable user fields. `id` is set when editing an existing user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserForm {
    pub id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role_id: String,
}

impl UserForm {
    pub fn mode(&self) -> UserFormMode {
        if self.id.is_some() {
            UserFormMode::Update
        } else {
            UserFormMode::Create
        }
    }

    /// Update form for an existing user; the password starts blank and is only sent if typed.
    pub fn edit(user: &UserDto) -> Self {
        Self {
            id: Some(user.id.clone()),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password: String::new(),
            role_id: user.role.id.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_form_keeps_role_and_blanks_password() {
        let user = UserDto {
            id: "u-7".into(),
            first_name: "Aicha".into(),
            last_name: "Ba".into(),
            email: "aicha@navlion.mr".into(),
            role: RoleDto {
                id: "r-1".into(),
                code: "ADMIN".into(),
            },
        };
        let form = UserForm::edit(&user);
        assert_eq!(form.mode(), UserFormMode::Update);
        assert_eq!(form.role_id, "r-1");
        assert!(form.password.is_empty());
        assert_eq!(user.full_name(), "Aicha Ba");
        assert_eq!(UserForm::default().mode(), UserFormMode::Create);
    }

    #[test]
    fn request_skips_missing_password() {
        let request = UserRequest {
            first_name: "A".into(),
            last_name: "B".into(),
            email: "a@b.mr".into(),
            password: None,
            role_id: "r".into(),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(body["roleId"], "r");
    }
}

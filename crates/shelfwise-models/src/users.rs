//! Patron records and DTOs.

use serde::{Deserialize, Serialize};
use shelfwise_core::serde::deserialize_optional_string;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::{ModelError, require};

pub const DEFAULT_DEPARTMENT: &str = "General";
pub const DEFAULT_SEMESTER: &str = "N/A";

fn default_department() -> String {
    DEFAULT_DEPARTMENT.to_string()
}

fn default_semester() -> String {
    DEFAULT_SEMESTER.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub semester: String,
}

impl User {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        department: impl Into<String>,
        semester: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let user = Self {
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            department: department.into(),
            semester: semester.into(),
        };

        require(&user.user_id, "user_id")?;
        require(&user.name, "name")?;

        Ok(user)
    }

    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.email.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 64))]
    pub user_id: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[serde(default = "default_department")]
    #[validate(length(min = 1, max = 100))]
    pub department: String,
    #[serde(default = "default_semester")]
    #[validate(length(min = 1, max = 16))]
    pub semester: String,
}

impl TryFrom<CreateUserDto> for User {
    type Error = ModelError;

    fn try_from(dto: CreateUserDto) -> Result<Self, Self::Error> {
        User::new(
            dto.user_id.trim(),
            dto.name,
            dto.email,
            dto.phone,
            dto.department,
            dto.semester,
        )
    }
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct UserFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub department: Option<String>,
    /// Case-insensitive match on name or email
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
}

impl UserFilterParams {
    pub fn matches(&self, user: &User) -> bool {
        self.department
            .as_ref()
            .is_none_or(|department| &user.department == department)
            && self
                .search
                .as_ref()
                .is_none_or(|needle| user.matches_search(needle))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentsResponse {
    pub departments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dto_defaults() {
        let dto: CreateUserDto = serde_json::from_str(
            r#"{"user_id":"U1","name":"Asha Rao","email":"asha@example.com","phone":"98765"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.department, "General");
        assert_eq!(dto.semester, "N/A");
    }

    #[test]
    fn test_create_dto_rejects_bad_email() {
        let dto: CreateUserDto = serde_json::from_str(
            r#"{"user_id":"U1","name":"Asha","email":"not-an-email","phone":"1"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_new_rejects_blank_name() {
        assert_eq!(
            User::new("U1", "", "a@b.c", "1", "General", "1"),
            Err(ModelError::Blank("name"))
        );
    }

    #[test]
    fn test_filter_by_department_and_search() {
        let user = User::new("U1", "Asha Rao", "asha@example.com", "1", "MBA", "2").unwrap();

        let filter = UserFilterParams {
            department: Some("MBA".to_string()),
            search: Some("EXAMPLE".to_string()),
        };
        assert!(filter.matches(&user));

        let other = UserFilterParams {
            department: Some("Civil".to_string()),
            search: None,
        };
        assert!(!other.matches(&user));
    }
}

use chrono::NaiveDate;
use serde::Deserialize;

use userbook_core::{DOB_FORMAT, DomainResult, User, UserDraft};

// -------------------------
// Request DTOs
// -------------------------

/// Body of create and update. Fields are optional so that a missing field is
/// reported by validation rather than as a malformed body.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub name: Option<String>,
    pub dob: Option<String>,
}

impl UserPayload {
    pub fn into_draft(self) -> DomainResult<UserDraft> {
        UserDraft::parse(self.name.as_deref(), self.dob.as_deref())
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// `{id, name, dob}` for create/update responses.
pub fn user_to_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id.get(),
        "name": user.name,
        "dob": user.date_of_birth.format(DOB_FORMAT).to_string(),
    })
}

/// `{id, name, dob, age}` for read responses; `age` is computed against `today`.
pub fn user_view_to_json(user: &User, today: NaiveDate) -> serde_json::Value {
    serde_json::json!({
        "id": user.id.get(),
        "name": user.name,
        "dob": user.date_of_birth.format(DOB_FORMAT).to_string(),
        "age": user.age_on(today),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use userbook_core::UserId;

    fn user() -> User {
        User {
            id: UserId::new(7),
            name: "Ada".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 6, 15).unwrap(),
        }
    }

    #[test]
    fn plain_user_has_no_age() {
        let json = user_to_json(&user());
        assert_eq!(json, serde_json::json!({"id": 7, "name": "Ada", "dob": "2000-06-15"}));
    }

    #[test]
    fn view_carries_age_for_today() {
        let json = user_view_to_json(&user(), NaiveDate::from_ymd_opt(2024, 6, 14).unwrap());
        assert_eq!(json["age"], 23);
        assert_eq!(json["dob"], "2000-06-15");
    }

    #[test]
    fn null_fields_deserialize_as_missing() {
        let payload: UserPayload = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert!(payload.name.is_none() && payload.dob.is_none());
        assert!(payload.into_draft().is_err());
    }
}

//! The user entity and its validated write form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::age::age_on;
use crate::error::{DomainError, DomainResult};
use crate::id::UserId;

/// Wire/storage format of a date of birth (`YYYY-MM-DD`).
pub const DOB_FORMAT: &str = "%Y-%m-%d";

const MSG_NAME_REQUIRED: &str = "name is required";
const MSG_DOB_REQUIRED: &str = "dob is required";
const MSG_DOB_FORMAT: &str = "invalid dob format (YYYY-MM-DD)";

/// A persisted user.
///
/// Invariant: `name` is non-empty. `id` is assigned by the store and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub date_of_birth: NaiveDate,
}

impl User {
    /// Age in completed years as of `today`. Recomputed on every read.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        age_on(self.date_of_birth, today)
    }
}

/// Validated input for creating or replacing a user.
///
/// Only constructible through [`UserDraft::parse`] (or [`UserDraft::new`]
/// for already-typed values), so a draft handed to a store always satisfies
/// the `User` invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    name: String,
    date_of_birth: NaiveDate,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, date_of_birth: NaiveDate) -> DomainResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::validation(MSG_NAME_REQUIRED));
        }
        Ok(Self { name, date_of_birth })
    }

    /// Validate raw request fields.
    ///
    /// Required-field failures are reported together (`"; "`-joined). A
    /// present but malformed `dob` is reported separately with the expected
    /// format.
    pub fn parse(name: Option<&str>, dob: Option<&str>) -> DomainResult<Self> {
        let name = name.filter(|n| !n.is_empty());
        let dob = dob.filter(|d| !d.is_empty());

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push(MSG_NAME_REQUIRED);
        }
        if dob.is_none() {
            missing.push(MSG_DOB_REQUIRED);
        }

        match (name, dob) {
            (Some(name), Some(dob)) => {
                let date_of_birth = parse_dob(dob)?;
                Ok(Self {
                    name: name.to_string(),
                    date_of_birth,
                })
            }
            _ => Err(DomainError::validation(missing.join("; "))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    /// Materialize the draft as a stored user with the given id.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            date_of_birth: self.date_of_birth,
        }
    }
}

/// Parse a strict `DDDD-DD-DD` calendar date.
///
/// chrono's `%Y`/`%m`/`%d` accept unpadded and signed fields, so the shape is
/// checked first.
pub fn parse_dob(raw: &str) -> DomainResult<NaiveDate> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(DomainError::validation(MSG_DOB_FORMAT));
    }

    NaiveDate::parse_from_str(raw, DOB_FORMAT).map_err(|_| DomainError::validation(MSG_DOB_FORMAT))
}

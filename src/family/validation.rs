//! Input validation for the person and tree payloads.
//!
//! Each validator returns every problem it finds as a [`FieldError`] list
//! instead of stopping at the first one.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::relations::MAX_PARENTS;
use super::types::{NewPerson, PersonUpdate};

const NAME_MAX_CHARS: usize = 50;
const PLACE_MAX_CHARS: usize = 100;
const NOTES_MAX_CHARS: usize = 1000;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?\d{1,16}$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid email regex")
});
static URI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S+$").expect("valid uri regex"));

/// Most founders a tree can be initialized with.
pub const MAX_ROOT_PERSONS: usize = 2;

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path of the offending field, e.g. `parents.1.firstName`.
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// `true` for a canonical hyphenated UUID string.
pub fn is_person_id(id: &str) -> bool {
    id.len() == 36 && uuid::Uuid::try_parse(id).is_ok()
}

/// Validate an id taken from a path or body field.
pub fn validate_person_id(field: &str, id: &str) -> Result<(), Vec<FieldError>> {
    if is_person_id(id) {
        Ok(())
    } else {
        Err(vec![FieldError::new(field, "must be a valid UUID")])
    }
}

pub fn validate_new_person(input: &NewPerson) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_new_person("", input, &mut errors);
    finish(errors)
}

pub fn validate_person_update(update: &PersonUpdate) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if let Some(first) = &update.first_name {
        check_name("firstName", first, &mut errors);
    }
    if let Some(last) = &update.last_name {
        check_name("lastName", last, &mut errors);
    }
    check_attributes(
        "",
        Attributes {
            email: update.email.as_deref(),
            date_of_birth: update.date_of_birth.as_deref(),
            place_of_birth: update.place_of_birth.as_deref(),
            phone_number: update.phone_number.as_deref(),
            profile_photo: update.profile_photo.as_deref(),
            notes: update.notes.as_deref(),
        },
        &mut errors,
    );
    finish(errors)
}

/// Validate the founders passed to tree initialization: one or two
/// well-formed person payloads.
pub fn validate_initialize(parents: &[NewPerson]) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if parents.is_empty() || parents.len() > MAX_ROOT_PERSONS {
        errors.push(FieldError::new(
            "parents",
            format!("must contain between 1 and {MAX_ROOT_PERSONS} persons"),
        ));
    }
    for (i, parent) in parents.iter().enumerate() {
        check_new_person(&format!("parents.{i}."), parent, &mut errors);
    }
    finish(errors)
}

struct Attributes<'a> {
    email: Option<&'a str>,
    date_of_birth: Option<&'a str>,
    place_of_birth: Option<&'a str>,
    phone_number: Option<&'a str>,
    profile_photo: Option<&'a str>,
    notes: Option<&'a str>,
}

fn check_new_person(prefix: &str, input: &NewPerson, errors: &mut Vec<FieldError>) {
    check_name(&format!("{prefix}firstName"), &input.first_name, errors);
    check_name(&format!("{prefix}lastName"), &input.last_name, errors);
    check_attributes(
        prefix,
        Attributes {
            email: input.email.as_deref(),
            date_of_birth: input.date_of_birth.as_deref(),
            place_of_birth: input.place_of_birth.as_deref(),
            phone_number: input.phone_number.as_deref(),
            profile_photo: input.profile_photo.as_deref(),
            notes: input.notes.as_deref(),
        },
        errors,
    );

    if input.parent_ids.len() > MAX_PARENTS {
        errors.push(FieldError::new(
            format!("{prefix}parentIds"),
            format!("must contain at most {MAX_PARENTS} entries"),
        ));
    }
    for (i, id) in input.parent_ids.iter().enumerate() {
        if !is_person_id(id) {
            errors.push(FieldError::new(
                format!("{prefix}parentIds.{i}"),
                "must be a valid UUID",
            ));
        } else if input.parent_ids[..i].contains(id) {
            errors.push(FieldError::new(
                format!("{prefix}parentIds.{i}"),
                "duplicate parent id",
            ));
        }
    }
    if let Some(spouse) = &input.spouse_id {
        if !is_person_id(spouse) {
            errors.push(FieldError::new(
                format!("{prefix}spouseId"),
                "must be a valid UUID",
            ));
        }
    }
}

fn check_name(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    let len = value.chars().count();
    if len == 0 {
        errors.push(FieldError::new(field, "is required"));
    } else if len > NAME_MAX_CHARS {
        errors.push(FieldError::new(
            field,
            format!("must be at most {NAME_MAX_CHARS} characters"),
        ));
    }
}

fn check_attributes(prefix: &str, attrs: Attributes<'_>, errors: &mut Vec<FieldError>) {
    if let Some(email) = attrs.email {
        if !EMAIL_RE.is_match(email) {
            errors.push(FieldError::new(
                format!("{prefix}email"),
                "must be a valid email address",
            ));
        }
    }
    if let Some(date) = attrs.date_of_birth {
        if !is_date(date) {
            errors.push(FieldError::new(
                format!("{prefix}dateOfBirth"),
                "must be a date (YYYY-MM-DD or RFC 3339)",
            ));
        }
    }
    if let Some(place) = attrs.place_of_birth {
        if place.chars().count() > PLACE_MAX_CHARS {
            errors.push(FieldError::new(
                format!("{prefix}placeOfBirth"),
                format!("must be at most {PLACE_MAX_CHARS} characters"),
            ));
        }
    }
    if let Some(phone) = attrs.phone_number {
        if !PHONE_RE.is_match(phone) {
            errors.push(FieldError::new(
                format!("{prefix}phoneNumber"),
                "must be up to 16 digits with an optional leading +",
            ));
        }
    }
    if let Some(photo) = attrs.profile_photo {
        if !URI_RE.is_match(photo) {
            errors.push(FieldError::new(
                format!("{prefix}profilePhoto"),
                "must be a valid URI",
            ));
        }
    }
    if let Some(notes) = attrs.notes {
        if notes.chars().count() > NOTES_MAX_CHARS {
            errors.push(FieldError::new(
                format!("{prefix}notes"),
                format!("must be at most {NOTES_MAX_CHARS} characters"),
            ));
        }
    }
}

fn is_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() || DateTime::parse_from_rfc3339(value).is_ok()
}

fn finish(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Field rules gating construction of a [`RegistrationRecord`].
//!
//! Every rule runs independently, so one call reports every failing field.
//! Enumerated fields are checked against the same option lists the form
//! renders its dropdowns from.

use std::{collections::BTreeMap, str::FromStr, sync::LazyLock};

use serde::{Deserialize, Serialize};
use regex::Regex;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::{
    Degree, District, Domain, RegistrationRecord, UnknownOption, YearOfPassingOut, ROW_WIDTH,
};

pub const NAME_TOO_SHORT: &str = "Min 2 characters long";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const INVALID_CONTACT: &str = "Invalid Contact";

// Dotted domain ending in two or more letters; no IP literals.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .expect("email pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Contact,
    College,
    Degree,
    Domain,
    YearOfPassingOut,
    Location,
}

impl Field {
    /// Column order of the record store.
    pub const ALL: [Field; ROW_WIDTH] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Contact,
        Field::College,
        Field::Degree,
        Field::Domain,
        Field::YearOfPassingOut,
        Field::Location,
    ];

    /// Name used by the HTML form and by the validator.
    pub fn name(self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Email => "email",
            Field::Contact => "contact",
            Field::College => "college",
            Field::Degree => "degree",
            Field::Domain => "domain",
            Field::YearOfPassingOut => "year_of_passing_out",
            Field::Location => "location",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Email => "Email",
            Field::Contact => "Contact",
            Field::College => "College",
            Field::Degree => "Degree",
            Field::Domain => "Domain",
            Field::YearOfPassingOut => "Year Of Passing Out",
            Field::Location => "Location",
        }
    }

    /// Expected header of this field's column in the sheet.
    pub fn column(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Contact => "contact",
            Field::College => "college",
            Field::Degree => "degree",
            Field::Domain => "domain",
            Field::YearOfPassingOut => "yearOfPassingOut",
            Field::Location => "location",
        }
    }

    /// What the form shows under a field that failed its rule.
    pub fn failure_message(self) -> String {
        match self {
            Field::FirstName | Field::LastName => NAME_TOO_SHORT.to_string(),
            Field::Email => INVALID_EMAIL.to_string(),
            Field::Contact => INVALID_CONTACT.to_string(),
            Field::College => "Invalid college".to_string(),
            Field::Degree | Field::Domain | Field::YearOfPassingOut | Field::Location => {
                format!("Select a valid {}", self.label().to_lowercase())
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// One human-readable message per failing field, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid registration: {}", self.summary())]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    // The first message recorded for a field wins.
    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    fn summary(&self) -> String {
        self.iter()
            .map(|(field, message)| format!("{}: {message}", field.name()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(value: ValidationErrors) -> Self {
        let mut errors = FieldErrors::default();
        for (name, failures) in value.field_errors() {
            let Some(field) = Field::from_name(&name) else {
                continue;
            };
            if !failures.is_empty() {
                errors.insert(field, field.failure_message());
            }
        }
        errors
    }
}

/// The form as submitted. Missing inputs decode as empty strings so they
/// surface as field errors rather than as a rejected request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RawFormInput {
    #[validate(length(min = 2))]
    pub first_name: String,
    #[validate(length(min = 2))]
    pub last_name: String,
    #[validate(email, custom(function = "dotted_email"))]
    pub email: String,
    // Length only; digits are not enforced.
    #[validate(length(equal = 10))]
    pub contact: String,
    pub college: String,
    #[validate(custom(function = "known_degree"))]
    pub degree: String,
    #[validate(custom(function = "known_domain"))]
    pub domain: String,
    #[validate(custom(function = "known_year"))]
    pub year_of_passing_out: String,
    #[validate(custom(function = "known_district"))]
    pub location: String,
}

impl RawFormInput {
    /// What a fresh form shows: empty text inputs, dropdowns on their first option.
    pub fn initial() -> Self {
        Self {
            degree: Degree::default().to_string(),
            domain: Domain::default().to_string(),
            year_of_passing_out: YearOfPassingOut::default().to_string(),
            location: District::default().to_string(),
            ..Self::default()
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Contact => &self.contact,
            Field::College => &self.college,
            Field::Degree => &self.degree,
            Field::Domain => &self.domain,
            Field::YearOfPassingOut => &self.year_of_passing_out,
            Field::Location => &self.location,
        }
    }
}

fn known_option<T>(value: &str) -> Result<(), ValidationError>
where
    T: FromStr<Err = UnknownOption>,
{
    value.parse::<T>().map(|_| ()).map_err(|unknown| {
        let mut error = ValidationError::new("unknown_option");
        error.add_param("value".into(), &unknown.value);
        error
    })
}

fn known_degree(value: &str) -> Result<(), ValidationError> {
    known_option::<Degree>(value)
}

fn known_domain(value: &str) -> Result<(), ValidationError> {
    known_option::<Domain>(value)
}

fn known_year(value: &str) -> Result<(), ValidationError> {
    known_option::<YearOfPassingOut>(value)
}

fn known_district(value: &str) -> Result<(), ValidationError> {
    known_option::<District>(value)
}

// The `email` rule alone lets through dotless domains, IP literals and `..`.
fn dotted_email(value: &str) -> Result<(), ValidationError> {
    if value.starts_with('.') || value.contains("..") || !EMAIL_SHAPE.is_match(value) {
        return Err(ValidationError::new("email_shape"));
    }
    Ok(())
}

/// Checks every field of `candidate` and builds the record only if all pass.
pub fn validate(candidate: RawFormInput) -> Result<RegistrationRecord, FieldErrors> {
    let errors = match Validate::validate(&candidate) {
        Ok(()) => FieldErrors::default(),
        Err(failures) => FieldErrors::from(failures),
    };

    // Membership was checked by the derive; these only unwrap the parse.
    let degree = candidate.degree.parse::<Degree>().ok();
    let domain = candidate.domain.parse::<Domain>().ok();
    let year_of_passing_out = candidate.year_of_passing_out.parse::<YearOfPassingOut>().ok();
    let location = candidate.location.parse::<District>().ok();

    match (degree, domain, year_of_passing_out, location) {
        (Some(degree), Some(domain), Some(year_of_passing_out), Some(location))
            if errors.is_empty() =>
        {
            let RawFormInput {
                first_name,
                last_name,
                email,
                contact,
                college,
                ..
            } = candidate;
            Ok(RegistrationRecord {
                first_name,
                last_name,
                email,
                contact,
                college,
                degree,
                domain,
                year_of_passing_out,
                location,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
#[path = "tests/schema_tests.rs"]
mod tests;

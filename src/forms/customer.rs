//! Customer create/edit form: sanitising, presence checks and mapping of
//! storage constraint codes back to the offending field.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::domain::customer::{Customer, CustomerFields, NewCustomer, UpdateCustomer};
use crate::forms::{FormError, strip_markup};
use crate::repository::errors::Constraint;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
/// Raw customer form as submitted by the modal.
pub struct CustomerForm {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: String,
    #[validate(length(min = 1, message = "E-mail é obrigatório"))]
    pub email: String,
    #[validate(length(min = 1, message = "Telefone é obrigatório"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Endereço é obrigatório"))]
    pub address: String,
    /// Parsed leniently; anything that is not an integer becomes 0.
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub feelings: String,
    #[serde(default)]
    pub values: String,
    #[serde(default)]
    pub other_info: String,
    /// Checkbox, present when ticked.
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default)]
    pub reviewed: Option<String>,
}

impl CustomerForm {
    /// Form prefilled with an existing record, for the edit modal.
    pub fn from_customer(customer: &Customer) -> Self {
        let note = |value: &Option<String>| value.clone().unwrap_or_default();
        let flag = |value: bool| value.then(|| "on".to_string());
        Self {
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            address: customer.address.clone(),
            age: customer.age.to_string(),
            interests: note(&customer.interests),
            feelings: note(&customer.feelings),
            values: note(&customer.values),
            other_info: note(&customer.other_info),
            active: flag(customer.active),
            reviewed: flag(customer.reviewed),
        }
    }

    /// Empty form for the create modal; new customers start active.
    pub fn blank() -> Self {
        Self {
            active: Some("on".to_string()),
            ..Self::default()
        }
    }

    /// Copy with markup stripped and surrounding whitespace trimmed.
    pub fn sanitized(&self) -> Self {
        let clean = |value: &str| strip_markup(value).trim().to_string();
        Self {
            name: clean(&self.name),
            email: clean(&self.email),
            phone: clean(&self.phone),
            address: clean(&self.address),
            age: self.age.trim().to_string(),
            interests: clean(&self.interests),
            feelings: clean(&self.feelings),
            values: clean(&self.values),
            other_info: clean(&self.other_info),
            active: self.active.clone(),
            reviewed: self.reviewed.clone(),
        }
    }
}

fn checked(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("on" | "true" | "1"))
}

fn optional(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Sanitised customer attributes ready for the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerPayload {
    pub fields: CustomerFields,
}

impl TryFrom<CustomerForm> for CustomerPayload {
    type Error = FormError;

    fn try_from(form: CustomerForm) -> Result<Self, Self::Error> {
        let form = form.sanitized();
        form.validate()?;

        let age = form.age.parse::<i32>().unwrap_or(0);
        let active = checked(&form.active);
        let reviewed = checked(&form.reviewed);

        Ok(Self {
            fields: CustomerFields {
                name: form.name,
                email: form.email,
                phone: form.phone,
                address: form.address,
                age,
                interests: optional(form.interests),
                feelings: optional(form.feelings),
                values: optional(form.values),
                other_info: optional(form.other_info),
                active,
                reviewed,
            },
        })
    }
}

impl CustomerPayload {
    pub fn into_new(self, created_at: NaiveDateTime) -> NewCustomer {
        NewCustomer::new(self.fields, created_at)
    }

    pub fn into_update(self) -> UpdateCustomer {
        UpdateCustomer::new(self.fields)
    }
}

/// Input of the customer form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CustomerField {
    Name,
    Email,
    Phone,
    Address,
    Age,
    Interests,
    Feelings,
    Values,
    OtherInfo,
}

impl CustomerField {
    /// Name of the input in the form.
    pub const fn key(self) -> &'static str {
        match self {
            CustomerField::Name => "name",
            CustomerField::Email => "email",
            CustomerField::Phone => "phone",
            CustomerField::Address => "address",
            CustomerField::Age => "age",
            CustomerField::Interests => "interests",
            CustomerField::Feelings => "feelings",
            CustomerField::Values => "values",
            CustomerField::OtherInfo => "other_info",
        }
    }
}

/// Every storage constraint the form knows, with the field it belongs to.
const CONSTRAINT_FIELDS: &[(Constraint, CustomerField, &str)] = &[
    (
        Constraint::CustomerEmailUnique,
        CustomerField::Email,
        "Este e-mail já está cadastrado",
    ),
    (
        Constraint::CustomerEmailFormat,
        CustomerField::Email,
        "E-mail inválido",
    ),
    (
        Constraint::CustomerNameLength,
        CustomerField::Name,
        "Nome deve ter entre 1 e 255 caracteres",
    ),
    (
        Constraint::CustomerPhoneLength,
        CustomerField::Phone,
        "Telefone deve ter entre 1 e 50 caracteres",
    ),
    (
        Constraint::CustomerAddressLength,
        CustomerField::Address,
        "Endereço deve ter entre 1 e 255 caracteres",
    ),
    (
        Constraint::CustomerAgeRange,
        CustomerField::Age,
        "Idade deve estar entre 1 e 150",
    ),
    (
        Constraint::CustomerInterestsLength,
        CustomerField::Interests,
        "Interesses devem ter no máximo 1000 caracteres",
    ),
    (
        Constraint::CustomerFeelingsLength,
        CustomerField::Feelings,
        "Sentimentos devem ter no máximo 1000 caracteres",
    ),
    (
        Constraint::CustomerValuesLength,
        CustomerField::Values,
        "Valores devem ter no máximo 1000 caracteres",
    ),
    (
        Constraint::CustomerOtherInfoLength,
        CustomerField::OtherInfo,
        "Outras informações devem ter no máximo 1000 caracteres",
    ),
];

/// Field that a storage constraint reports on, with its message.
pub fn field_for_constraint(constraint: Constraint) -> Option<(CustomerField, &'static str)> {
    CONSTRAINT_FIELDS
        .iter()
        .find(|(known, _, _)| *known == constraint)
        .map(|(_, field, message)| (*field, *message))
}

/// Write attempted through the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
    Delete,
}

impl WriteAction {
    /// Notification used when a failure cannot be tied to a field.
    pub const fn failure_message(self) -> &'static str {
        match self {
            WriteAction::Create => "Erro ao criar cliente",
            WriteAction::Update => "Erro ao atualizar cliente",
            WriteAction::Delete => "Erro ao deletar cliente",
        }
    }
}

/// Messages produced by a rejected write: per-field errors plus at most one
/// generic notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors {
    pub fields: BTreeMap<&'static str, String>,
    pub generic: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.generic.is_none()
    }

    /// Errors for a write the repository rejected. Known constraints map to
    /// exactly one field; anything else becomes the action's generic message.
    pub fn from_constraint(constraint: Option<Constraint>, action: WriteAction) -> Self {
        let mut errors = Self::default();
        match constraint.and_then(field_for_constraint) {
            Some((field, message)) => {
                errors.fields.insert(field.key(), message.to_string());
            }
            None => errors.generic = Some(action.failure_message().to_string()),
        }
        errors
    }

    /// Errors for a form that failed the presence checks.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut result = Self::default();
        for (field, field_errors) in errors.field_errors() {
            let key = match field.as_ref() {
                "name" => CustomerField::Name,
                "email" => CustomerField::Email,
                "phone" => CustomerField::Phone,
                "address" => CustomerField::Address,
                _ => continue,
            }
            .key();
            let message = field_errors
                .iter()
                .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Campo obrigatório".to_string());
            result.fields.insert(key, message);
        }
        result
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::CustomerId;

/// Customer record as stored by the registry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub age: i32,
    pub interests: Option<String>,
    pub feelings: Option<String>,
    pub values: Option<String>,
    pub other_info: Option<String>,
    pub active: bool,
    pub reviewed: bool,
    /// Assigned on insert and never changed afterwards.
    pub created_at: NaiveDateTime,
}

impl Customer {
    /// Label shown in the status column.
    pub fn status_label(&self) -> &'static str {
        if self.active { "Ativo" } else { "Inativo" }
    }
}

/// Editable customer attributes shared by inserts and updates.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct CustomerFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub age: i32,
    pub interests: Option<String>,
    pub feelings: Option<String>,
    pub values: Option<String>,
    pub other_info: Option<String>,
    pub active: bool,
    pub reviewed: bool,
}

impl CustomerFields {
    /// Trims every text attribute, lower-cases the email and maps blank notes
    /// to `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn note(value: Option<String>) -> Option<String> {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        }

        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            age: self.age,
            interests: note(self.interests),
            feelings: note(self.feelings),
            values: note(self.values),
            other_info: note(self.other_info),
            active: self.active,
            reviewed: self.reviewed,
        }
    }
}

/// Payload used to insert a new customer.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCustomer {
    pub fields: CustomerFields,
    pub created_at: NaiveDateTime,
}

impl NewCustomer {
    #[must_use]
    pub fn new(fields: CustomerFields, created_at: NaiveDateTime) -> Self {
        Self {
            fields: fields.normalized(),
            created_at,
        }
    }
}

/// Payload used to update an existing customer in place.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateCustomer {
    pub fields: CustomerFields,
}

impl UpdateCustomer {
    /// Saving an edit marks the record as reviewed.
    #[must_use]
    pub fn new(fields: CustomerFields) -> Self {
        let mut fields = fields.normalized();
        fields.reviewed = true;
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fields() -> CustomerFields {
        CustomerFields {
            name: "  Rafael Cerrone ".into(),
            email: " Rafael_Cerrone@Hotmail.com ".into(),
            phone: "11973900600".into(),
            address: "Rua A, 10".into(),
            age: 34,
            interests: Some("   ".into()),
            feelings: Some(" calmo ".into()),
            values: None,
            other_info: None,
            active: true,
            reviewed: false,
        }
    }

    #[test]
    fn new_customer_normalizes_fields() {
        let new = NewCustomer::new(fields(), Utc::now().naive_utc());
        assert_eq!(new.fields.name, "Rafael Cerrone");
        assert_eq!(new.fields.email, "rafael_cerrone@hotmail.com");
        assert_eq!(new.fields.interests, None);
        assert_eq!(new.fields.feelings.as_deref(), Some("calmo"));
        assert!(!new.fields.reviewed);
    }

    #[test]
    fn update_customer_forces_reviewed() {
        let update = UpdateCustomer::new(fields());
        assert!(update.fields.reviewed);
    }
}

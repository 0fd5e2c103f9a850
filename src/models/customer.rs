use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, NewCustomer as DomainNewCustomer,
    UpdateCustomer as DomainUpdateCustomer,
};
use crate::domain::types::{CustomerId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customers)]
/// Diesel model for [`crate::domain::customer::Customer`].
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub age: i32,
    pub interests: Option<String>,
    pub feelings: Option<String>,
    pub personal_values: Option<String>,
    pub other_info: Option<String>,
    pub active: bool,
    pub reviewed: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
/// Insertable form of [`Customer`].
pub struct NewCustomer<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub age: i32,
    pub interests: Option<&'a str>,
    pub feelings: Option<&'a str>,
    pub personal_values: Option<&'a str>,
    pub other_info: Option<&'a str>,
    pub active: bool,
    pub reviewed: bool,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Customer`] record.
pub struct UpdateCustomer<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub age: i32,
    pub interests: Option<&'a str>,
    pub feelings: Option<&'a str>,
    pub personal_values: Option<&'a str>,
    pub other_info: Option<&'a str>,
    pub active: bool,
    pub reviewed: bool,
}

impl TryFrom<Customer> for DomainCustomer {
    type Error = TypeConstraintError;

    fn try_from(customer: Customer) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CustomerId::try_from(customer.id)?,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            age: customer.age,
            interests: customer.interests,
            feelings: customer.feelings,
            values: customer.personal_values,
            other_info: customer.other_info,
            active: customer.active,
            reviewed: customer.reviewed,
            created_at: customer.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewCustomer> for NewCustomer<'a> {
    fn from(customer: &'a DomainNewCustomer) -> Self {
        let fields = &customer.fields;
        Self {
            name: fields.name.as_str(),
            email: fields.email.as_str(),
            phone: fields.phone.as_str(),
            address: fields.address.as_str(),
            age: fields.age,
            interests: fields.interests.as_deref(),
            feelings: fields.feelings.as_deref(),
            personal_values: fields.values.as_deref(),
            other_info: fields.other_info.as_deref(),
            active: fields.active,
            reviewed: fields.reviewed,
            created_at: customer.created_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateCustomer> for UpdateCustomer<'a> {
    fn from(customer: &'a DomainUpdateCustomer) -> Self {
        let fields = &customer.fields;
        Self {
            name: fields.name.as_str(),
            email: fields.email.as_str(),
            phone: fields.phone.as_str(),
            address: fields.address.as_str(),
            age: fields.age,
            interests: fields.interests.as_deref(),
            feelings: fields.feelings.as_deref(),
            personal_values: fields.values.as_deref(),
            other_info: fields.other_info.as_deref(),
            active: fields.active,
            reviewed: fields.reviewed,
        }
    }
}

//! Typed records built by the add forms.
//!
//! The session collects one [`Answer`] per [`FieldSpec`](crate::registry::FieldSpec)
//! of the active collection, then [`NewRecord::from_answers`] turns them into
//! the variant for that collection. Fields that are not prompted for, such as
//! an invoice's status, get their defaults here.

use serde::Serialize;
use serde_json::Value;

use crate::error::{DryCleaningError, Result};
use crate::registry::Collection;
use crate::store::Record;

/// Status every new invoice starts in.
pub const DEFAULT_INVOICE_STATUS: &str = "pending";

/// One answered form field.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Answer {
    /// Raw text line.
    Text(String),
    /// Parsed number.
    Number(f64),
    /// Items copied from the Items collection.
    Items(Vec<Record>),
}

/// Answers of one form, in prompt order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answers {
    /// `(field name, answer)` pairs.
    values: Vec<(&'static str, Answer)>,
}

impl Answers {
    /// Create an empty answer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the answer for `field`.
    pub fn push(&mut self, field: &'static str, answer: Answer) {
        self.values.push((field, answer));
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, field: &'static str, answer: Answer) -> Self {
        self.push(field, answer);
        self
    }

    fn take(&mut self, field: &str) -> Result<Answer> {
        let pos = self
            .values
            .iter()
            .position(|(name, _)| *name == field)
            .ok_or_else(|| DryCleaningError::Conversion(format!("missing field `{field}`")))?;
        Ok(self.values.remove(pos).1)
    }

    fn text(&mut self, field: &str) -> Result<String> {
        match self.take(field)? {
            Answer::Text(s) => Ok(s),
            other => Err(mismatch(field, "text", &other)),
        }
    }

    fn number(&mut self, field: &str) -> Result<f64> {
        match self.take(field)? {
            Answer::Number(n) => Ok(n),
            other => Err(mismatch(field, "number", &other)),
        }
    }

    fn items(&mut self, field: &str) -> Result<Vec<Record>> {
        match self.take(field)? {
            Answer::Items(items) => Ok(items),
            other => Err(mismatch(field, "item list", &other)),
        }
    }
}

fn mismatch(field: &str, expected: &str, got: &Answer) -> DryCleaningError {
    DryCleaningError::Conversion(format!("field `{field}` should be {expected}, got {got:?}"))
}

/// A customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Customer name.
    pub name: String,
    /// Contact email.
    pub email: String,
}

/// An order with the items it was created with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    /// Order name.
    pub name: String,
    /// Customer reference, not checked.
    pub customer_id: String,
    /// Order date as typed.
    pub date: String,
    /// Copies of Items records.
    pub items: Vec<Record>,
}

/// An invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    /// Order reference, not checked.
    pub order_id: String,
    /// Invoice name.
    pub name: String,
    /// Invoice date as typed.
    pub date: String,
    /// Payment status.
    pub status: String,
}

/// A priced service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    /// Service name.
    pub name: String,
    /// Price.
    pub price: f64,
}

/// An employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    /// Employee name.
    pub name: String,
    /// Job title.
    pub position: String,
}

/// A priced garment type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    /// Item name, used by orders to look it up.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Price.
    pub price: f64,
}

/// A record about to be inserted, one variant per collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum NewRecord {
    /// For [`Collection::Customers`].
    Customer(Customer),
    /// For [`Collection::Orders`].
    Order(Order),
    /// For [`Collection::Invoices`].
    Invoice(Invoice),
    /// For [`Collection::Services`].
    Service(Service),
    /// For [`Collection::Employees`].
    Employee(Employee),
    /// For [`Collection::Items`].
    Item(Item),
}

impl NewRecord {
    /// Build the record for `collection` from its form answers.
    pub fn from_answers(collection: Collection, mut answers: Answers) -> Result<Self> {
        let a = &mut answers;
        Ok(match collection {
            Collection::Customers => Self::Customer(Customer {
                name: a.text("name")?,
                email: a.text("email")?,
            }),
            Collection::Orders => Self::Order(Order {
                name: a.text("name")?,
                customer_id: a.text("customer_id")?,
                date: a.text("date")?,
                items: a.items("items")?,
            }),
            Collection::Invoices => Self::Invoice(Invoice {
                order_id: a.text("order_id")?,
                name: a.text("name")?,
                date: a.text("date")?,
                status: DEFAULT_INVOICE_STATUS.to_string(),
            }),
            Collection::Services => Self::Service(Service {
                name: a.text("name")?,
                price: a.number("price")?,
            }),
            Collection::Employees => Self::Employee(Employee {
                name: a.text("name")?,
                position: a.text("position")?,
            }),
            Collection::Items => Self::Item(Item {
                name: a.text("name")?,
                description: a.text("description")?,
                price: a.number("price")?,
            }),
        })
    }

    /// Collection this record belongs to.
    pub const fn collection(&self) -> Collection {
        match self {
            Self::Customer(_) => Collection::Customers,
            Self::Order(_) => Collection::Orders,
            Self::Invoice(_) => Collection::Invoices,
            Self::Service(_) => Collection::Services,
            Self::Employee(_) => Collection::Employees,
            Self::Item(_) => Collection::Items,
        }
    }

    /// Field map in declaration order, ready for the store.
    pub fn into_record(self) -> Result<Record> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(DryCleaningError::Conversion(format!(
                "record serialized to a non-object: {other}"
            ))),
        }
    }
}

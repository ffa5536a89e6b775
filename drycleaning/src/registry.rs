//! The six collections and the menu numbers that select them.

use std::fmt;

use crate::error::{DryCleaningError, Result};

/// Menu number that leaves the program from the collection menu.
pub const EXIT_CHOICE: i64 = 7;

/// A document collection of the dry-cleaning database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Collection {
    /// People who bring clothes in.
    Customers,
    /// Drop-offs, each embedding the items it contains.
    Orders,
    /// Bills raised against orders.
    Invoices,
    /// Priced services (washing, pressing, ...).
    Services,
    /// Staff.
    Employees,
    /// Priced garment types that orders embed.
    Items,
}

/// What the operator picked at the collection menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CollectionChoice {
    /// Work with one collection.
    Open(Collection),
    /// Leave the program.
    Exit,
}

/// A field captured by a collection's add form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key stored in the record.
    pub name: &'static str,
    /// Prompt shown to the operator.
    pub prompt: &'static str,
    /// How the answer is parsed.
    pub kind: FieldKind,
}

/// Parse rule for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FieldKind {
    /// Raw line of text.
    Text,
    /// Double-precision number.
    Number,
    /// Items looked up by name and embedded.
    EmbeddedItems,
}

const fn text(name: &'static str, prompt: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        prompt,
        kind: FieldKind::Text,
    }
}

const fn number(name: &'static str, prompt: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        prompt,
        kind: FieldKind::Number,
    }
}

const CUSTOMER_FIELDS: &[FieldSpec] = &[
    text("name", "Enter customer name:"),
    text("email", "Enter customer email:"),
];

const ORDER_FIELDS: &[FieldSpec] = &[
    text("name", "Enter order name:"),
    text("customer_id", "Enter customer ID:"),
    text("date", "Enter order date (YYYY-MM-DD):"),
    FieldSpec {
        name: "items",
        prompt: "Add item to order (Y/N)?",
        kind: FieldKind::EmbeddedItems,
    },
];

const INVOICE_FIELDS: &[FieldSpec] = &[
    text("order_id", "Enter order ID:"),
    text("name", "Enter invoice name:"),
    text("date", "Enter invoice date (YYYY-MM-DD):"),
];

const SERVICE_FIELDS: &[FieldSpec] = &[
    text("name", "Enter service name:"),
    number("price", "Enter service price:"),
];

const EMPLOYEE_FIELDS: &[FieldSpec] = &[
    text("name", "Enter employee name:"),
    text("position", "Enter employee position:"),
];

const ITEM_FIELDS: &[FieldSpec] = &[
    text("name", "Enter item name:"),
    text("description", "Enter item description:"),
    number("price", "Enter item price:"),
];

impl Collection {
    /// All collections in menu order.
    pub const ALL: [Self; 6] = [
        Self::Customers,
        Self::Orders,
        Self::Invoices,
        Self::Services,
        Self::Employees,
        Self::Items,
    ];

    /// Collection for a menu number between 1 and 6.
    pub fn from_index(index: i64) -> Result<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| DryCleaningError::InvalidMenuChoice(index.to_string()))
    }

    /// Menu number of this collection.
    pub const fn index(self) -> i64 {
        match self {
            Self::Customers => 1,
            Self::Orders => 2,
            Self::Invoices => 3,
            Self::Services => 4,
            Self::Employees => 5,
            Self::Items => 6,
        }
    }

    /// Name of the collection in the store.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Customers => "Customers",
            Self::Orders => "Orders",
            Self::Invoices => "Invoices",
            Self::Services => "Services",
            Self::Employees => "Employees",
            Self::Items => "Items",
        }
    }

    /// Fields captured when adding a record, in prompt order.
    ///
    /// Defaults that are not asked for (the invoice status) are not listed.
    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Customers => CUSTOMER_FIELDS,
            Self::Orders => ORDER_FIELDS,
            Self::Invoices => INVOICE_FIELDS,
            Self::Services => SERVICE_FIELDS,
            Self::Employees => EMPLOYEE_FIELDS,
            Self::Items => ITEM_FIELDS,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl CollectionChoice {
    /// Interpret a collection menu number.
    pub fn from_index(index: i64) -> Result<Self> {
        if index == EXIT_CHOICE {
            Ok(Self::Exit)
        } else {
            Collection::from_index(index).map(Self::Open)
        }
    }

    /// Interpret a raw collection menu answer.
    pub fn parse(input: &str) -> Result<Self> {
        parse_menu_number(input).and_then(Self::from_index)
    }
}

/// Parse a menu answer as an integer, ignoring surrounding whitespace.
pub fn parse_menu_number(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    trimmed
        .parse()
        .map_err(|_| DryCleaningError::InvalidMenuChoice(trimmed.to_string()))
}

//! Service order records.
//!
//! A [`ServiceOrder`] is the unit of work tracked by the tool. Field edits
//! arrive as a complete [`OrderFields`] snapshot (the form posts every field);
//! construction trims text, drops blank optionals and rejects blank required
//! fields with [`OrderValidationError`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Error;

/// Wire name of the order number field.
pub const ORDER_NUMBER_FIELD: &str = "orderNumber";
/// Wire name of the client name field.
pub const CLIENT_NAME_FIELD: &str = "clientName";
/// Wire name of the technician name field.
pub const TECHNICIAN_NAME_FIELD: &str = "technicianName";

/// Stable order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Status of a service order.
///
/// Portuguese values written by earlier versions of the tool are accepted on
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[serde(alias = "AGENDADO")]
    Scheduled,
    #[serde(alias = "EXECUTADO")]
    Executed,
    #[default]
    #[serde(alias = "PENDENTE")]
    Pending,
    #[serde(alias = "ATRASADO")]
    Late,
}

impl OrderStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 4] = [Self::Scheduled, Self::Executed, Self::Pending, Self::Late];

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Executed => "EXECUTED",
            Self::Pending => "PENDING",
            Self::Late => "LATE",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a service order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    #[serde(alias = "BAIXA")]
    Low,
    #[default]
    #[serde(alias = "MEDIA")]
    Medium,
    #[serde(alias = "ALTA")]
    High,
    #[serde(alias = "URGENTE")]
    Urgent,
}

/// Validation failures for order contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    /// A required field was absent or blank.
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
}

impl OrderValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } => field,
        }
    }
}

impl From<OrderValidationError> for Error {
    fn from(error: OrderValidationError) -> Self {
        Error::invalid_request(error.to_string()).with_details(json!({ "field": error.field() }))
    }
}

/// Editable contents of an order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderFields {
    pub order_number: String,
    pub client_name: String,
    pub description: String,
    pub status: OrderStatus,
    pub scheduled_date: Option<NaiveDate>,
    pub priority: Priority,
    pub notes: Option<String>,
    pub technician_name: Option<String>,
    pub team: Option<String>,
}

/// Trim `value`, mapping blank input to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

fn required(value: &str, field: &'static str) -> Result<String, OrderValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OrderValidationError::MissingField { field });
    }
    Ok(trimmed.to_owned())
}

/// A service order as held by the record store.
///
/// ## Invariants
/// - `order_number` and `client_name` are trimmed and non-empty.
/// - Optional text fields are either `None` or trimmed and non-empty.
/// - `created_at` / `updated_at` are assigned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: OrderId,
    #[schema(example = "OS-2024-001")]
    pub order_number: String,
    #[schema(example = "Metalúrgica Horizonte")]
    pub client_name: String,
    pub description: String,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Carlos Silva")]
    pub technician_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ServiceOrder {
    /// Build a new, not yet stored order from `fields`.
    ///
    /// # Examples
    /// ```
    /// use ordens::domain::{OrderFields, OrderId, OrderStatus, ServiceOrder};
    ///
    /// let order = ServiceOrder::new(
    ///     OrderId::random(),
    ///     OrderFields {
    ///         order_number: " OS-1 ".into(),
    ///         client_name: "ACME".into(),
    ///         ..OrderFields::default()
    ///     },
    /// )
    /// .expect("valid order");
    /// assert_eq!(order.order_number, "OS-1");
    /// assert_eq!(order.status, OrderStatus::Pending);
    /// ```
    pub fn new(id: OrderId, fields: OrderFields) -> Result<Self, OrderValidationError> {
        let OrderFields {
            order_number,
            client_name,
            description,
            status,
            scheduled_date,
            priority,
            notes,
            technician_name,
            team,
        } = fields;

        Ok(Self {
            id,
            order_number: required(&order_number, ORDER_NUMBER_FIELD)?,
            client_name: required(&client_name, CLIENT_NAME_FIELD)?,
            description: description.trim().to_owned(),
            status,
            scheduled_date,
            priority,
            notes: non_blank(notes),
            technician_name: non_blank(technician_name),
            team: non_blank(team),
            created_at: None,
            updated_at: None,
        })
    }

    /// Copy of this order with every editable field replaced by `fields`.
    ///
    /// Identity and store timestamps are preserved.
    pub fn with_fields(&self, fields: OrderFields) -> Result<Self, OrderValidationError> {
        let mut next = Self::new(self.id, fields)?;
        next.created_at = self.created_at;
        next.updated_at = self.updated_at;
        Ok(next)
    }

    /// Current contents as an editable snapshot.
    #[must_use]
    pub fn fields(&self) -> OrderFields {
        OrderFields {
            order_number: self.order_number.clone(),
            client_name: self.client_name.clone(),
            description: self.description.clone(),
            status: self.status,
            scheduled_date: self.scheduled_date,
            priority: self.priority,
            notes: self.notes.clone(),
            technician_name: self.technician_name.clone(),
            team: self.team.clone(),
        }
    }
}

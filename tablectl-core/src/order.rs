//! Order records and construction rules
//!
//! Orders created through the API always go through [`OrderBuilder`], which
//! owns the phone synthesis and optional-field rules. Orders written by other
//! producers are read back as plain JSON and never re-typed.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status assigned to every freshly created order
pub const STATUS_CONFIRMED: &str = "confirmed";

/// Item status counted as delivered in stats
pub const STATUS_DELIVERED: &str = "delivered";

/// `order_type` of orders created through the API
pub const ORDER_TYPE_PHONE_ONLY: &str = "phone_only";

/// Phone value that callers send when they could not capture a number
pub const UNKNOWN_PHONE: &str = "unknown";

/// Prefix of synthesized phone values
pub const SYNTHETIC_PHONE_PREFIX: &str = "call_";

/// Where the order's phone number came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneSource {
    /// Caller ID captured from the incoming call
    ExtractedFromCall,
    /// Number given by the customer, or synthesized
    ProvidedByCustomer,
}

/// Order document as stored and returned by the create endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub phone: String,
    /// Line items exactly as the client sent them
    pub items: Vec<Value>,
    pub status: String,
    pub created_at: String,
    pub order_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_phone: Option<String>,
    pub phone_source: PhoneSource,
}

impl Order {
    pub fn builder() -> OrderBuilder {
        OrderBuilder::default()
    }
}

/// Create-order request body. Every field is optional and of any JSON type.
///
/// Identity fields follow truthiness: `null`, `false`, `0` and `""` count as
/// absent, other scalars are stored as their text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderDraft {
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub items: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(default)]
    pub caller_phone: Option<Value>,
}

impl OrderDraft {
    /// Draft from any JSON body. Non-object bodies carry no fields.
    pub fn from_json(body: Value) -> Self {
        let Value::Object(mut fields) = body else {
            return Self::default();
        };
        Self {
            phone: fields.remove("phone"),
            items: fields.remove("items"),
            name: fields.remove("name"),
            address: fields.remove("address"),
            caller_phone: fields.remove("caller_phone"),
        }
    }

    /// Build the order to store, stamped with `now`.
    pub fn into_order(self, now: DateTime<Utc>) -> Order {
        Order::builder()
            .phone(truthy_text(self.phone))
            .items(line_items(self.items))
            .name(truthy_text(self.name))
            .address(truthy_text(self.address))
            .caller_phone(truthy_text(self.caller_phone))
            .build(now)
    }
}

/// Text of a truthy JSON value; `None` for `null`, `false`, `0` and `""`
pub fn truthy_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) => Some(text),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Arrays are taken as-is. A falsy value means no items; any other single
/// value becomes a one-item list.
fn line_items(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        Some(Value::Object(item)) => vec![Value::Object(item)],
        Some(Value::String(text)) if !text.is_empty() => vec![Value::String(text)],
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => vec![Value::Number(n)],
        Some(Value::Bool(true)) => vec![Value::Bool(true)],
        _ => Vec::new(),
    }
}

/// Builder enforcing the presence rules for new orders:
///
/// - a missing, empty or `"unknown"` phone becomes `call_<unix millis>`
/// - empty `name`/`address` are dropped rather than stored
/// - a non-empty `caller_phone` marks the phone as extracted from the call
#[derive(Debug, Clone, Default)]
pub struct OrderBuilder {
    phone: Option<String>,
    items: Vec<Value>,
    name: Option<String>,
    address: Option<String>,
    caller_phone: Option<String>,
}

impl OrderBuilder {
    pub fn phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    pub fn items(mut self, items: Vec<Value>) -> Self {
        self.items = items;
        self
    }

    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn address(mut self, address: Option<String>) -> Self {
        self.address = address;
        self
    }

    pub fn caller_phone(mut self, caller_phone: Option<String>) -> Self {
        self.caller_phone = caller_phone;
        self
    }

    pub fn build(self, now: DateTime<Utc>) -> Order {
        let phone = match non_empty(self.phone) {
            Some(phone) if phone != UNKNOWN_PHONE => phone,
            _ => synthetic_phone(now),
        };
        let caller_phone = non_empty(self.caller_phone);
        let phone_source = if caller_phone.is_some() {
            PhoneSource::ExtractedFromCall
        } else {
            PhoneSource::ProvidedByCustomer
        };

        Order {
            phone,
            items: self.items,
            status: STATUS_CONFIRMED.to_owned(),
            created_at: timestamp(now),
            order_type: ORDER_TYPE_PHONE_ONLY.to_owned(),
            name: non_empty(self.name),
            address: non_empty(self.address),
            caller_phone,
            phone_source,
        }
    }
}

/// Phone placeholder derived from the creation instant
pub fn synthetic_phone(now: DateTime<Utc>) -> String {
    format!("{}{}", SYNTHETIC_PHONE_PREFIX, now.timestamp_millis())
}

/// ISO-8601 UTC with millisecond precision, e.g. `2026-10-19T08:15:30.123Z`.
///
/// Fixed width, so string order equals time order.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 15, 30).unwrap()
            + chrono::Duration::milliseconds(123)
    }

    #[test]
    fn defaults_for_new_order() {
        let order = OrderDraft {
            phone: Some(json!("555-0111")),
            ..Default::default()
        }
        .into_order(fixed_now());

        assert_eq!(order.phone, "555-0111");
        assert!(order.items.is_empty());
        assert_eq!(order.status, "confirmed");
        assert_eq!(order.order_type, "phone_only");
        assert_eq!(order.created_at, "2026-10-19T08:15:30.123Z");
        assert_eq!(order.phone_source, PhoneSource::ProvidedByCustomer);
    }

    #[test]
    fn unknown_or_missing_phone_is_synthesized() {
        let now = fixed_now();
        for phone in [None, Some(String::new()), Some("unknown".to_string())] {
            let order = Order::builder().phone(phone).build(now);
            assert_eq!(order.phone, format!("call_{}", now.timestamp_millis()));
            assert_eq!(order.phone_source, PhoneSource::ProvidedByCustomer);
        }
    }

    #[test]
    fn caller_phone_sets_source() {
        let order = Order::builder()
            .caller_phone(Some("555-0100".into()))
            .build(fixed_now());

        assert_eq!(order.caller_phone.as_deref(), Some("555-0100"));
        assert_eq!(order.phone_source, PhoneSource::ExtractedFromCall);

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["phone_source"], "extracted_from_call");
        assert_eq!(value["caller_phone"], "555-0100");
    }

    #[test]
    fn empty_caller_phone_is_dropped() {
        let order = Order::builder()
            .caller_phone(Some(String::new()))
            .build(fixed_now());
        let value = serde_json::to_value(&order).unwrap();

        assert!(value.get("caller_phone").is_none());
        assert_eq!(value["phone_source"], "provided_by_customer");
    }

    #[test]
    fn absent_name_and_address_are_not_serialized() {
        let order = Order::builder()
            .name(Some(String::new()))
            .address(None)
            .build(fixed_now());
        let value = serde_json::to_value(&order).unwrap();
        let obj = value.as_object().unwrap();

        assert!(!obj.contains_key("name"));
        assert!(!obj.contains_key("address"));
    }

    #[test]
    fn field_order_matches_wire_format() {
        let order = Order::builder()
            .phone(Some("1".into()))
            .name(Some("Asha".into()))
            .address(Some("12 Main St".into()))
            .caller_phone(Some("2".into()))
            .build(fixed_now());
        let text = serde_json::to_string(&order).unwrap();
        let keys: Vec<usize> = [
            "\"phone\"",
            "\"items\"",
            "\"status\"",
            "\"created_at\"",
            "\"order_type\"",
            "\"name\"",
            "\"address\"",
            "\"caller_phone\"",
            "\"phone_source\"",
        ]
        .iter()
        .map(|k| text.find(k).unwrap())
        .collect();

        assert!(keys.windows(2).all(|w| w[0] < w[1]), "{text}");
    }

    #[test]
    fn line_items_are_kept_verbatim() {
        let draft = OrderDraft::from_json(json!({
            "items": [
                {"name": "Paneer Tikka", "price": "10", "quantity": 2, "status": "confirmed"},
                "Garlic Naan"
            ]
        }));
        let order = draft.into_order(fixed_now());

        assert_eq!(order.items[0]["price"], "10");
        assert_eq!(order.items[1], "Garlic Naan");
        assert_eq!(
            serde_json::to_string(&order.items[0]).unwrap(),
            r#"{"name":"Paneer Tikka","price":"10","quantity":2,"status":"confirmed"}"#
        );
    }

    #[test]
    fn null_items_become_empty() {
        let draft: OrderDraft = serde_json::from_value(json!({"items": null})).unwrap();
        assert!(draft.into_order(fixed_now()).items.is_empty());
        assert!(OrderDraft::from_json(json!({"items": false}))
            .into_order(fixed_now())
            .items
            .is_empty());
    }

    #[test]
    fn single_item_is_wrapped() {
        let order = OrderDraft::from_json(json!({"items": {"name": "Dal"}})).into_order(fixed_now());
        assert_eq!(order.items, vec![json!({"name": "Dal"})]);
    }

    #[test]
    fn non_string_identity_fields_are_stringified() {
        let order = OrderDraft::from_json(json!({
            "phone": 5551234,
            "name": 42,
            "address": false,
            "caller_phone": 0
        }))
        .into_order(fixed_now());

        assert_eq!(order.phone, "5551234");
        assert_eq!(order.name.as_deref(), Some("42"));
        assert_eq!(order.address, None);
        assert_eq!(order.caller_phone, None);
        assert_eq!(order.phone_source, PhoneSource::ProvidedByCustomer);
    }

    #[test]
    fn truthiness_of_json_values() {
        assert_eq!(truthy_text(None), None);
        assert_eq!(truthy_text(Some(Value::Null)), None);
        assert_eq!(truthy_text(Some(json!(""))), None);
        assert_eq!(truthy_text(Some(json!(0.0))), None);
        assert_eq!(truthy_text(Some(json!(true))).as_deref(), Some("true"));
        assert_eq!(truthy_text(Some(json!(12.5))).as_deref(), Some("12.5"));
        assert_eq!(truthy_text(Some(json!("unknown"))).as_deref(), Some("unknown"));
    }

    #[test]
    fn non_object_body_is_an_empty_draft() {
        let order = OrderDraft::from_json(json!(["555-0111"])).into_order(fixed_now());
        assert!(order.phone.starts_with("call_"));
        assert!(order.items.is_empty());
    }
}

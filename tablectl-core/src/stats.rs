//! Order statistics
//!
//! Works on raw order documents rather than [`crate::Order`], since stored
//! orders come from several producers and carry no enforced schema.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::restaurant::Restaurant;

/// Response body of the stats endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderStats {
    pub restaurant: Restaurant,
    pub total_orders: u64,
    pub confirmed_orders: u64,
    pub delivered_orders: u64,
    pub revenue: Revenue,
}

/// Summed `price × quantity` across orders.
///
/// Serialized as a JSON integer when whole so `25` stays `25` for clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Revenue(pub f64);

impl Revenue {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Serialize for Revenue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

/// Total revenue over every item of every order.
pub fn revenue<'a, I>(orders: I) -> Revenue
where
    I: IntoIterator<Item = &'a Value>,
{
    Revenue(orders.into_iter().map(order_total).sum())
}

/// Sum of one order's items. Orders without an `items` array contribute 0.
pub fn order_total(order: &Value) -> f64 {
    match order.get("items") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item_price(item) * item_quantity(item))
            .sum(),
        _ => 0.0,
    }
}

/// Numeric price, or 0 when missing or not a number.
fn item_price(item: &Value) -> f64 {
    item.get("price").and_then(Value::as_f64).unwrap_or(0.0)
}

/// Numeric quantity; missing, non-numeric and zero quantities count as 1.
fn item_quantity(item: &Value) -> f64 {
    match item.get("quantity").and_then(Value::as_f64) {
        Some(q) if q != 0.0 => q,
        _ => 1.0,
    }
}

/// Whether any item of `order` has `status`.
///
/// Mirrors a document-store match on `items.status`: `items` may be an array
/// of item objects or a single embedded object.
pub fn has_item_status(order: &Value, status: &str) -> bool {
    items_have_status(order.get("items"), status)
}

/// [`has_item_status`] on an order's `items` field directly.
pub fn items_have_status(items: Option<&Value>, status: &str) -> bool {
    let matches = |item: &Value| item.get("status").and_then(Value::as_str) == Some(status);
    match items {
        Some(Value::Array(items)) => items.iter().any(matches),
        Some(item @ Value::Object(_)) => matches(item),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{STATUS_CONFIRMED, STATUS_DELIVERED};
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn revenue_defaults_quantity_to_one() {
        let orders = vec![
            json!({"items": [{"price": 10, "quantity": 2}]}),
            json!({"items": [{"price": 5}]}),
        ];
        assert_eq!(revenue(&orders), Revenue(25.0));
    }

    #[test]
    fn revenue_tolerates_missing_fields() {
        let orders = vec![
            json!({}),
            json!({"items": null}),
            json!({"items": [{"quantity": 3}, {"price": null}, {"price": "9"}]}),
            json!({"items": [{"price": 4, "quantity": 0}]}),
            json!({"items": [{"price": 1.25, "quantity": 2}]}),
        ];
        assert_eq!(revenue(&orders), Revenue(6.5));
    }

    #[test]
    fn revenue_of_nothing_is_zero() {
        let orders: Vec<Value> = vec![];
        assert_eq!(revenue(&orders), Revenue(0.0));
    }

    #[test]
    fn whole_revenue_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Revenue(25.0)).unwrap(), "25");
        assert_eq!(serde_json::to_string(&Revenue(2.5)).unwrap(), "2.5");
    }

    #[test]
    fn item_status_matching() {
        let orders = [
            json!({"items": [{"status": "confirmed"}]}),
            json!({"items": [{"status": "delivered"}]}),
            json!({"items": [{"status": "confirmed"}, {"status": "delivered"}]}),
        ];
        let confirmed = orders
            .iter()
            .filter(|o| has_item_status(o, STATUS_CONFIRMED))
            .count();
        let delivered = orders
            .iter()
            .filter(|o| has_item_status(o, STATUS_DELIVERED))
            .count();

        assert_eq!(confirmed, 2);
        assert_eq!(delivered, 2);
    }

    #[test]
    fn order_level_status_is_not_an_item_status() {
        let order = json!({"status": "confirmed", "items": []});
        assert!(!has_item_status(&order, STATUS_CONFIRMED));
    }

    #[test]
    fn embedded_single_item_matches() {
        let order = json!({"items": {"status": "delivered"}});
        assert!(has_item_status(&order, STATUS_DELIVERED));
    }

    #[test]
    fn stats_body_shape() {
        let stats = OrderStats {
            restaurant: Restaurant::default(),
            total_orders: 3,
            confirmed_orders: 2,
            delivered_orders: 2,
            revenue: Revenue(25.0),
        };
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({
                "restaurant": "bansari",
                "total_orders": 3,
                "confirmed_orders": 2,
                "delivered_orders": 2,
                "revenue": 25
            })
        );
    }

    proptest! {
        #[test]
        fn revenue_is_sum_of_order_totals(
            lines in prop::collection::vec(
                prop::collection::vec((0u32..1000, 1u32..20), 0..5),
                0..10,
            )
        ) {
            let orders: Vec<Value> = lines
                .iter()
                .map(|items| json!({
                    "items": items
                        .iter()
                        .map(|(p, q)| json!({"price": p, "quantity": q}))
                        .collect::<Vec<_>>()
                }))
                .collect();
            let expected: u64 = lines
                .iter()
                .flatten()
                .map(|(p, q)| u64::from(*p) * u64::from(*q))
                .sum();

            prop_assert_eq!(revenue(&orders), Revenue(expected as f64));
        }
    }
}

//! Order data handed over by the order-management side
//!
//! Read-only input: nothing in this crate mutates an order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Customer contact details
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// A single ordered product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// Free-form extras ("Extra sauce", "No onions")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customizations: Vec<String>,
}

impl LineItem {
    /// `unit_price × quantity`
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A completed order ready for its receipt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Order number shown on the receipt
    pub order_id: String,
    /// Creation timestamp (unix millis)
    pub created_at: i64,
    #[serde(default)]
    pub customer: CustomerContact,
    /// Pickup or delivery location
    #[serde(default)]
    pub pickup_location: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// Estimated ready time (unix millis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_ready_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_line_total() {
        let item = LineItem {
            name: "Döner Kebab".to_string(),
            quantity: 2,
            unit_price: dec!(7.50),
            customizations: vec![],
        };
        assert_eq!(item.line_total(), dec!(15.00));
    }

    #[test]
    fn test_deserialize_minimal() {
        let json = r#"{
            "order_id": "A-17",
            "created_at": 1705912335000,
            "subtotal": 0,
            "tax": 0,
            "total": 0
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id, "A-17");
        assert!(order.items.is_empty());
        assert!(order.customer.name.is_empty());
        assert!(order.special_instructions.is_none());
    }

    #[test]
    fn test_deserialize_items() {
        let json = r#"{
            "order_id": "42",
            "created_at": 0,
            "customer": { "name": "Ayşe", "phone": "+49 30 1234" },
            "pickup_location": "Counter",
            "items": [
                { "name": "Ayran", "quantity": 1, "unit_price": 2.0 }
            ],
            "subtotal": 2.0,
            "tax": 0.0,
            "total": 2.0,
            "estimated_ready_at": 1705913000000
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].unit_price, dec!(2));
        assert_eq!(order.customer.name, "Ayşe");
        assert_eq!(order.estimated_ready_at, Some(1705913000000));
    }
}

//! Row types written to the analytics tables.
//!
//! Field names match the ClickHouse column names exactly; rows are
//! serialized one JSON object per line (`JSONEachRow`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// Device classes an event can originate from.
pub const DEVICE_TYPES: [&str; 3] = ["desktop", "mobile", "tablet"];

/// Browsers an event can originate from.
pub const BROWSERS: [&str; 5] = ["Chrome", "Firefox", "Safari", "Edge", "Opera"];

/// Country codes for events and users.
pub const COUNTRIES: [&str; 10] = ["US", "UK", "DE", "FR", "CA", "AU", "JP", "BR", "IN", "RU"];

/// Product categories.
pub const CATEGORIES: [&str; 10] = [
    "Electronics",
    "Clothing",
    "Books",
    "Home & Garden",
    "Sports",
    "Beauty",
    "Toys",
    "Automotive",
    "Health",
    "Food",
];

/// Kind of user interaction recorded in `events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PageView,
    Click,
    Search,
    Login,
    Logout,
    Purchase,
    AddToCart,
    RemoveFromCart,
    Signup,
    Download,
}

impl EventType {
    /// Every event type, in column-enum order.
    pub const ALL: [EventType; 10] = [
        EventType::PageView,
        EventType::Click,
        EventType::Search,
        EventType::Login,
        EventType::Logout,
        EventType::Purchase,
        EventType::AddToCart,
        EventType::RemoveFromCart,
        EventType::Signup,
        EventType::Download,
    ];

    /// Monetizable actions the live stream is biased towards.
    pub const HIGH_ENGAGEMENT: [EventType; 3] =
        [EventType::Purchase, EventType::AddToCart, EventType::Signup];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PageView => "page_view",
            EventType::Click => "click",
            EventType::Search => "search",
            EventType::Login => "login",
            EventType::Logout => "logout",
            EventType::Purchase => "purchase",
            EventType::AddToCart => "add_to_cart",
            EventType::RemoveFromCart => "remove_from_cart",
            EventType::Signup => "signup",
            EventType::Download => "download",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Completed,
    Pending,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Completed,
        OrderStatus::Pending,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "completed",
            OrderStatus::Pending => "pending",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment channel used for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    BankTransfer,
    ApplePay,
    GooglePay,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::CreditCard,
        PaymentMethod::Paypal,
        PaymentMethod::BankTransfer,
        PaymentMethod::ApplePay,
        PaymentMethod::GooglePay,
    ];
}

/// One row of the `events` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub event_id: u64,
    pub user_id: u64,
    pub event_type: EventType,
    #[serde(serialize_with = "serialize_datetime")]
    pub event_timestamp: DateTime<Utc>,
    pub page_url: String,
    pub session_id: String,
    pub device_type: &'static str,
    pub browser: &'static str,
    pub country: &'static str,
    pub duration_seconds: u32,
    pub revenue: f64,
}

/// One row of the `orders` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_id: u64,
    pub user_id: u64,
    pub product_id: u64,
    pub quantity: u32,
    pub order_date: NaiveDate,
    #[serde(serialize_with = "serialize_datetime")]
    pub order_timestamp: DateTime<Utc>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
}

/// One row of the `users` table (seed only).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub user_id: u64,
    pub username: String,
    pub email: String,
    pub age: u8,
    pub country: &'static str,
    pub registration_date: NaiveDate,
    #[serde(serialize_with = "serialize_datetime")]
    pub registration_timestamp: DateTime<Utc>,
    pub is_premium: u8,
    pub total_spent: f64,
}

/// One row of the `products` table (seed only).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub product_id: u64,
    pub product_name: String,
    pub category: &'static str,
    pub price: f64,
    pub created_date: NaiveDate,
    pub is_active: u8,
}

/// ClickHouse `DateTime` text form; values are always UTC.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn serialize_datetime<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&dt.format(DATETIME_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_serializes_with_column_names() {
        let event = Event {
            event_id: 7,
            user_id: 3,
            event_type: EventType::AddToCart,
            event_timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap(),
            page_url: "/page/4".to_string(),
            session_id: "stream-sess-1001".to_string(),
            device_type: "mobile",
            browser: "Safari",
            country: "DE",
            duration_seconds: 42,
            revenue: 12.5,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "add_to_cart");
        assert_eq!(json["event_timestamp"], "2024-05-01 12:30:05");
        assert_eq!(json["device_type"], "mobile");
        assert_eq!(json["revenue"], 12.5);
    }

    #[test]
    fn test_order_serializes_date_and_enums() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let order = Order {
            order_id: 1,
            user_id: 2,
            product_id: 3,
            quantity: 1,
            order_date: ts.date_naive(),
            order_timestamp: ts,
            total_amount: 99.99,
            status: OrderStatus::Refunded,
            payment_method: PaymentMethod::GooglePay,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["order_date"], "2024-01-31");
        assert_eq!(json["order_timestamp"], "2024-01-31 23:59:59");
        assert_eq!(json["status"], "refunded");
        assert_eq!(json["payment_method"], "google_pay");
    }

    #[test]
    fn test_event_type_strings_match_serde() {
        for event_type in EventType::ALL {
            let json = serde_json::to_value(event_type).unwrap();
            assert_eq!(json, event_type.as_str());
        }
    }
}

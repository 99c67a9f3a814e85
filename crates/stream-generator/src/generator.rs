//! Live stream generator for events and orders.

use crate::generators::{choice, numeric, pattern, timestamp};
use crate::records::{
    Event, EventType, Order, OrderStatus, PaymentMethod, BROWSERS, COUNTRIES, DEVICE_TYPES,
};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// First value of the session-naming counter.
pub const SESSION_COUNTER_START: u64 = 1000;

/// Distribution parameters for generated events.
#[derive(Debug, Clone)]
pub struct EventProfile {
    /// How far back from "now" event timestamps may fall.
    pub window: Duration,
    /// Probability of re-rolling the type from [`EventType::HIGH_ENGAGEMENT`].
    pub engagement_bias: f64,
    /// Revenue range for `purchase` events. The lower bound must be positive.
    pub purchase_revenue: (f64, f64),
    /// Revenue range for `add_to_cart` events.
    pub cart_revenue: (f64, f64),
    /// Range of `duration_seconds`.
    pub duration_seconds: (u64, u64),
}

impl EventProfile {
    /// Live trickle: the last five minutes, biased towards monetizable actions.
    pub fn stream() -> Self {
        Self {
            window: Duration::seconds(300),
            engagement_bias: 0.3,
            purchase_revenue: (20.0, 300.0),
            cart_revenue: (0.0, 80.0),
            duration_seconds: (5, 600),
        }
    }

    /// Back-filled history: the last six months, no bias.
    pub fn history() -> Self {
        Self {
            window: Duration::days(183),
            engagement_bias: 0.0,
            purchase_revenue: (10.0, 200.0),
            cart_revenue: (0.0, 50.0),
            duration_seconds: (5, 600),
        }
    }
}

/// Distribution parameters for generated orders.
#[derive(Debug, Clone)]
pub struct OrderProfile {
    /// How far back from "now" order timestamps may fall.
    pub window: Duration,
    /// Maximum quantity (minimum is 1).
    pub max_quantity: u64,
    /// Range of `total_amount`. The lower bound must be positive.
    pub amount: (f64, f64),
    /// Relative weights for each status.
    pub status_weights: [(OrderStatus, f64); 4],
}

impl OrderProfile {
    /// Live trickle: the last three hours, mostly completed.
    pub fn stream() -> Self {
        Self {
            window: Duration::minutes(180),
            max_quantity: 3,
            amount: (25.0, 400.0),
            status_weights: [
                (OrderStatus::Completed, 0.70),
                (OrderStatus::Pending, 0.15),
                (OrderStatus::Cancelled, 0.10),
                (OrderStatus::Refunded, 0.05),
            ],
        }
    }

    /// Back-filled history: the last year, uniform statuses.
    pub fn history() -> Self {
        Self {
            window: Duration::days(365),
            max_quantity: 5,
            amount: (10.0, 1000.0),
            status_weights: OrderStatus::ALL.map(|s| (s, 1.0)),
        }
    }
}

/// Generator for the live event/order stream.
///
/// Stateless across calls apart from the RNG and the session-naming counter,
/// which advances once per event batch so session ids look continuous.
pub struct StreamGenerator {
    rng: StdRng,
    session_counter: u64,
    events: EventProfile,
    orders: OrderProfile,
}

impl StreamGenerator {
    /// Create a generator. `Some(seed)` makes the stream reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            session_counter: SESSION_COUNTER_START,
            events: EventProfile::stream(),
            orders: OrderProfile::stream(),
        }
    }

    /// Current value of the session-naming counter.
    pub fn session_counter(&self) -> u64 {
        self.session_counter
    }

    /// Generate `count` events with ids `after_id + 1 ..= after_id + count`.
    ///
    /// Returns no events when there are no users to attribute them to.
    pub fn events(
        &mut self,
        after_id: u64,
        user_count: u64,
        count: usize,
        now: DateTime<Utc>,
    ) -> Vec<Event> {
        if user_count == 0 {
            return Vec::new();
        }

        let events = (1..=count as u64)
            .map(|offset| {
                let user_id = numeric::int_range(&mut self.rng, 1, user_count);
                let session = self.session_counter + numeric::int_range(&mut self.rng, 1, 100);
                let session_id = format!("stream-sess-{session}");
                generate_event(
                    &mut self.rng,
                    &self.events,
                    after_id + offset,
                    user_id,
                    session_id,
                    now,
                )
            })
            .collect();

        self.session_counter += 1;
        events
    }

    /// Generate `count` orders with ids `after_id + 1 ..= after_id + count`.
    ///
    /// Returns no orders when either population is empty.
    pub fn orders(
        &mut self,
        after_id: u64,
        user_count: u64,
        product_count: u64,
        count: usize,
        now: DateTime<Utc>,
    ) -> Vec<Order> {
        if user_count == 0 || product_count == 0 {
            return Vec::new();
        }

        (1..=count as u64)
            .map(|offset| {
                let user_id = numeric::int_range(&mut self.rng, 1, user_count);
                let product_id = numeric::int_range(&mut self.rng, 1, product_count);
                generate_order(
                    &mut self.rng,
                    &self.orders,
                    after_id + offset,
                    user_id,
                    product_id,
                    now,
                )
            })
            .collect()
    }
}

/// Pick an event type, applying the engagement re-roll.
pub(crate) fn event_type<R: Rng>(rng: &mut R, engagement_bias: f64) -> EventType {
    let event_type = choice::one_of(rng, &EventType::ALL);
    if engagement_bias > 0.0 && rng.random_bool(engagement_bias) {
        return choice::one_of(rng, &EventType::HIGH_ENGAGEMENT);
    }
    event_type
}

/// Revenue implied by an event type: zero unless the event is monetized.
pub(crate) fn revenue<R: Rng>(rng: &mut R, profile: &EventProfile, event_type: EventType) -> f64 {
    match event_type {
        EventType::Purchase => {
            numeric::money_range(rng, profile.purchase_revenue.0, profile.purchase_revenue.1)
        }
        EventType::AddToCart => {
            numeric::money_range(rng, profile.cart_revenue.0, profile.cart_revenue.1)
        }
        _ => 0.0,
    }
}

pub(crate) fn generate_event<R: Rng>(
    rng: &mut R,
    profile: &EventProfile,
    event_id: u64,
    user_id: u64,
    session_id: String,
    now: DateTime<Utc>,
) -> Event {
    let event_type = event_type(rng, profile.engagement_bias);
    let event_timestamp = timestamp::recent_timestamp(rng, now, profile.window);
    let page = numeric::int_range(rng, 1, 100);
    Event {
        event_id,
        user_id,
        event_type,
        event_timestamp,
        page_url: pattern::render("/page/{index}", rng, page),
        session_id,
        device_type: choice::one_of(rng, &DEVICE_TYPES),
        browser: choice::one_of(rng, &BROWSERS),
        country: choice::one_of(rng, &COUNTRIES),
        duration_seconds: numeric::int_range(
            rng,
            profile.duration_seconds.0,
            profile.duration_seconds.1,
        ) as u32,
        revenue: revenue(rng, profile, event_type),
    }
}

pub(crate) fn generate_order<R: Rng>(
    rng: &mut R,
    profile: &OrderProfile,
    order_id: u64,
    user_id: u64,
    product_id: u64,
    now: DateTime<Utc>,
) -> Order {
    let order_timestamp = timestamp::recent_timestamp(rng, now, profile.window);
    Order {
        order_id,
        user_id,
        product_id,
        quantity: numeric::int_range(rng, 1, profile.max_quantity) as u32,
        order_date: order_timestamp.date_naive(),
        order_timestamp,
        total_amount: numeric::money_range(rng, profile.amount.0, profile.amount.1),
        status: choice::weighted(rng, &profile.status_weights),
        payment_method: choice::one_of(rng, &PaymentMethod::ALL),
    }
}

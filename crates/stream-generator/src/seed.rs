//! Back-dated history for the one-shot seed.
//!
//! Ids start at 1 and are dense, so the stream can later resume from
//! `max(id)` without gaps or collisions.

use crate::generator::{generate_event, generate_order, EventProfile, OrderProfile};
use crate::generators::{choice, numeric, pattern, timestamp};
use crate::records::{Event, Order, Product, User, CATEGORIES, COUNTRIES};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Generator for the initial users, products, orders and event history.
pub struct SeedGenerator {
    rng: StdRng,
    events: EventProfile,
    orders: OrderProfile,
}

impl SeedGenerator {
    /// Create a seeded generator; the same seed yields the same dataset.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            events: EventProfile::history(),
            orders: OrderProfile::history(),
        }
    }

    /// Generate users `1..=count`, registered within the last two years.
    pub fn users(&mut self, count: u64, now: DateTime<Utc>) -> Vec<User> {
        let today = now.date_naive();
        (1..=count)
            .map(|user_id| {
                let registration_date =
                    timestamp::date_within(&mut self.rng, today, Duration::days(730));
                User {
                    user_id,
                    username: pattern::render("user_{index}_{rand:3}", &mut self.rng, user_id),
                    email: pattern::render("user_{index}@example.com", &mut self.rng, user_id),
                    age: numeric::int_range(&mut self.rng, 18, 80) as u8,
                    country: choice::one_of(&mut self.rng, &COUNTRIES),
                    registration_date,
                    registration_timestamp: timestamp::timestamp_on(
                        &mut self.rng,
                        registration_date,
                    ),
                    is_premium: choice::weighted_flag(&mut self.rng, 0.2),
                    total_spent: numeric::money_range(&mut self.rng, 0.0, 5000.0),
                }
            })
            .collect()
    }

    /// Generate products `1..=count`, created within the last year.
    pub fn products(&mut self, count: u64, now: DateTime<Utc>) -> Vec<Product> {
        let today = now.date_naive();
        (1..=count)
            .map(|product_id| {
                let category = choice::one_of(&mut self.rng, &CATEGORIES);
                Product {
                    product_id,
                    product_name: format!("{category} Item {product_id}"),
                    category,
                    price: numeric::money_range(&mut self.rng, 5.0, 500.0),
                    created_date: timestamp::date_within(&mut self.rng, today, Duration::days(365)),
                    is_active: choice::weighted_flag(&mut self.rng, 0.9),
                }
            })
            .collect()
    }

    /// Generate orders `1..=count` across the given populations.
    pub fn orders(
        &mut self,
        count: u64,
        user_count: u64,
        product_count: u64,
        now: DateTime<Utc>,
    ) -> Vec<Order> {
        if user_count == 0 || product_count == 0 {
            return Vec::new();
        }
        (1..=count)
            .map(|order_id| {
                let user_id = numeric::int_range(&mut self.rng, 1, user_count);
                let product_id = numeric::int_range(&mut self.rng, 1, product_count);
                generate_order(&mut self.rng, &self.orders, order_id, user_id, product_id, now)
            })
            .collect()
    }

    /// Generate the event history of one user, numbering from `after_id + 1`.
    ///
    /// Each user gets between 10 and `2 * events_per_user` events, each in
    /// its own session.
    pub fn user_events(
        &mut self,
        user_id: u64,
        after_id: u64,
        events_per_user: u64,
        now: DateTime<Utc>,
    ) -> Vec<Event> {
        let count = numeric::int_range(&mut self.rng, 10, (events_per_user * 2).max(10));
        (1..=count)
            .map(|offset| {
                let session_id = pattern::render("{uuid}", &mut self.rng, offset);
                generate_event(
                    &mut self.rng,
                    &self.events,
                    after_id + offset,
                    user_id,
                    session_id,
                    now,
                )
            })
            .collect()
    }
}

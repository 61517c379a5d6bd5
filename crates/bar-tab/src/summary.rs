//! Per-person totals and the order log.
//!
//! Everything here is derived on demand from the current people and orders;
//! nothing is cached or persisted.

use std::cmp::Reverse;

use crate::ids::{OrderId, PersonId};
use crate::menu::compare_names;
use crate::model::{Order, Person, UNKNOWN_PERSON};
use crate::price::{finite_or_zero, price_key};

/// Size label used when grouping orders without a size.
const NO_SIZE: &str = "N/A";

/// Repeated identical orders collapsed into one line.
#[derive(Debug, Clone, PartialEq)]
pub struct DrinkSignature {
    /// Drink name.
    pub name: String,
    /// Size of the first order in the group.
    pub size: Option<String>,
    /// Unit price.
    pub price: f64,
    /// Number of orders in the group.
    pub count: usize,
}

/// Totals for one registered person.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonSummary {
    /// The person's identifier.
    pub person_id: PersonId,
    /// The person's display name.
    pub name: String,
    /// Number of orders billed to the person.
    pub total_count: usize,
    /// Sum of the person's order prices.
    pub total_cost: f64,
    /// Distinct drink signatures, sorted by name.
    pub drinks: Vec<DrinkSignature>,
}

/// Aggregated view over the whole tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// One entry per registered person, in registration order.
    pub people: Vec<PersonSummary>,
    /// Sum over every order, including orders for unknown people.
    pub grand_total: f64,
}

/// Aggregates `orders` per person.
///
/// Non-finite prices count as zero in every total. Orders whose person is
/// not registered only contribute to the grand total.
///
/// # Example
///
/// ```
/// use bar_tab::{DrinkId, Order, OrderId, Person, PersonId, summarize};
///
/// let alice = Person { id: PersonId::new("p1"), name: "Alice".to_owned() };
/// let beer = |id: &str| Order {
///     id: OrderId::new(id),
///     person_id: PersonId::new("p1"),
///     drink_id: DrinkId::new("d1"),
///     drink_name: "Beer".to_owned(),
///     drink_size: Some("0.5l".to_owned()),
///     price: 3.5,
///     timestamp: 0,
/// };
///
/// let summary = summarize(&[beer("o1"), beer("o2")], &[alice]);
/// assert_eq!(summary.people[0].total_count, 2);
/// assert_eq!(summary.people[0].drinks[0].count, 2);
/// ```
#[must_use]
pub fn summarize(orders: &[Order], people: &[Person]) -> Summary {
    let mut summaries: Vec<PersonSummary> = people
        .iter()
        .map(|person| PersonSummary {
            person_id: person.id.clone(),
            name: person.name.clone(),
            total_count: 0,
            total_cost: 0.0,
            drinks: Vec::new(),
        })
        .collect();

    for order in orders {
        if let Some(summary) = summaries
            .iter_mut()
            .find(|summary| summary.person_id == order.person_id)
        {
            summary.record(order);
        }
    }

    for summary in &mut summaries {
        summary.drinks.sort_by(|a, b| compare_names(&a.name, &b.name));
    }

    Summary {
        people: summaries,
        grand_total: sum_prices(orders.iter().map(|order| order.price)),
    }
}

impl PersonSummary {
    #[expect(
        clippy::float_arithmetic,
        reason = "running totals of decimal prices are kept as f64"
    )]
    fn record(&mut self, order: &Order) {
        self.total_count += 1;
        self.total_cost += finite_or_zero(order.price);

        let signature = self
            .drinks
            .iter_mut()
            .find(|drink| drink.matches(order));
        match signature {
            Some(drink) => drink.count += 1,
            None => self.drinks.push(DrinkSignature {
                name: order.drink_name.clone(),
                size: order.drink_size.clone(),
                price: order.price,
                count: 1,
            }),
        }
    }
}

impl DrinkSignature {
    fn matches(&self, order: &Order) -> bool {
        self.name == order.drink_name
            && size_key(self.size.as_deref()) == size_key(order.drink_size.as_deref())
            && price_key(self.price) == price_key(order.price)
    }
}

fn size_key(size: Option<&str>) -> &str {
    size.filter(|label| !label.is_empty()).unwrap_or(NO_SIZE)
}

#[expect(
    clippy::float_arithmetic,
    reason = "totals of decimal prices are kept as f64"
)]
fn sum_prices(prices: impl Iterator<Item = f64>) -> f64 {
    prices
        .map(finite_or_zero)
        .fold(0.0, |total, price| total + price)
}

/// One line of the order log.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLogEntry {
    /// Order identifier, for removal.
    pub order_id: OrderId,
    /// Name of the person billed, or `"Unknown"`.
    pub person_name: String,
    /// Drink name at order time.
    pub drink_name: String,
    /// Drink size at order time.
    pub drink_size: Option<String>,
    /// Price at order time.
    pub price: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// The order log, most recent first, with person names resolved.
///
/// Orders sharing a timestamp keep their insertion order.
#[must_use]
pub fn order_log(orders: &[Order], people: &[Person]) -> Vec<OrderLogEntry> {
    let mut entries: Vec<OrderLogEntry> = orders
        .iter()
        .map(|order| OrderLogEntry {
            order_id: order.id.clone(),
            person_name: people
                .iter()
                .find(|person| person.id == order.person_id)
                .map_or_else(|| UNKNOWN_PERSON.to_owned(), |person| person.name.clone()),
            drink_name: order.drink_name.clone(),
            drink_size: order.drink_size.clone(),
            price: order.price,
            timestamp: order.timestamp,
        })
        .collect();
    entries.sort_by_key(|entry| Reverse(entry.timestamp));
    entries
}

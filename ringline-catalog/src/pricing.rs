use serde::{Deserialize, Serialize};

/// Service fee charged on top of the ticket subtotal.
pub const SERVICE_FEE_RATE: f64 = 0.05;

/// Price breakdown for a ticket order, in whole rubles.
///
/// The fee is rounded half-away-from-zero, matching what the booking page
/// shows the customer. This quote is advisory: the booking endpoint persists
/// the total the client submitted without re-deriving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub ticket_count: u32,
    pub price_per_ticket: i64,
    pub subtotal: i64,
    pub service_fee: i64,
    pub total: i64,
}

impl PriceQuote {
    pub fn for_tickets(ticket_count: u32, price_per_ticket: i64) -> Self {
        let subtotal = i64::from(ticket_count) * price_per_ticket;
        let service_fee = (subtotal as f64 * SERVICE_FEE_RATE).round() as i64;
        Self {
            ticket_count,
            price_per_ticket,
            subtotal,
            service_fee,
            total: subtotal + service_fee,
        }
    }
}

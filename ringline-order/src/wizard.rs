//! The 3-step booking wizard as an explicit typed state machine.
//!
//! State is owned by a `BookingWizard` value and every transition is a
//! method with a forward-only validation gate. Step 1 gates ticket count
//! and contact email, step 2 gates the payment details, step 3 assembles
//! the final draft. Going back never re-validates, and `reset` returns to
//! a blank step 1.
//!
//! All of this is cosmetic from the server's point of view; the API performs
//! its own checks.

use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use ringline_catalog::PriceQuote;

/// Per-order cap shown on the ticket stepper.
pub const MAX_TICKETS_PER_ORDER: u32 = 10;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static EXPIRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])/(\d{2})$").expect("expiry regex"));

/// Validation failures, with the popup strings the customer sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Укажите количество билетов")]
    MissingTicketCount,

    #[error("Максимальное количество билетов: {0}")]
    TooManyTickets(u32),

    #[error("Недостаточно мест! Доступно: {0}")]
    NotEnoughSeats(i32),

    #[error("Введите корректный email")]
    InvalidEmail,

    #[error("Введите корректный номер карты (13-19 цифр)")]
    InvalidCardNumber,

    #[error("Введите корректный срок действия карты в формате ММ/ГГ")]
    InvalidExpiry,

    #[error("Введите корректный CVV код (3 цифры)")]
    InvalidCvv,

    #[error("Введите имя владельца карты")]
    MissingCardHolder,

    #[error("Сначала заполните предыдущий шаг")]
    StepNotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Tickets,
    Payment,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payment {
    Card {
        number: String,
        expiry: String,
        cvv: String,
        holder: String,
    },
    /// Bank transfer by phone number; nothing to validate client-side.
    Sbp,
}

/// The tour facts the wizard validates against.
#[derive(Debug, Clone)]
pub struct TourContext {
    pub tour_id: i64,
    pub price: i64,
    pub available_seats: i32,
}

/// Everything collected across the three steps, ready to submit.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub tour_id: i64,
    pub ticket_count: u32,
    pub customer_email: String,
    pub payment: Payment,
    pub quote: PriceQuote,
}

#[derive(Debug)]
pub struct BookingWizard {
    tour: TourContext,
    step: Step,
    ticket_count: Option<u32>,
    customer_email: Option<String>,
    payment: Option<Payment>,
}

impl BookingWizard {
    pub fn new(tour: TourContext) -> Self {
        Self {
            tour,
            step: Step::Tickets,
            ticket_count: None,
            customer_email: None,
            payment: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Highest count the stepper will accept for this tour.
    pub fn max_tickets(&self) -> u32 {
        (self.tour.available_seats.max(0) as u32).min(MAX_TICKETS_PER_ORDER)
    }

    /// Live price breakdown for the currently entered count.
    pub fn quote(&self) -> PriceQuote {
        PriceQuote::for_tickets(self.ticket_count.unwrap_or(0), self.tour.price)
    }

    /// Step 1 gate: ticket count in [1, min(seats, 10)] and a plausible
    /// email. Advances to the payment step on success.
    pub fn submit_tickets(&mut self, ticket_count: u32, email: &str) -> Result<(), WizardError> {
        if ticket_count < 1 {
            return Err(WizardError::MissingTicketCount);
        }
        if !EMAIL_RE.is_match(email) {
            return Err(WizardError::InvalidEmail);
        }
        if ticket_count as i32 > self.tour.available_seats {
            return Err(WizardError::NotEnoughSeats(self.tour.available_seats));
        }
        if ticket_count > MAX_TICKETS_PER_ORDER {
            return Err(WizardError::TooManyTickets(self.max_tickets()));
        }

        self.ticket_count = Some(ticket_count);
        self.customer_email = Some(email.to_string());
        self.step = Step::Payment;
        Ok(())
    }

    /// Step 2 gate. Card details are pattern-checked; SBP passes through.
    pub fn submit_payment(&mut self, payment: Payment) -> Result<(), WizardError> {
        if self.step != Step::Payment {
            return Err(WizardError::StepNotReady);
        }
        if let Payment::Card {
            number,
            expiry,
            cvv,
            holder,
        } = &payment
        {
            validate_card_number(number)?;
            validate_expiry(expiry, Utc::now().date_naive())?;
            validate_cvv(cvv)?;
            if holder.trim().is_empty() {
                return Err(WizardError::MissingCardHolder);
            }
        }

        self.payment = Some(payment);
        self.step = Step::Confirm;
        Ok(())
    }

    /// Terminal step: hand back the assembled draft.
    pub fn confirm(&self) -> Result<BookingDraft, WizardError> {
        if self.step != Step::Confirm {
            return Err(WizardError::StepNotReady);
        }
        // Both are present once we reach Confirm.
        let ticket_count = self.ticket_count.ok_or(WizardError::StepNotReady)?;
        let customer_email = self
            .customer_email
            .clone()
            .ok_or(WizardError::StepNotReady)?;
        let payment = self.payment.clone().ok_or(WizardError::StepNotReady)?;

        Ok(BookingDraft {
            tour_id: self.tour.tour_id,
            ticket_count,
            customer_email,
            payment,
            quote: PriceQuote::for_tickets(ticket_count, self.tour.price),
        })
    }

    /// Backward navigation keeps entered values and never re-validates.
    pub fn back(&mut self) {
        self.step = match self.step {
            Step::Tickets | Step::Payment => Step::Tickets,
            Step::Confirm => Step::Payment,
        };
    }

    /// Popup closed: everything entered is discarded.
    pub fn reset(&mut self) {
        self.step = Step::Tickets;
        self.ticket_count = None;
        self.customer_email = None;
        self.payment = None;
    }
}

fn validate_card_number(number: &str) -> Result<(), WizardError> {
    let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() >= 13 && digits.len() <= 19 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(WizardError::InvalidCardNumber)
    }
}

fn validate_cvv(cvv: &str) -> Result<(), WizardError> {
    if cvv.len() == 3 && cvv.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(WizardError::InvalidCvv)
    }
}

/// MM/YY, not before `today`'s month.
fn validate_expiry(expiry: &str, today: NaiveDate) -> Result<(), WizardError> {
    let caps = EXPIRY_RE.captures(expiry).ok_or(WizardError::InvalidExpiry)?;
    let month: u32 = caps[1].parse().map_err(|_| WizardError::InvalidExpiry)?;
    let year: i32 = caps[2].parse().map_err(|_| WizardError::InvalidExpiry)?;

    let current_year = today.year() % 100;
    let current_month = today.month();

    if year < current_year || (year == current_year && month < current_month) {
        return Err(WizardError::InvalidExpiry);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard(seats: i32) -> BookingWizard {
        BookingWizard::new(TourContext {
            tour_id: 5,
            price: 3000,
            available_seats: seats,
        })
    }

    fn valid_card() -> Payment {
        Payment::Card {
            number: "4276 1600 0000 0002".to_string(),
            expiry: "12/99".to_string(),
            cvv: "123".to_string(),
            holder: "IVAN PETROV".to_string(),
        }
    }

    #[test]
    fn test_happy_path_card() {
        let mut w = wizard(8);
        w.submit_tickets(2, "user@mail.ru").unwrap();
        assert_eq!(w.step(), Step::Payment);

        w.submit_payment(valid_card()).unwrap();
        assert_eq!(w.step(), Step::Confirm);

        let draft = w.confirm().unwrap();
        assert_eq!(draft.ticket_count, 2);
        assert_eq!(draft.quote.subtotal, 6000);
        assert_eq!(draft.quote.service_fee, 300);
        assert_eq!(draft.quote.total, 6300);
    }

    #[test]
    fn test_sbp_needs_no_card_details() {
        let mut w = wizard(8);
        w.submit_tickets(1, "user@mail.ru").unwrap();
        w.submit_payment(Payment::Sbp).unwrap();
        assert!(w.confirm().is_ok());
    }

    #[test]
    fn test_step1_gates() {
        let mut w = wizard(8);
        assert_eq!(
            w.submit_tickets(0, "user@mail.ru"),
            Err(WizardError::MissingTicketCount)
        );
        assert_eq!(
            w.submit_tickets(1, "not-an-email"),
            Err(WizardError::InvalidEmail)
        );
        assert_eq!(
            w.submit_tickets(1, "a b@mail.ru"),
            Err(WizardError::InvalidEmail)
        );
        assert_eq!(
            w.submit_tickets(9, "user@mail.ru"),
            Err(WizardError::NotEnoughSeats(8))
        );
        // Still on step 1 after every rejection
        assert_eq!(w.step(), Step::Tickets);
    }

    #[test]
    fn test_ticket_cap_is_min_of_seats_and_ten() {
        let mut w = wizard(50);
        assert_eq!(w.max_tickets(), 10);
        assert_eq!(
            w.submit_tickets(11, "user@mail.ru"),
            Err(WizardError::TooManyTickets(10))
        );

        let w = wizard(4);
        assert_eq!(w.max_tickets(), 4);
    }

    #[test]
    fn test_step2_card_gates() {
        let mut w = wizard(8);
        w.submit_tickets(1, "user@mail.ru").unwrap();

        let short = Payment::Card {
            number: "1234 5678".to_string(),
            expiry: "12/99".to_string(),
            cvv: "123".to_string(),
            holder: "IVAN".to_string(),
        };
        assert_eq!(w.submit_payment(short), Err(WizardError::InvalidCardNumber));

        let bad_cvv = Payment::Card {
            number: "4276160000000002".to_string(),
            expiry: "12/99".to_string(),
            cvv: "12".to_string(),
            holder: "IVAN".to_string(),
        };
        assert_eq!(w.submit_payment(bad_cvv), Err(WizardError::InvalidCvv));

        let no_holder = Payment::Card {
            number: "4276160000000002".to_string(),
            expiry: "12/99".to_string(),
            cvv: "123".to_string(),
            holder: "   ".to_string(),
        };
        assert_eq!(
            w.submit_payment(no_holder),
            Err(WizardError::MissingCardHolder)
        );
    }

    #[test]
    fn test_expiry_validation() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        assert!(validate_expiry("08/26", today).is_ok());
        assert!(validate_expiry("12/26", today).is_ok());
        assert!(validate_expiry("01/30", today).is_ok());
        assert_eq!(
            validate_expiry("07/26", today),
            Err(WizardError::InvalidExpiry)
        );
        assert_eq!(
            validate_expiry("12/25", today),
            Err(WizardError::InvalidExpiry)
        );
        assert_eq!(
            validate_expiry("13/27", today),
            Err(WizardError::InvalidExpiry)
        );
        assert_eq!(
            validate_expiry("1/27", today),
            Err(WizardError::InvalidExpiry)
        );
    }

    #[test]
    fn test_forward_only_and_reset() {
        let mut w = wizard(8);
        // Cannot skip ahead
        assert_eq!(w.submit_payment(Payment::Sbp), Err(WizardError::StepNotReady));
        assert_eq!(w.confirm().unwrap_err(), WizardError::StepNotReady);

        w.submit_tickets(2, "user@mail.ru").unwrap();
        w.back();
        assert_eq!(w.step(), Step::Tickets);

        w.reset();
        assert_eq!(w.step(), Step::Tickets);
        assert_eq!(w.quote().subtotal, 0);
    }
}

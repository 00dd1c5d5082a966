pub mod pricing;
pub mod reviews;

pub use pricing::PriceQuote;
pub use reviews::{validate_rating, ReviewRuleError};

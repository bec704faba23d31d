//! Client-side form checks.
//!
//! Every check runs before a request is built so that bad input never
//! reaches the network. Messages are the ones shown inline in the forms.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use crate::error::ValidationError;
use crate::types::{CreateMarketRequest, Order, OrderStatus};

/// Lowest odds a market may offer on either side.
pub const MIN_ODDS: f64 = 1.1;

/// Largest accepted profile image.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Parse a user-typed amount. Must be a finite number above zero.
///
/// # Errors
///
/// [`ValidationError::NonPositiveAmount`] for blank, malformed, non-finite,
/// zero or negative input.
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    match input.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(ValidationError::NonPositiveAmount),
    }
}

fn ensure_positive(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount > 0.0 { Ok(()) } else { Err(ValidationError::NonPositiveAmount) }
}

/// A bet may not exceed the user's account token balance.
///
/// # Errors
///
/// Non-positive amount or insufficient balance.
pub fn check_bet(amount: f64, available: f64) -> Result<(), ValidationError> {
    ensure_positive(amount)?;
    if amount > available {
        return Err(ValidationError::InsufficientBalance { available });
    }
    Ok(())
}

/// Payout shown on the bet card before placing the order.
#[must_use]
pub fn potential_payout(amount: f64, odds: f64) -> f64 {
    amount * odds
}

/// # Errors
///
/// Non-positive amount or more than the wallet holds.
pub fn check_stake(amount: f64, wallet_balance: f64) -> Result<(), ValidationError> {
    ensure_positive(amount)?;
    if amount > wallet_balance {
        return Err(ValidationError::InsufficientWalletBalance);
    }
    Ok(())
}

/// # Errors
///
/// Non-positive amount or more than is staked.
pub fn check_unstake(amount: f64, staked: f64) -> Result<(), ValidationError> {
    ensure_positive(amount)?;
    if amount > staked {
        return Err(ValidationError::InsufficientStake);
    }
    Ok(())
}

/// Raw contents of the market creation form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketDraft {
    pub title: String,
    pub description: String,
    pub expiry_date: String,
    pub yes_odds: f64,
    pub no_odds: f64,
}

impl MarketDraft {
    /// Default odds pre-filled in the form.
    #[must_use]
    pub fn new() -> Self {
        Self { yes_odds: 2.0, no_odds: 2.0, ..Self::default() }
    }

    /// Validate and turn into a request body on behalf of `creator_id`.
    ///
    /// # Errors
    ///
    /// Blank title, missing expiry or odds under [`MIN_ODDS`].
    pub fn into_request(self, creator_id: i64) -> Result<CreateMarketRequest, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let expiry_date = self.expiry_date.trim();
        if expiry_date.is_empty() {
            return Err(ValidationError::MissingExpiry);
        }
        if !(self.yes_odds >= MIN_ODDS && self.no_odds >= MIN_ODDS) {
            return Err(ValidationError::OddsTooLow);
        }
        Ok(CreateMarketRequest {
            title: title.to_owned(),
            description: self.description.trim().to_owned(),
            expiry_date: expiry_date.to_owned(),
            yes_odds: self.yes_odds,
            no_odds: self.no_odds,
            creator_id,
        })
    }
}

/// Profile pictures must be images no larger than [`MAX_IMAGE_BYTES`].
///
/// # Errors
///
/// Non-image content type or oversize file.
pub fn check_image(content_type: &str, size: u64) -> Result<(), ValidationError> {
    if !content_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(ValidationError::NotAnImage);
    }
    if size > MAX_IMAGE_BYTES {
        return Err(ValidationError::FileTooLarge);
    }
    Ok(())
}

/// # Errors
///
/// Blank destination, non-positive amount or more than the account balance.
pub fn check_withdrawal(amount: f64, balance: f64, destination: &str) -> Result<(), ValidationError> {
    if destination.trim().is_empty() {
        return Err(ValidationError::MissingDestination);
    }
    ensure_positive(amount)?;
    if amount > balance {
        return Err(ValidationError::InsufficientBalance { available: balance });
    }
    Ok(())
}

/// # Errors
///
/// [`ValidationError::Required`] naming the first blank field.
pub fn require(fields: &[(&'static str, &str)]) -> Result<(), ValidationError> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some(&(name, _)) => Err(ValidationError::Required(name)),
        None => Ok(()),
    }
}

/// Tabs on the positions page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PositionFilter {
    #[default]
    All,
    Open,
    Settled,
}

impl PositionFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::Open, Self::Settled];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Open => "Open",
            Self::Settled => "Settled",
        }
    }

    #[must_use]
    pub fn matches(self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Open => order.status == OrderStatus::Open,
            Self::Settled => order.status == OrderStatus::Settled,
        }
    }

    /// Orders passing the filter, in their original order.
    #[must_use]
    pub fn apply(self, orders: &[Order]) -> Vec<Order> {
        orders.iter().filter(|o| self.matches(o)).cloned().collect()
    }
}

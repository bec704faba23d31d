//! Wire DTOs for the REST API.
//!
//! DESIGN
//! ======
//! Field names follow the server's camelCase JSON so records deserialize
//! directly. Timestamps stay as the ISO-8601 strings the server sends; the
//! view layer only ever formats them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};

/// The signed-in identity, mirrored into persistent storage.
///
/// This is also the shape of the server's user record, so `GET /users/{id}`
/// and the sign-in response both deserialize straight into it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Server user id.
    #[serde(rename = "id")]
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    /// Spendable platform tokens.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub token_balance: f64,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `POST /users/signin` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// `POST /users/signin` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "type", default = "default_token_type")]
    pub token_type: String,
    pub user: Session,
}

fn default_token_type() -> String {
    "Bearer".to_owned()
}

/// `POST /users/signup` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `POST /users/signup` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub token_balance: f64,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Partial profile sent with `PUT /users/{id}`. Absent fields are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketStatus {
    Active,
    Closed,
    Settled,
    Cancelled,
}

impl MarketStatus {
    /// Whether an admin may still settle the market.
    #[must_use]
    pub fn is_settleable(self) -> bool {
        matches!(self, Self::Active | Self::Closed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketOutcome {
    Yes,
    No,
    Void,
}

impl MarketOutcome {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Void => "VOID",
        }
    }
}

/// A prediction market.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: MarketStatus,
    pub expiry_date: String,
    #[serde(deserialize_with = "null_as_zero")]
    pub yes_odds: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub no_odds: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_yes_stake: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_no_stake: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_volume: f64,
    #[serde(default)]
    pub creator_id: Option<i64>,
    #[serde(default)]
    pub creator_username: Option<String>,
    #[serde(default)]
    pub outcome: Option<MarketOutcome>,
    #[serde(default)]
    pub settled_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Market {
    /// Odds offered for `side`.
    #[must_use]
    pub fn odds_for(&self, side: OrderSide) -> f64 {
        match side {
            OrderSide::Yes => self.yes_odds,
            OrderSide::No => self.no_odds,
        }
    }
}

/// `POST /markets` body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMarketRequest {
    pub title: String,
    pub description: String,
    pub expiry_date: String,
    pub yes_odds: f64,
    pub no_odds: f64,
    pub creator_id: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Yes,
    No,
}

impl OrderSide {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Open,
    Settled,
    Cancelled,
}

/// A bet placed on a market.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<String>,
    pub market_id: i64,
    #[serde(default)]
    pub market_title: Option<String>,
    pub side: OrderSide,
    #[serde(deserialize_with = "null_as_zero")]
    pub stake_amount: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub odds: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub potential_payout: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub settled_amount: Option<f64>,
    #[serde(default)]
    pub settled_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `POST /orders` body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub user_id: i64,
    pub wallet_address: String,
    pub market_id: i64,
    pub side: OrderSide,
    pub stake_amount: f64,
}

/// `POST /settlement/settle` body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleMarketRequest {
    pub market_id: i64,
    pub outcome: MarketOutcome,
}

/// `GET /lll/balance/{address}` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub wallet_address: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub lll_balance: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub staked_amount: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_earned: f64,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// `GET /lll/staking/{address}` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingInfo {
    pub wallet_address: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub staked_amount: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub lll_balance: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_earned: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub estimated_rewards: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub apy: f64,
}

/// `POST /lll/stake` and `POST /lll/unstake` body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeRequest {
    pub wallet_address: String,
    pub amount: f64,
}

/// `POST /lll/stake` and `POST /lll/unstake` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingResponse {
    #[serde(default)]
    pub transaction_signature: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /lll/rewards/claim` body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRewardRequest {
    pub wallet_address: String,
    pub amount: f64,
    pub reward_type: String,
}

/// Reward endpoints response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardResponse {
    #[serde(default)]
    pub transaction_signature: Option<String>,
    #[serde(default)]
    pub reward_amount: Option<f64>,
    #[serde(default)]
    pub reward_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /files/upload` response. `success` arrives as `"true"`/`"false"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(deserialize_with = "bool_from_string_or_bool")]
    pub success: bool,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /users/{id}/withdraw` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawResponse {
    #[serde(deserialize_with = "bool_from_string_or_bool")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub new_balance: Option<String>,
}

/// `GET /users/{id}/deposit-address` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAddress {
    pub wallet_address: String,
    #[serde(default)]
    pub token_mint: Option<String>,
}

/// `POST /users/{id}/check-deposit` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositCheck {
    #[serde(deserialize_with = "bool_from_string_or_bool")]
    pub success: bool,
    #[serde(default)]
    pub on_chain_balance: Option<f64>,
    #[serde(default)]
    pub in_app_balance: Option<f64>,
    #[serde(default)]
    pub difference: Option<f64>,
    #[serde(default)]
    pub has_deposit: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn bool_from_string_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(flag) => Ok(flag),
        serde_json::Value::String(raw) => match raw.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(D::Error::custom(format!("expected boolean string, got {other:?}"))),
        },
        _ => Err(D::Error::custom("expected boolean")),
    }
}

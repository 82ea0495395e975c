//! Types for authentication and the cached user snapshot

use serde::{Deserialize, Serialize};

use crate::token::TokenPair;

/// Where the member stands with their membership dues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Pending,
}

/// User snapshot captured at login or hydration.
///
/// The auth subsystem never mutates this piecemeal; profile edits go through
/// a separate flow and only land here on the next login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "fullName")]
    pub full_name: String,

    pub email: String,

    pub phone: Option<String>,

    #[serde(rename = "profilePicture")]
    pub profile_picture: Option<String>,

    #[serde(rename = "isAdmin")]
    pub is_admin: bool,

    #[serde(rename = "paymentStatus")]
    pub payment_status: PaymentStatus,
}

/// Credentials for password sign-in
#[derive(Debug, Serialize)]
pub struct SignInCredentials {
    pub email: String,
    pub password: String,
}

/// Successful authentication response from the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user
    pub user: User,

    /// The issued token pair
    #[serde(flatten)]
    pub tokens: TokenPair,
}

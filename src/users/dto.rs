use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "isRegistered")]
    pub is_registered: bool,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub nickname: String,
    pub email: String,
    pub profile_image: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub email: String,
}

/// Plain confirmation body, shared with the favorites endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

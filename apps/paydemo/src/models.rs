use serde::{Deserialize, Serialize};

// ── Request types ──

#[derive(Debug, Deserialize)]
pub struct PayQuery {
    pub order_id: i64,
    /// Minor currency units.
    pub amount: i64,
    pub currency: Option<String>,
    pub return_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub return_url: String,
}

// ── Outcome ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Failed,
    Canceled,
}

impl PaymentStatus {
    /// `success` pays, `fail` fails, anything else cancels.
    pub fn from_action(action: &str) -> Self {
        match action {
            "success" => PaymentStatus::Paid,
            "fail" => PaymentStatus::Failed,
            _ => PaymentStatus::Canceled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Canceled => "canceled",
        }
    }
}

// ── JSON envelope ──

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_mapping() {
        assert_eq!(PaymentStatus::from_action("success"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_action("fail"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from_action("cancel"), PaymentStatus::Canceled);
        assert_eq!(PaymentStatus::from_action(""), PaymentStatus::Canceled);
        assert_eq!(PaymentStatus::from_action("SUCCESS"), PaymentStatus::Canceled);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(PaymentStatus::Paid.as_str(), "paid");
        assert_eq!(PaymentStatus::Failed.as_str(), "failed");
        assert_eq!(PaymentStatus::Canceled.as_str(), "canceled");
    }
}

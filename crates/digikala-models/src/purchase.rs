use serde::{Deserialize, Serialize};

/// Whether the reviewer bought the product through Digikala
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Buyer,
    NotBuyer,
    /// The API said nothing about the purchase
    #[default]
    Unknown,
}

impl PurchaseStatus {
    pub fn from_flag(is_buyer: bool) -> Self {
        if is_buyer {
            PurchaseStatus::Buyer
        } else {
            PurchaseStatus::NotBuyer
        }
    }

    /// Interpret the free-form `purchase_status` string sent by the API
    pub fn from_api_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "" => PurchaseStatus::Unknown,
            "not_buyer" | "not_bought" | "not_purchased" | "non_buyer" => PurchaseStatus::NotBuyer,
            "buyer" | "bought" | "purchased" | "is_buyer" => PurchaseStatus::Buyer,
            _ => PurchaseStatus::Unknown,
        }
    }

    /// Text written to the purchase status column; empty when unknown
    pub fn as_label(&self) -> &'static str {
        match self {
            PurchaseStatus::Buyer => "buyer",
            PurchaseStatus::NotBuyer => "not buyer",
            PurchaseStatus::Unknown => "",
        }
    }
}

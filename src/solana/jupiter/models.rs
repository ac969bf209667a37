use serde::{Deserialize, Serialize};

// Entry of the Jupiter token list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterToken {
    pub address: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub decimals: u8,
}

// Error body returned by the Jupiter API
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// Priority fee options
#[derive(Debug, Clone)]
pub enum PrioritizationFeeLamports {
    PriorityLevelWithMaxLamports { priority_level: String, max_lamports: u64 },
}

// Wire form of PrioritizationFeeLamports
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PrioritizationFeeLamportsWrapper {
    #[serde(rename_all = "camelCase")]
    PriorityLevel {
        priority_level_with_max_lamports: PriorityLevelWithMaxLamports,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityLevelWithMaxLamports {
    pub max_lamports: u64,
    pub priority_level: String,
}

impl From<PrioritizationFeeLamports> for PrioritizationFeeLamportsWrapper {
    fn from(fee: PrioritizationFeeLamports) -> Self {
        match fee {
            PrioritizationFeeLamports::PriorityLevelWithMaxLamports {
                priority_level,
                max_lamports,
            } => PrioritizationFeeLamportsWrapper::PriorityLevel {
                priority_level_with_max_lamports: PriorityLevelWithMaxLamports {
                    max_lamports,
                    priority_level,
                },
            },
        }
    }
}

// Swap-build request; the quote is forwarded exactly as received
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest<'a> {
    pub quote_response: &'a serde_json::Value,
    pub user_public_key: String,
    pub dynamic_compute_unit_limit: bool,
    pub prioritization_fee_lamports: PrioritizationFeeLamportsWrapper,
}

// Swap-build response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub swap_transaction: String,
    pub last_valid_block_height: u64,
}

// Module for reading integer amounts the API sends as strings or numbers
pub mod string_or_u64 {
    use serde::{self, Deserializer};
    use std::fmt;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrU64;

        impl<'de> serde::de::Visitor<'de> for StringOrU64 {
            type Value = u64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an unsigned integer or a string containing one")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse::<u64>().map_err(serde::de::Error::custom)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value)
            }
        }

        deserializer.deserialize_any(StringOrU64)
    }
}

// Fields the client reads out of an otherwise opaque quote
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteAmounts {
    #[serde(deserialize_with = "string_or_u64::deserialize")]
    pub out_amount: u64,
}

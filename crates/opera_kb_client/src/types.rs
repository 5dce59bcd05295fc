//! Webhook request/response types. Client ↔ webhook JSON.

use serde::{Deserialize, Serialize};

/// Market filter sent with every question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Br,
    De,
    En,
    Tr,
    Fr,
    #[default]
    All,
}

impl Market {
    pub const ALL: [Market; 6] = [
        Market::All,
        Market::Br,
        Market::De,
        Market::En,
        Market::Tr,
        Market::Fr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Br => "br",
            Market::De => "de",
            Market::En => "en",
            Market::Tr => "tr",
            Market::Fr => "fr",
            Market::All => "all",
        }
    }
}

impl std::str::FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "br" => Ok(Market::Br),
            "de" => Ok(Market::De),
            "en" => Ok(Market::En),
            "tr" => Ok(Market::Tr),
            "fr" => Ok(Market::Fr),
            "all" => Ok(Market::All),
            other => Err(format!(
                "unknown market: {} (expected one of {})",
                other,
                Market::ALL.map(|m| m.as_str()).join(", ")
            )),
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product filter sent with every question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Desktop,
    Mobile,
    Air,
    Neon,
    Spotify,
    General,
    #[default]
    All,
}

impl Product {
    pub const ALL: [Product; 7] = [
        Product::All,
        Product::Desktop,
        Product::Mobile,
        Product::Air,
        Product::Neon,
        Product::Spotify,
        Product::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Desktop => "desktop",
            Product::Mobile => "mobile",
            Product::Air => "air",
            Product::Neon => "neon",
            Product::Spotify => "spotify",
            Product::General => "general",
            Product::All => "all",
        }
    }
}

impl std::str::FromStr for Product {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(Product::Desktop),
            "mobile" => Ok(Product::Mobile),
            "air" => Ok(Product::Air),
            "neon" => Ok(Product::Neon),
            "spotify" => Ok(Product::Spotify),
            "general" => Ok(Product::General),
            "all" => Ok(Product::All),
            other => Err(format!(
                "unknown product: {} (expected one of {})",
                other,
                Product::ALL.map(|p| p.as_str()).join(", ")
            )),
        }
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client → webhook: chat request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub question: &'a str,
    pub market: Market,
    pub product: Product,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

impl<'a> ChatRequest<'a> {
    pub fn new(
        question: &'a str,
        market: Market,
        product: Product,
        session_id: Option<&'a str>,
    ) -> Self {
        Self {
            question,
            market,
            product,
            session_id,
        }
    }
}

/// Webhook → client: answer payload. Returned verbatim by the request
/// client; failure is carried in `success`/`error`, never an Err.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default)]
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<GroundingChunk>>,
    #[serde(rename = "tokenUsage", default, skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Token accounting reported by the generation backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub candidates_tokens: u64,
    pub total_tokens: u64,
}

/// Opaque citation fragment from the retrieval backend. Passed through to
/// the UI untouched; the source extractor only parses the free-text answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(
        rename = "retrievedContext",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub retrieved_context: Option<RetrievedContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

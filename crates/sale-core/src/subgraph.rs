//! Sale lookups against the protocol subgraph.

use crate::error::{Result, SaleError};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str =
    "https://api.thegraph.com/subgraphs/name/beehive-innovation/rain-protocol-v2-polygon";

pub const DEFAULT_SALE_ID: &str = "0x0373075943f72ad01ea98a92caa58e2cca439572";

/// Selects exactly the fields rendered by [`SaleRecord::render`].
pub const SALE_QUERY: &str = r#"query Sale($id: ID!) {
  sale(id: $id) {
    address
    factory {
      id
    }
    token {
      name
      symbol
    }
    reserve {
      name
      symbol
    }
    unitsAvailable
    totalRaised
    percentRaised
    saleStatus
  }
}"#;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub address: String,
    #[serde(default)]
    pub factory: Option<FactoryRef>,
    pub token: TokenInfo,
    pub reserve: TokenInfo,
    pub units_available: String,
    pub total_raised: String,
    pub percent_raised: String,
    #[serde(default, deserialize_with = "de_status")]
    pub sale_status: Option<i64>,
}

/// Sale lifecycle as indexed by the subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleStatus {
    Pending,
    Active,
    Success,
    Fail,
}

impl SaleStatus {
    pub fn from_code(code: i64) -> Option<SaleStatus> {
        match code {
            0 => Some(SaleStatus::Pending),
            1 => Some(SaleStatus::Active),
            2 => Some(SaleStatus::Success),
            3 => Some(SaleStatus::Fail),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Active => "active",
            SaleStatus::Success => "success",
            SaleStatus::Fail => "fail",
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// The subgraph has served saleStatus both as an Int and as a string.
fn de_status<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("saleStatus out of range: {n}"))),
        Some(serde_json::Value::String(s)) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("saleStatus is not a number: {s}"))),
        Some(other) => Err(D::Error::custom(format!(
            "unexpected saleStatus value: {other}"
        ))),
    }
}

impl SaleRecord {
    pub fn status(&self) -> Option<SaleStatus> {
        self.sale_status.and_then(SaleStatus::from_code)
    }

    fn status_display(&self) -> String {
        match (self.status(), self.sale_status) {
            (Some(s), _) => s.to_string(),
            (None, Some(raw)) => format!("unknown ({raw})"),
            (None, None) => "unknown".to_string(),
        }
    }

    /// Plain-text summary, one field per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Sale: {} ({})\n", self.token.name, self.token.symbol));
        out.push_str(&format!(
            "Raising: {} ({})\n",
            self.reserve.name, self.reserve.symbol
        ));
        out.push_str(&format!("Status: {}\n", self.status_display()));
        out.push_str(&format!("Percent Raised: {}\n", self.percent_raised));
        out.push_str(&format!("Total Raised: {}\n", self.total_raised));
        out.push_str(&format!("Units Available: {}\n", self.units_available));
        out.push_str(&format!("Contract Address: {}\n", self.address));
        if let Some(factory) = &self.factory {
            out.push_str(&format!("Factory: {}\n", factory.id));
        }
        out
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<SaleData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct SaleData {
    sale: Option<SaleRecord>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

// ---------------------------------------------------------------------------
// SubgraphClient
// ---------------------------------------------------------------------------

pub struct SubgraphClient {
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl SubgraphClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("rainsale/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch one sale by id. Subgraph ids are lowercase hex.
    pub fn fetch_sale(&self, id: &str) -> Result<SaleRecord> {
        let id = id.trim().to_ascii_lowercase();
        let body = serde_json::json!({
            "query": SALE_QUERY,
            "variables": { "id": id },
        });
        debug!(endpoint = %self.endpoint, sale = %id, "querying subgraph");

        let resp = self.http.post(&self.endpoint).json(&body).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SaleError::SubgraphStatus {
                status: status.as_u16(),
                body: resp.text().unwrap_or_default(),
            });
        }

        let text = resp.text()?;
        let parsed: GraphqlResponse = serde_json::from_str(&text)?;
        if !parsed.errors.is_empty() {
            let messages: Vec<_> = parsed.errors.into_iter().map(|e| e.message).collect();
            return Err(SaleError::Subgraph(messages.join("; ")));
        }

        let sale = parsed
            .data
            .and_then(|d| d.sale)
            .ok_or_else(|| SaleError::SaleNotFound(id.clone()))?;
        debug!(?sale, "sale record");
        Ok(sale)
    }
}

use serde::{Deserialize, Serialize};

use crate::paginate::PageItem;

/// Registry metadata shared by every deployed instance of an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// A deployed on-chain agent instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInstance {
    pub id: String,
    /// Unix seconds of the most recent activity, when the API reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    pub agent: AgentSummary,
}

/// An on-chain transaction attributed to an agent instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_hash: String,
    pub chain: String,
    /// Unix seconds.
    pub timestamp: i64,
    #[serde(default)]
    pub link: String,
    pub agent_instance: AgentInstance,
}

impl PageItem for AgentInstance {
    fn identity(&self) -> &str {
        &self.id
    }
}

impl PageItem for Transaction {
    fn identity(&self) -> &str {
        &self.transaction_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_instance_from_wire() {
        let instance: AgentInstance = serde_json::from_value(json!({
            "id": "306",
            "timestamp": 1732406400,
            "agent": {
                "name": "Prediction Market Oracle",
                "description": "Trades prediction markets",
                "codeUri": "ipfs://bafy...",
                "image": "https://example.com/306.png"
            }
        }))
        .unwrap();

        assert_eq!(instance.identity(), "306");
        assert_eq!(instance.agent.name, "Prediction Market Oracle");
        assert_eq!(instance.agent.code_uri.as_deref(), Some("ipfs://bafy..."));
        assert_eq!(instance.agent.balance, None);
    }

    #[test]
    fn test_transaction_identity_is_hash() {
        let tx: Transaction = serde_json::from_value(json!({
            "transactionHash": "0xabc",
            "chain": "gnosis",
            "timestamp": 1732406400,
            "link": "https://gnosisscan.io/tx/0xabc",
            "agentInstance": {
                "id": "306",
                "agent": { "name": "Oracle" }
            }
        }))
        .unwrap();

        assert_eq!(tx.identity(), "0xabc");
        assert_eq!(tx.chain, "gnosis");
    }
}

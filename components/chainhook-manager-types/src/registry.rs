use crate::definition::ChainhookDefinition;

/// Maximum page size the remote registry accepts on list requests.
pub const MAX_CHAINHOOKS_PAGE_LIMIT: u64 = 60;

/// The registry's view of a definition after acceptance. Owned and mutated
/// exclusively by the registry; clients read it fresh on every list/get and
/// never cache it beyond a single response lifetime.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisteredChainhook {
    pub uuid: String,
    pub definition: ChainhookDefinition,
    #[serde(default)]
    pub status: ChainhookStatus,
}

/// Lifecycle data maintained by the registry as the chain is evaluated.
/// Every field tolerates absence in remote payloads, and registry-supplied
/// values are relayed uninterpreted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChainhookStatus {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub occurrence_count: u64,
    #[serde(default)]
    pub evaluated_block_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ChainhookListResponse {
    #[serde(default)]
    pub chainhooks: Vec<RegisteredChainhook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// A raw page request as supplied by a caller. Values are signed on purpose:
/// out-of-range input is accepted and bounded by [ChainhookPagination::clamped]
/// before anything is sent to the registry.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainhookPagination {
    pub offset: i64,
    pub limit: i64,
}

impl ChainhookPagination {
    pub fn new(offset: i64, limit: i64) -> Self {
        ChainhookPagination { offset, limit }
    }

    /// The values actually forwarded to the registry: `offset >= 0` and
    /// `0 <= limit <= 60`, regardless of the raw input. The registry is not
    /// assumed to perform this bounding itself.
    pub fn clamped(&self) -> (u64, u64) {
        let offset = self.offset.max(0) as u64;
        let limit = self.limit.clamp(0, MAX_CHAINHOOKS_PAGE_LIMIT as i64) as u64;
        (offset, limit)
    }
}

impl Default for ChainhookPagination {
    fn default() -> Self {
        ChainhookPagination {
            offset: 0,
            limit: MAX_CHAINHOOKS_PAGE_LIMIT as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0, 0, (0, 0); "zero zero")]
    #[test_case(0, 60, (0, 60); "upper bound kept")]
    #[test_case(0, 61, (0, 60); "limit clamped to max")]
    #[test_case(0, 100, (0, 60); "limit clamped from 100")]
    #[test_case(0, i64::MAX, (0, 60); "huge limit clamped")]
    #[test_case(0, -1, (0, 0); "negative limit clamped to zero")]
    #[test_case(-5, 10, (0, 10); "negative offset clamped to zero")]
    #[test_case(i64::MIN, i64::MIN, (0, 0); "all underflow clamped")]
    #[test_case(42, 30, (42, 30); "in range passthrough")]
    #[test_case(i64::MAX, 10, (i64::MAX as u64, 10); "huge offset kept")]
    fn it_clamps_page_requests(offset: i64, limit: i64, expected: (u64, u64)) {
        assert_eq!(ChainhookPagination::new(offset, limit).clamped(), expected);
    }

    #[test]
    fn it_tolerates_partial_list_payloads() {
        let response: ChainhookListResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.chainhooks.is_empty());
        assert!(response.total.is_none());
    }

    #[test]
    fn it_tolerates_partial_status_payloads() {
        let registered: RegisteredChainhook = serde_json::from_value(json!({
            "uuid": "0c2e9cde-4b66-4c2d-b7d2-5ddc79f1c4ab",
            "definition": {
                "version": "1",
                "name": "my-first-chainhook",
                "chain": "stacks",
                "network": "mainnet",
                "filters": { "events": [ { "type": "contract_deploy" } ] },
                "action": { "type": "http_post", "url": "https://example.com/hook" },
            },
        }))
        .unwrap();
        assert!(!registered.status.enabled);
        assert_eq!(registered.status.status, "");
        assert_eq!(registered.status.occurrence_count, 0);
        assert_eq!(registered.status.evaluated_block_count, 0);
        // options omitted remotely fall back to the documented defaults
        assert!(registered.definition.options.decode_clarity_values);
    }
}

//! Mock JSON-RPC endpoints for the wallet, factory and flow tests.

use alloy::primitives::{Address, B256};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

/// Answer every `method` call with `result`, echoing the request id.
pub async fn rpc_mock(server: &mut ServerGuard, method: &str, result: Value) -> Mock {
    rpc_mock_matching(
        server,
        Matcher::PartialJson(json!({ "method": method })),
        result,
    )
    .await
}

pub async fn rpc_mock_matching(server: &mut ServerGuard, body: Matcher, result: Value) -> Mock {
    server
        .mock("POST", "/")
        .match_body(body)
        .with_header("content-type", "application/json")
        .with_body_from_request(move |req| {
            let id = request_id(req);
            json!({ "jsonrpc": "2.0", "id": id, "result": result })
                .to_string()
                .into_bytes()
        })
        .create_async()
        .await
}

pub async fn rpc_error_mock(
    server: &mut ServerGuard,
    method: &str,
    code: i64,
    message: &str,
) -> Mock {
    let message = message.to_string();
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": method })))
        .with_header("content-type", "application/json")
        .with_body_from_request(move |req| {
            let id = request_id(req);
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": code, "message": message },
            })
            .to_string()
            .into_bytes()
        })
        .create_async()
        .await
}

fn request_id(req: &mockito::Request) -> Value {
    req.body()
        .ok()
        .and_then(|body| serde_json::from_slice::<Value>(body).ok())
        .map(|v| v["id"].clone())
        .unwrap_or(Value::Null)
}

/// A full `eth_getTransactionReceipt` result.
pub fn receipt_json(tx_hash: B256, block: u64, success: bool, logs: Vec<Value>) -> Value {
    let logs: Vec<Value> = logs
        .into_iter()
        .enumerate()
        .map(|(i, mut log)| {
            log["blockHash"] = json!(B256::repeat_byte(0xbb));
            log["blockNumber"] = json!(format!("{block:#x}"));
            log["transactionHash"] = json!(tx_hash);
            log["transactionIndex"] = json!("0x0");
            log["logIndex"] = json!(format!("{i:#x}"));
            log["removed"] = json!(false);
            log
        })
        .collect();
    json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": logs,
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": format!("{block:#x}"),
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": Address::repeat_byte(0xaa),
        "to": Address::repeat_byte(0xf0),
        "contractAddress": null,
    })
}

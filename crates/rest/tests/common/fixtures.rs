//! Request body fixtures.

use serde_json::{Value, json};

/// A business log as a producer would post it.
pub fn business_log(system_code: &str, operation_type: &str, market_id: i64) -> Value {
    json!({
        "systemCode": system_code,
        "businessId": 100,
        "businessType": "order",
        "businessCode": "SO-100",
        "operationType": operation_type,
        "operatorId": 7,
        "operatorName": "alice",
        "marketId": market_id,
        "content": "order updated"
    })
}

/// `count` business logs with creation times one second apart, oldest first.
pub fn dated_business_logs(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let mut log = business_log("CRM", "add", 1);
            log["createTime"] = json!(format!("2024-01-01T00:{:02}:{:02}Z", i / 60, i % 60));
            log["businessId"] = json!(i);
            log
        })
        .collect()
}

/// A customer account log as a producer would post it.
pub fn account_log(amount: i64) -> Value {
    let mut log = business_log("ACCOUNT", "add", 1);
    log["fundItemId"] = json!(12);
    log["fundItemName"] = json!("deposit");
    log["amount"] = json!(amount);
    log
}

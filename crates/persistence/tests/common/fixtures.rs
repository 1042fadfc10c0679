//! Log fixtures.

use chrono::{DateTime, Duration, TimeZone, Utc};

use bizlog_persistence::types::{CustomerAccountLog, LogRecord};

/// Reference instant for fixtures; record `n` is `n` seconds later.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// A stored business log with a fixed id, created `id` seconds after
/// [`base_time`].
pub fn stored_record(id: i64) -> LogRecord {
    let mut record = LogRecord::new()
        .with_system_code(if id % 2 == 0 { "CRM" } else { "ERP" })
        .with_business_id(id)
        .with_business_type("order")
        .with_operation_type("add")
        .with_operation_type_text("Create")
        .with_market_id(id % 3)
        .with_create_time(base_time() + Duration::seconds(id));
    record.id = Some(id);
    record
}

/// `count` stored records with ids `1..=count`.
pub fn stored_records(count: i64) -> Vec<LogRecord> {
    (1..=count).map(stored_record).collect()
}

/// A record as a producer would submit it.
pub fn submitted_record(operation_type: &str) -> LogRecord {
    LogRecord::new()
        .with_system_code("CRM")
        .with_operator_id(7)
        .with_business_id(100)
        .with_business_type("order")
        .with_business_code("SO-100")
        .with_operation_type(operation_type)
        .with_market_id(1)
        .with_content("order updated")
}

/// A customer account log as a producer would submit it.
pub fn submitted_account_log(amount: i64) -> CustomerAccountLog {
    CustomerAccountLog::new(submitted_record("add"))
        .with_fund_item(12, "deposit")
        .with_amount(amount)
}

/// Ids of the given records, in order.
pub fn ids(records: &[LogRecord]) -> Vec<i64> {
    records.iter().filter_map(|r| r.id).collect()
}

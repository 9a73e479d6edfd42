use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};
use service::errors::ServiceError;

// Prometheus metrics (default registry)
pub static USER_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "company_registry_user_operations_total",
        "User record operations by outcome",
        &["operation", "outcome"]
    )
    .expect("register user_operations_total")
});

pub static UNIQUE_CONFLICTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "company_registry_unique_conflicts_total",
        "Writes rejected because an identifier is already taken",
        &["field"]
    )
    .expect("register unique_conflicts_total")
});

fn outcome_label(e: &ServiceError) -> &'static str {
    match e {
        ServiceError::Validation(_) | ServiceError::Model(_) => "invalid",
        ServiceError::Conflict(_) => "conflict",
        ServiceError::NotFound(_) => "not_found",
        ServiceError::Db(_) => "error",
    }
}

/// Count one finished operation.
pub fn record<T>(operation: &str, result: &Result<T, ServiceError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => outcome_label(e),
    };
    if let Err(ServiceError::Conflict(key)) = result {
        UNIQUE_CONFLICTS_TOTAL.with_label_values(&[key.name()]).inc();
    }
    USER_OPERATIONS_TOTAL.with_label_values(&[operation, outcome]).inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_outcomes_show_up_in_exposition() {
        record::<()>("find_one", &Err(ServiceError::NotFound("User not found".into())));
        record("find_all", &Ok::<_, ServiceError>(()));
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains(r#"company_registry_user_operations_total{operation="find_one",outcome="not_found"}"#));
        assert!(body.contains(r#"operation="find_all",outcome="ok""#));
    }
}

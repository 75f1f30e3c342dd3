/// Prometheus metrics for bet placement, settlement and wallet review
use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Bets accepted (labels: bet_type=2D|3D)
    pub static ref BETS_PLACED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "betting_bets_placed_total",
        "Total number of bets placed",
        &["bet_type"]
    )
    .expect("Prometheus metrics registration should succeed at startup");

    /// Bets settled (labels: outcome=won|lost)
    pub static ref BETS_SETTLED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "betting_bets_settled_total",
        "Total number of bets settled by result publication",
        &["outcome"]
    )
    .expect("Prometheus metrics registration should succeed at startup");

    /// Admin decisions on wallet requests (labels: kind, status)
    pub static ref WALLET_REVIEWS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "betting_wallet_reviews_total",
        "Total number of reviewed deposit and withdrawal requests",
        &["kind", "status"]
    )
    .expect("Prometheus metrics registration should succeed at startup");
}

pub fn record_bet_placed(bet_type: &str) {
    BETS_PLACED_TOTAL.with_label_values(&[bet_type]).inc();
}

pub fn record_settlement(won: u64, lost: u64) {
    BETS_SETTLED_TOTAL.with_label_values(&["won"]).inc_by(won);
    BETS_SETTLED_TOTAL.with_label_values(&["lost"]).inc_by(lost);
}

pub fn record_wallet_review(kind: &str, status: &str) {
    WALLET_REVIEWS_TOTAL.with_label_values(&[kind, status]).inc();
}

/// Render every metric in the default registry
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_exported() {
        record_bet_placed("2D");
        record_settlement(1, 2);
        record_wallet_review("deposit", "approved");

        let families = prometheus::gather();
        let names: Vec<&str> = families.iter().map(|f| f.get_name()).collect();
        assert!(names.contains(&"betting_bets_placed_total"));
        assert!(names.contains(&"betting_bets_settled_total"));
        assert!(names.contains(&"betting_wallet_reviews_total"));
    }
}

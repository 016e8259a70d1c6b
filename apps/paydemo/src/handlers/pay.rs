use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use std::sync::Arc;
use url::Url;

use crate::{models::*, page, AppState};

/// GET /pay — render the demo payment page for an order.
pub async fn pay_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PayQuery>,
) -> Html<String> {
    let currency = query
        .currency
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(&state.default_currency);

    tracing::info!(
        order_id = query.order_id,
        amount = query.amount,
        "Payment page opened"
    );

    Html(page::render_payment_page(
        query.order_id,
        query.amount,
        currency,
        query.return_url.as_deref().unwrap_or(""),
    ))
}

/// POST /pay/submit — turn the pressed button into a status and redirect.
pub async fn pay_submit(Form(form): Form<SubmitForm>) -> Response {
    let status = PaymentStatus::from_action(&form.action);
    tracing::info!(order_id = %form.order_id, status = status.as_str(), "Payment submitted");

    if !form.return_url.is_empty() {
        return found(&return_location(&form.return_url, status, &form.order_id));
    }

    match status {
        PaymentStatus::Paid => found("/result/success"),
        _ => found("/result/fail"),
    }
}

/// GET /result/success
pub async fn result_success() -> Html<&'static str> {
    Html(page::RESULT_SUCCESS)
}

/// GET /result/fail
pub async fn result_fail() -> Html<&'static str> {
    Html(page::RESULT_FAIL)
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Append `status` and `order_id` to the caller's return URL.
fn return_location(return_url: &str, status: PaymentStatus, order_id: &str) -> String {
    if let Ok(mut url) = Url::parse(return_url) {
        url.query_pairs_mut()
            .append_pair("status", status.as_str())
            .append_pair("order_id", order_id);
        return url.into();
    }

    // Relative or otherwise unparsable: append the query as text.
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("status", status.as_str())
        .append_pair("order_id", order_id)
        .finish();
    let sep = if return_url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", return_url, sep, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_location_absolute() {
        assert_eq!(
            return_location("https://t.me/demo_bot", PaymentStatus::Paid, "123"),
            "https://t.me/demo_bot?status=paid&order_id=123"
        );
    }

    #[test]
    fn test_return_location_keeps_existing_query() {
        assert_eq!(
            return_location("https://shop.test/back?x=1", PaymentStatus::Failed, "9"),
            "https://shop.test/back?x=1&status=failed&order_id=9"
        );
    }

    #[test]
    fn test_return_location_relative() {
        assert_eq!(
            return_location("/done", PaymentStatus::Canceled, "5"),
            "/done?status=canceled&order_id=5"
        );
        assert_eq!(
            return_location("/done?a=b", PaymentStatus::Paid, "5"),
            "/done?a=b&status=paid&order_id=5"
        );
    }
}

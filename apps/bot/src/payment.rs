use url::Url;

/// Link to the demo payment page for an order.
pub fn payment_link(
    base_url: &str,
    order_id: i64,
    amount: i64,
    currency: &str,
    return_url: &str,
) -> anyhow::Result<Url> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("PUBLIC_PAY_BASE_URL cannot be a base: {}", base_url))?
        .pop_if_empty()
        .push("pay");
    url.query_pairs_mut()
        .append_pair("order_id", &order_id.to_string())
        .append_pair("amount", &amount.to_string())
        .append_pair("currency", currency)
        .append_pair("return_url", return_url);
    Ok(url)
}

/// Where the payment page sends the user back to: the bot's t.me link.
pub fn bot_return_url(bot_username: &str) -> String {
    format!("https://t.me/{}", bot_username.trim_start_matches('@'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_link_query() {
        let url = payment_link(
            "http://localhost:9088",
            123,
            6000,
            "BGN",
            &bot_return_url("demo_bot"),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9088/pay?order_id=123&amount=6000&currency=BGN&return_url=https%3A%2F%2Ft.me%2Fdemo_bot"
        );
    }

    #[test]
    fn test_payment_link_keeps_base_path() {
        let url = payment_link("https://example.com/demo/", 1, 100, "EUR", "x").unwrap();
        assert_eq!(url.path(), "/demo/pay");
    }

    #[test]
    fn test_payment_link_base_without_trailing_slash() {
        let url = payment_link("https://example.com/demo", 1, 100, "EUR", "x").unwrap();
        assert_eq!(url.path(), "/demo/pay");
        assert_eq!(url.query(), Some("order_id=1&amount=100&currency=EUR&return_url=x"));
    }

    #[test]
    fn test_payment_link_bad_base() {
        assert!(payment_link("not a url", 1, 100, "EUR", "x").is_err());
        assert!(payment_link("mailto:pay@example.com", 1, 100, "EUR", "x").is_err());
    }

    #[test]
    fn test_return_url_strips_at() {
        assert_eq!(bot_return_url("@demo_bot"), "https://t.me/demo_bot");
    }
}

//! HTML pages, embedded at compile time.

const PAYMENT_TEMPLATE: &str = include_str!("../templates/payment.html");
pub const RESULT_SUCCESS: &str = include_str!("../templates/result_success.html");
pub const RESULT_FAIL: &str = include_str!("../templates/result_fail.html");

/// Minor units to "60.00 BGN".
pub fn format_amount(minor: i64, currency: &str) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{}{}.{:02} {}", sign, abs / 100, abs % 100, currency)
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_payment_page(order_id: i64, amount: i64, currency: &str, return_url: &str) -> String {
    PAYMENT_TEMPLATE
        .replace("{{AMOUNT}}", &escape_html(&format_amount(amount, currency)))
        .replace("{{ORDER_ID}}", &order_id.to_string())
        .replace("{{RETURN_URL}}", &escape_html(return_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(6000, "BGN"), "60.00 BGN");
        assert_eq!(format_amount(5, "EUR"), "0.05 EUR");
        assert_eq!(format_amount(-199, "EUR"), "-1.99 EUR");
    }

    #[test]
    fn test_render_fills_placeholders() {
        let html = render_payment_page(123, 6000, "BGN", "https://t.me/demo_bot");
        assert!(html.contains("60.00 BGN"));
        assert!(html.contains(r#"name="order_id" value="123""#));
        assert!(html.contains(r#"name="return_url" value="https://t.me/demo_bot""#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_form_posts_relative_to_page() {
        // Resolves to <base>/pay/submit when served under a path prefix.
        let html = render_payment_page(1, 100, "BGN", "");
        assert!(html.contains(r#"action="pay/submit""#));
        assert!(!html.contains(r#"action="/pay/submit""#));
    }

    #[test]
    fn test_render_escapes_return_url() {
        let html = render_payment_page(1, 100, "BGN", r#"x"><script>alert(1)</script>"#);
        assert!(!html.contains("<script>"));
        assert!(html.contains("x&quot;&gt;&lt;script&gt;"));
    }
}

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use crate::models::{Booking, Service};

const MONTHS: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня",
    "июля", "августа", "сентября", "октября", "ноября", "декабря",
];

/// "2 марта"
pub fn format_date_ru(date: NaiveDate) -> String {
    let month = MONTHS.get(date.month0() as usize).unwrap_or(&"???");
    format!("{} {}", date.day(), month)
}

fn weekday_short_ru(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Пн",
        Weekday::Tue => "Вт",
        Weekday::Wed => "Ср",
        Weekday::Thu => "Чт",
        Weekday::Fri => "Пт",
        Weekday::Sat => "Сб",
        Weekday::Sun => "Вс",
    }
}

/// "Пн, 2 марта"
pub fn format_day_label(date: NaiveDate) -> String {
    format!("{}, {}", weekday_short_ru(date.weekday()), format_date_ru(date))
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn currency_label(code: &str) -> &str {
    match code {
        "BGN" => "лв.",
        "EUR" => "€",
        "RUB" => "₽",
        "USD" => "$",
        other => other,
    }
}

/// Minor units to "60.00 лв.".
pub fn format_price(minor: i64, currency: &str) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!(
        "{}{}.{:02} {}",
        sign,
        abs / 100,
        abs % 100,
        currency_label(currency)
    )
}

pub fn price_list(services: &[Service], currency: &str) -> String {
    if services.is_empty() {
        return "Список услуг пока пуст.".into();
    }
    let mut text = "💰 <b>Цены</b>\n\n".to_string();
    for s in services {
        text.push_str(&format!(
            "• {} — {} ({} мин)\n",
            escape_html(&s.name),
            format_price(s.price, currency),
            s.duration
        ));
    }
    text
}

pub fn booking_line(b: &Booking, currency: &str) -> String {
    format!(
        "📋 <b>#{}</b> {}\n📅 {} · {} — {}\n💰 {}\n",
        b.id,
        escape_html(&b.service_name),
        format_date_ru(b.start.date()),
        format_time(b.start.time()),
        format_time(b.end.time()),
        format_price(b.price, currency),
    )
}

pub fn my_bookings_text(bookings: &[Booking], currency: &str) -> String {
    if bookings.is_empty() {
        return "У вас пока нет активных записей.".into();
    }
    let mut text = "📋 <b>Ваши записи:</b>\n\n".to_string();
    for b in bookings {
        text.push_str(&booking_line(b, currency));
        text.push('\n');
    }
    text
}

pub fn booking_created_text(b: &Booking, currency: &str) -> String {
    format!(
        "✅ <b>Запись создана</b>\n\n{}\nЗаказ #{} ожидает оплаты. Нажмите кнопку ниже, \
         чтобы перейти к демо-оплате.",
        booking_line(b, currency),
        b.order_id,
    )
}

/// Minimal escaping for Telegram HTML parse mode.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

use chrono::{NaiveDate, NaiveTime};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

use crate::actions::Action;
use crate::format::{format_day_label, format_price, format_time};
use crate::models::{Booking, Service};

const DATES_PER_ROW: usize = 2;
const TIMES_PER_ROW: usize = 4;

fn button(text: impl Into<String>, action: Action) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.to_string())
}

fn back_to_menu() -> Vec<InlineKeyboardButton> {
    vec![button("⬅️ В меню", Action::Menu)]
}

pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("📝 Записаться", Action::Services)],
        vec![
            button("💰 Цены", Action::Prices),
            button("📋 Мои записи", Action::MyBookings),
        ],
    ])
}

pub fn menu_only() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![back_to_menu()])
}

pub fn services(services: &[Service], currency: &str) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = services
        .iter()
        .map(|s| {
            vec![button(
                format!("{} · {}", s.name, format_price(s.price, currency)),
                Action::Service(s.id),
            )]
        })
        .collect();
    rows.push(back_to_menu());
    InlineKeyboardMarkup::new(rows)
}

pub fn dates(dates: &[NaiveDate]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = dates
        .chunks(DATES_PER_ROW)
        .map(|chunk| {
            chunk
                .iter()
                .map(|d| button(format_day_label(*d), Action::Date(*d)))
                .collect()
        })
        .collect();
    rows.push(vec![button("⬅️ К услугам", Action::Services)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn times(times: &[NaiveTime]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = times
        .chunks(TIMES_PER_ROW)
        .map(|chunk| {
            chunk
                .iter()
                .map(|t| button(format_time(*t), Action::Time(*t)))
                .collect()
        })
        .collect();
    rows.push(vec![button("⬅️ К датам", Action::BackToDates)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn pay(link: Url) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::url("💳 Оплатить (демо)", link)],
        back_to_menu(),
    ])
}

pub fn my_bookings(bookings: &[Booking]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = bookings
        .iter()
        .map(|b| {
            vec![button(
                format!("❌ Отменить #{} ({})", b.id, b.start.format("%d.%m %H:%M")),
                Action::Cancel(b.id),
            )]
        })
        .collect();
    rows.push(back_to_menu());
    InlineKeyboardMarkup::new(rows)
}

use teloxide::{
    prelude::*,
    types::{InlineKeyboardMarkup, ParseMode},
    utils::command::BotCommands,
};

use crate::{
    actions::Action,
    config::Config,
    format::*,
    keyboards,
    models::{CancelOutcome, NewBooking},
    payment::{bot_return_url, payment_link},
    session::{SessionKey, SessionStore},
    slots::{slots_for_date, upcoming_dates},
    storage::JsonStore,
};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "Главное меню")]
    Start,
    #[command(description = "Цены")]
    Price,
    #[command(description = "Мои записи")]
    My,
    #[command(description = "Помощь")]
    Help,
}

pub struct BotState {
    pub config: Config,
    pub store: JsonStore,
    pub sessions: SessionStore,
}

const WELCOME: &str = "👋 Привет! Это демо-бот записи.\n\n\
                       Выберите услугу, дату и время, а затем оплатите заказ на демо-странице.";

// ── Command handlers ──

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: &BotState,
) -> anyhow::Result<()> {
    let user_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0);
    tracing::debug!(user_id, chat_id = msg.chat.id.0, "command received");

    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, WELCOME)
                .reply_markup(keyboards::main_menu())
                .await?;
        }

        Command::Price => {
            let services = state.store.services().await?;
            bot.send_message(msg.chat.id, price_list(&services, &state.config.currency))
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboards::menu_only())
                .await?;
        }

        Command::My => {
            let bookings = state.store.active_bookings(user_id).await?;
            bot.send_message(
                msg.chat.id,
                my_bookings_text(&bookings, &state.config.currency),
            )
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboards::my_bookings(&bookings))
            .await?;
        }

        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
    }

    Ok(())
}

// ── Callback query handler (inline button clicks) ──

pub async fn handle_callback(bot: Bot, q: CallbackQuery, state: &BotState) -> anyhow::Result<()> {
    let data = q.data.as_deref().unwrap_or("");
    let user_id = q.from.id.0 as i64;

    let Some(key) = q.message.as_ref().map(|m| (m.chat().id, m.id())) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let action: Action = match data.parse() {
        Ok(action) => action,
        Err(e) => {
            tracing::warn!(user_id, "{}", e);
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        }
    };
    tracing::debug!(user_id, %action, "callback received");

    match action {
        Action::Menu => {
            state.sessions.clear(key).await;
            show(&bot, key, WELCOME.to_string(), keyboards::main_menu()).await?;
        }

        Action::Services => {
            let services = state.store.services().await?;
            if services.is_empty() {
                return alert(&bot, &q, "Список услуг пока пуст").await;
            }
            state.sessions.begin(key).await;
            show(
                &bot,
                key,
                "Выберите услугу:".into(),
                keyboards::services(&services, &state.config.currency),
            )
            .await?;
        }

        Action::Prices => {
            let services = state.store.services().await?;
            show(
                &bot,
                key,
                price_list(&services, &state.config.currency),
                keyboards::menu_only(),
            )
            .await?;
        }

        Action::MyBookings => {
            show_my_bookings(&bot, key, user_id, state).await?;
        }

        Action::Service(service_id) => {
            let Some(service) = state.store.service(service_id).await? else {
                return alert(&bot, &q, "Услуга не найдена").await;
            };
            if state.sessions.choose_service(key, service_id).await.is_none() {
                return session_expired(&bot, &q, key).await;
            }
            show_dates(&bot, key, &escape_html(&service.name), state).await?;
        }

        Action::BackToDates => {
            let service_id = state.sessions.get(key).await.and_then(|s| s.service_id);
            let Some(service_id) = service_id else {
                return session_expired(&bot, &q, key).await;
            };
            let Some(service) = state.store.service(service_id).await? else {
                return alert(&bot, &q, "Услуга не найдена").await;
            };
            show_dates(&bot, key, &escape_html(&service.name), state).await?;
        }

        Action::Date(date) => {
            let Some(selection) = state.sessions.choose_date(key, date).await else {
                return session_expired(&bot, &q, key).await;
            };
            let service_id = selection.service_id.unwrap_or_default();
            let Some(service) = state.store.service(service_id).await? else {
                return alert(&bot, &q, "Услуга не найдена").await;
            };

            let now = chrono::Local::now().naive_local();
            let times = slots_for_date(&state.config.window, service.duration, date, now);
            let text = if times.is_empty() {
                format!(
                    "💅 {}\n📅 {}\n\nНа этот день свободного времени нет.",
                    escape_html(&service.name),
                    format_day_label(date)
                )
            } else {
                format!(
                    "💅 {}\n📅 {}\n\nВыберите время:",
                    escape_html(&service.name),
                    format_day_label(date)
                )
            };
            show(&bot, key, text, keyboards::times(&times)).await?;
        }

        Action::Time(time) => {
            let Some(done) = state.sessions.complete(key, time).await else {
                return session_expired(&bot, &q, key).await;
            };
            let Some(service) = state.store.service(done.service_id).await? else {
                return alert(&bot, &q, "Услуга не найдена").await;
            };

            let booking = state
                .store
                .create_booking(NewBooking {
                    user_id,
                    service,
                    start: done.date.and_time(done.time),
                })
                .await?;

            let link = payment_link(
                &state.config.pay_base_url,
                booking.order_id,
                booking.price,
                &state.config.currency,
                &bot_return_url(&state.config.bot_username),
            )?;

            show(
                &bot,
                key,
                booking_created_text(&booking, &state.config.currency),
                keyboards::pay(link),
            )
            .await?;
        }

        Action::Cancel(booking_id) => {
            let notice = match state.store.cancel_booking(user_id, booking_id).await? {
                CancelOutcome::Canceled(b) => format!("✅ Запись #{} отменена", b.id),
                CancelOutcome::AlreadyCanceled(b) => format!("Запись #{} уже отменена", b.id),
                CancelOutcome::NotFound => "Запись не найдена".to_string(),
            };
            bot.answer_callback_query(q.id.clone()).text(notice).await?;
            show_my_bookings(&bot, key, user_id, state).await?;
            return Ok(());
        }
    }

    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

// ── Views ──

async fn show(
    bot: &Bot,
    (chat_id, message_id): SessionKey,
    text: String,
    keyboard: InlineKeyboardMarkup,
) -> anyhow::Result<()> {
    bot.edit_message_text(chat_id, message_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

async fn show_dates(
    bot: &Bot,
    key: SessionKey,
    service_name: &str,
    state: &BotState,
) -> anyhow::Result<()> {
    let today = chrono::Local::now().date_naive();
    let dates = upcoming_dates(today, state.config.days_ahead);
    show(
        bot,
        key,
        format!("💅 {}\n\nВыберите дату:", service_name),
        keyboards::dates(&dates),
    )
    .await
}

async fn show_my_bookings(
    bot: &Bot,
    key: SessionKey,
    user_id: i64,
    state: &BotState,
) -> anyhow::Result<()> {
    let bookings = state.store.active_bookings(user_id).await?;
    show(
        bot,
        key,
        my_bookings_text(&bookings, &state.config.currency),
        keyboards::my_bookings(&bookings),
    )
    .await
}

async fn alert(bot: &Bot, q: &CallbackQuery, text: &str) -> anyhow::Result<()> {
    bot.answer_callback_query(q.id.clone())
        .text(text)
        .show_alert(true)
        .await?;
    Ok(())
}

/// The selection for this message is gone (restart, or the flow was left).
async fn session_expired(bot: &Bot, q: &CallbackQuery, key: SessionKey) -> anyhow::Result<()> {
    tracing::info!(chat_id = key.0 .0, "stale booking session");
    alert(bot, q, "Сессия устарела, начните запись заново").await?;
    show(bot, key, WELCOME.to_string(), keyboards::main_menu()).await
}

//! Inline button payloads.
//!
//! Telegram limits callback data to 64 bytes, so payloads are short
//! `tag` or `tag:value` strings.

use chrono::{NaiveDate, NaiveTime};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Menu,
    Services,
    Prices,
    MyBookings,
    BackToDates,
    Service(i64),
    Date(NaiveDate),
    Time(NaiveTime),
    Cancel(i64),
}

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Menu => write!(f, "menu"),
            Action::Services => write!(f, "services"),
            Action::Prices => write!(f, "prices"),
            Action::MyBookings => write!(f, "my"),
            Action::BackToDates => write!(f, "back:dates"),
            Action::Service(id) => write!(f, "svc:{}", id),
            Action::Date(d) => write!(f, "date:{}", d.format(DATE_FMT)),
            Action::Time(t) => write!(f, "time:{}", t.format(TIME_FMT)),
            Action::Cancel(id) => write!(f, "cancel:{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown callback payload {:?}", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownAction(s.to_string());

        let action = match s.split_once(':') {
            None => match s {
                "menu" => Action::Menu,
                "services" => Action::Services,
                "prices" => Action::Prices,
                "my" => Action::MyBookings,
                _ => return Err(unknown()),
            },
            Some(("back", "dates")) => Action::BackToDates,
            Some(("svc", id)) => Action::Service(id.parse().map_err(|_| unknown())?),
            Some(("cancel", id)) => Action::Cancel(id.parse().map_err(|_| unknown())?),
            Some(("date", d)) => {
                Action::Date(NaiveDate::parse_from_str(d, DATE_FMT).map_err(|_| unknown())?)
            }
            Some(("time", t)) => {
                Action::Time(NaiveTime::parse_from_str(t, TIME_FMT).map_err(|_| unknown())?)
            }
            Some(_) => return Err(unknown()),
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_tags() {
        assert_eq!("menu".parse(), Ok(Action::Menu));
        assert_eq!("services".parse(), Ok(Action::Services));
        assert_eq!("prices".parse(), Ok(Action::Prices));
        assert_eq!("my".parse(), Ok(Action::MyBookings));
        assert_eq!("back:dates".parse(), Ok(Action::BackToDates));
    }

    #[test]
    fn test_parse_time_keeps_colon() {
        assert_eq!(
            "time:10:30".parse(),
            Ok(Action::Time(NaiveTime::from_hms_opt(10, 30, 0).unwrap()))
        );
    }

    #[test]
    fn test_parse_date_and_ids() {
        assert_eq!(
            "date:2026-03-02".parse(),
            Ok(Action::Date(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()))
        );
        assert_eq!("svc:4".parse(), Ok(Action::Service(4)));
        assert_eq!("cancel:12".parse(), Ok(Action::Cancel(12)));
    }

    #[test]
    fn test_display_matches_parse() {
        let action = Action::Time(NaiveTime::from_hms_opt(9, 5, 0).unwrap());
        assert_eq!(action.to_string(), "time:09:05");
        assert_eq!(action.to_string().parse(), Ok(action));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("".parse::<Action>().is_err());
        assert!("svc:abc".parse::<Action>().is_err());
        assert!("date:2026-13-01".parse::<Action>().is_err());
        assert!("time:25:00".parse::<Action>().is_err());
        assert!("paydemo".parse::<Action>().is_err());
        assert!("back:menu".parse::<Action>().is_err());
    }
}

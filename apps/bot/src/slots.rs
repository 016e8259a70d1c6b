use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Working hours shared by every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl Default for DailyWindow {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(19, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

fn minutes_of_day(t: NaiveTime) -> u32 {
    t.num_seconds_from_midnight() / 60
}

/// Candidate start times for a service of `duration_min` minutes.
///
/// Back-to-back slots from opening time; the last one ends at or before closing.
/// Existing bookings are not taken into account.
pub fn day_slots(window: &DailyWindow, duration_min: u32) -> Vec<NaiveTime> {
    let open = minutes_of_day(window.open);
    let close = minutes_of_day(window.close);
    if duration_min == 0 || open >= close {
        return Vec::new();
    }

    (open..)
        .step_by(duration_min as usize)
        .take_while(|start| start.checked_add(duration_min).is_some_and(|end| end <= close))
        .filter_map(|m| NaiveTime::from_hms_opt(m / 60, m % 60, 0))
        .collect()
}

/// Slots for `date`, dropping start times already in the past at `now`.
pub fn slots_for_date(
    window: &DailyWindow,
    duration_min: u32,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Vec<NaiveTime> {
    let mut slots = day_slots(window, duration_min);
    if date == now.date() {
        slots.retain(|t| *t > now.time());
    } else if date < now.date() {
        slots.clear();
    }
    slots
}

/// `days` consecutive dates starting at `today`.
pub fn upcoming_dates(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..u64::from(days))
        .filter_map(|d| today.checked_add_days(Days::new(d)))
        .collect()
}

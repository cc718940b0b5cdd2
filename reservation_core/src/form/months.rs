use crate::models::ShootingMonth;
use chrono::{Local, NaiveDate};
use serde::Serialize;

/// Number of months offered, current month included.
pub const PICKLIST_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    pub value: ShootingMonth,
    pub label: String,
}

/// Twelve consecutive months starting at the month containing `today`.
pub fn month_options(today: NaiveDate) -> Vec<MonthOption> {
    std::iter::successors(Some(ShootingMonth::from_date(today)), |month| Some(month.next()))
        .take(PICKLIST_LEN)
        .map(|value| MonthOption {
            label: value.label(),
            value,
        })
        .collect()
}

pub fn current_month_options() -> Vec<MonthOption> {
    month_options(Local::now().date_naive())
}

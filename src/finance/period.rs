use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Whether a report compares months or years.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    Monthly,
    Yearly,
}

serde_plain::derive_display_from_serialize!(ViewType);
serde_plain::derive_fromstr_from_deserialize!(ViewType);

/// Headings for the two sides of a comparison, e.g. `2024年5月` and `2024年4月`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct PeriodLabel {
    pub current: String,
    pub previous: String,
}

/// Builds the current and previous period labels.
///
/// For a monthly view with a `reference_month`, the labels are that month and the month before
/// it. Otherwise they are the year of `reference_year` and the year before.
pub fn format_period_label(
    reference_year: NaiveDate,
    reference_month: Option<NaiveDate>,
    view_type: ViewType,
) -> PeriodLabel {
    match (view_type, reference_month) {
        (ViewType::Monthly, Some(month)) => {
            let (year, month) = (month.year(), month.month());
            let (prev_year, prev_month) = if month == 1 {
                (year - 1, 12)
            } else {
                (year, month - 1)
            };
            PeriodLabel {
                current: format!("{year}年{month}月"),
                previous: format!("{prev_year}年{prev_month}月"),
            }
        }
        _ => {
            let year = reference_year.year();
            PeriodLabel {
                current: format!("{year}年"),
                previous: format!("{}年", year - 1),
            }
        }
    }
}

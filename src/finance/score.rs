use crate::finance::ComparisonData;
use serde::Serialize;

impl ComparisonData {
    /// A 0 to 100 summary of how the current period did against the previous one.
    ///
    /// Starts from 50. Rising income and balance raise it while rising expense lowers it. Each
    /// field's contribution is capped.
    pub fn score(&self) -> u8 {
        let rates = self.change_rates;
        let mut score = 50.0;
        score += weigh(rates.income, 0.5, 20.0, 0.3, 15.0);
        score += weigh(rates.expense.saturating_neg(), 0.6, 25.0, 0.4, 20.0);
        score += weigh(rates.balance, 0.3, 15.0, 0.4, 20.0);
        let rounded: f64 = score.round();
        rounded.clamp(0.0, 100.0) as u8
    }

    pub fn rating(&self) -> Rating {
        Rating::from_score(self.score())
    }
}

/// Signed contribution of one rate: positive rates give `min(rate * up, up_cap)`, negative rates
/// give `-min(|rate| * down, down_cap)`.
fn weigh(rate: i64, up: f64, up_cap: f64, down: f64, down_cap: f64) -> f64 {
    let r = rate as f64;
    if rate > 0 {
        (r * up).min(up_cap)
    } else if rate < 0 {
        -(r.abs() * down).min(down_cap)
    } else {
        0.0
    }
}

/// The band a comparison score falls in.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Poor,
    Fair,
    Standard,
    Good,
    Excellent,
}

impl Rating {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Rating::Excellent,
            65..=79 => Rating::Good,
            50..=64 => Rating::Standard,
            35..=49 => Rating::Fair,
            _ => Rating::Poor,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rating::Excellent => "優秀な家計管理です！",
            Rating::Good => "良好な状態を維持しています",
            Rating::Standard => "標準的な状態です",
            Rating::Fair => "改善の余地があります",
            Rating::Poor => "要注意：見直しが必要です",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Rating::Excellent => "🎉",
            Rating::Good => "👍",
            Rating::Standard => "📊",
            Rating::Fair => "⚠️",
            Rating::Poor => "🚨",
        }
    }
}

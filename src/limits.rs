//! Closed ranges accepted for each loan input.

pub const MIN_PRINCIPAL: f64 = 5000.00;
pub const MAX_PRINCIPAL: f64 = 2000000.00;
pub const MIN_DURATION: u32 = 3;
pub const MAX_DURATION: u32 = 40;
pub const MIN_APR: f64 = 0.010;
pub const MAX_APR: f64 = 0.250;

pub const MONTHS_PER_YEAR: u32 = 12;

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits {
    pub min_years: u32,
    pub max_years: u32,
    pub min_rate: f64,
    pub max_rate: f64,
    pub min_principal: f64,
    pub max_principal: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_years: MIN_DURATION,
            max_years: MAX_DURATION,
            min_rate: MIN_APR,
            max_rate: MAX_APR,
            min_principal: MIN_PRINCIPAL,
            max_principal: MAX_PRINCIPAL,
        }
    }
}

impl Limits {
    pub fn years_ok(&self, years: i64) -> bool {
        years >= i64::from(self.min_years) && years <= i64::from(self.max_years)
    }

    pub fn rate_ok(&self, rate: f64) -> bool {
        rate >= self.min_rate && rate <= self.max_rate
    }

    pub fn principal_ok(&self, principal: f64) -> bool {
        principal >= self.min_principal && principal <= self.max_principal
    }
}

use log::{info, trace};

use crate::input::{check_principal, check_rate, check_years, InputError};
use crate::limits::{Limits, MONTHS_PER_YEAR};

// final balances smaller than a cent are floating-point residue, not debt
const RESIDUAL_TOLERANCE: f64 = 0.01;

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanTerms {
    pub duration_months: u32,
    pub annual_rate: f64,
    pub principal: f64,
}

impl LoanTerms {
    /// Validates all three inputs against `limits` before building the terms.
    pub fn new(
        years: u32,
        annual_rate: f64,
        principal: f64,
        limits: &Limits,
    ) -> Result<Self, InputError> {
        let years = check_years(i64::from(years), limits)?;
        Ok(Self {
            duration_months: years * MONTHS_PER_YEAR,
            annual_rate: check_rate(annual_rate, limits)?,
            principal: check_principal(principal, limits)?,
        })
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / f64::from(MONTHS_PER_YEAR)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaymentPlan {
    pub monthly_payment: f64,
}

impl PaymentPlan {
    pub fn for_terms(terms: &LoanTerms) -> Self {
        let monthly_payment =
            monthly_payment(terms.duration_months, terms.principal, terms.annual_rate);
        info!(
            "{} months at {} on {:.2}: monthly payment {:.4}",
            terms.duration_months, terms.annual_rate, terms.principal, monthly_payment
        );
        Self { monthly_payment }
    }
}

/// Fixed payment that retires `principal` over `duration_months` at `annual_rate / 12`.
///
/// `principal * r * (1+r)^n / ((1+r)^n - 1)`, with `(1+r)^n - 1` taken through
/// `exp_m1(n * ln_1p(r))` so small rates keep their precision. A zero rate
/// degrades to straight-line repayment.
pub fn monthly_payment(duration_months: u32, principal: f64, annual_rate: f64) -> f64 {
    if duration_months == 0 {
        return principal;
    }
    let n = f64::from(duration_months);
    let rate = annual_rate / f64::from(MONTHS_PER_YEAR);
    if rate == 0. {
        return principal / n;
    }

    let growth = (n * rate.ln_1p()).exp_m1(); // (1+r)^n - 1
    principal * rate * (growth + 1.) / growth
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleRow {
    pub period: u32,
    pub payment: f64,
    pub beginning_balance: f64,
    pub interest: f64,
    pub principal: f64,
    pub balance: f64,
}

/// Month-by-month amortization, one `ScheduleRow` per period.
///
/// The schedule owns its running balance and cannot be rewound; build a new
/// one from the terms to start over.
#[derive(Clone, Debug)]
pub struct Schedule {
    monthly_rate: f64,
    payment: f64,
    duration_months: u32,
    period: u32,
    balance: f64,
}

impl Schedule {
    pub fn new(terms: &LoanTerms, plan: &PaymentPlan) -> Self {
        Self {
            monthly_rate: terms.monthly_rate(),
            payment: plan.monthly_payment,
            duration_months: terms.duration_months,
            period: 0,
            balance: terms.principal,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    fn remaining(&self) -> usize {
        (self.duration_months - self.period) as usize
    }
}

impl Iterator for Schedule {
    type Item = ScheduleRow;

    fn next(&mut self) -> Option<ScheduleRow> {
        if self.period >= self.duration_months {
            return None;
        }
        self.period += 1;

        let beginning_balance = self.balance;
        let interest = self.monthly_rate * beginning_balance;
        let principal = self.payment - interest;
        let mut balance = beginning_balance - principal;

        let last = self.period == self.duration_months;
        if last && balance != 0. && balance.abs() < RESIDUAL_TOLERANCE {
            trace!("clearing final residual {:e}", balance);
            balance = 0.;
        }
        self.balance = balance;

        trace!(
            "pmt # {}, interest {}, principal {}, end bal {}",
            self.period,
            interest,
            principal,
            balance
        );

        Some(ScheduleRow {
            period: self.period,
            payment: self.payment,
            beginning_balance,
            interest,
            principal,
            balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Schedule {}

/// Runs the whole schedule, adding each period's interest to `totals`.
pub fn generate_schedule(
    terms: &LoanTerms,
    plan: &PaymentPlan,
    totals: &mut LoanTotals,
) -> Vec<ScheduleRow> {
    Schedule::new(terms, plan)
        .inspect(|row| totals.add_interest(row.interest))
        .collect()
}

/// Running sums for one loan. `settle` hands back the finished figures and
/// leaves the accumulator at zero for the next loan.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanTotals {
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_cost: f64,
}

impl LoanTotals {
    pub fn record_principal(&mut self, principal: f64) {
        self.total_principal = principal;
    }

    pub fn add_interest(&mut self, interest: f64) {
        self.total_interest += interest;
    }

    pub fn settle(&mut self) -> LoanTotals {
        self.total_cost = self.total_interest + self.total_principal;
        let settled = *self;
        *self = LoanTotals::default();
        info!(
            "totals: interest {:.2}, principal {:.2}, cost {:.2}",
            settled.total_interest, settled.total_principal, settled.total_cost
        );
        settled
    }

    pub fn is_clear(&self) -> bool {
        *self == LoanTotals::default()
    }
}

/// Everything derived from one set of terms.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Amortization {
    pub terms: LoanTerms,
    pub plan: PaymentPlan,
    pub rows: Vec<ScheduleRow>,
    pub totals: LoanTotals,
}

pub fn amortize(terms: &LoanTerms) -> Amortization {
    let mut totals = LoanTotals::default();
    totals.record_principal(terms.principal);

    let plan = PaymentPlan::for_terms(terms);
    let rows = generate_schedule(terms, &plan, &mut totals);

    Amortization {
        terms: *terms,
        plan,
        rows,
        totals: totals.settle(),
    }
}

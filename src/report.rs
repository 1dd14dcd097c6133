//! Text rendering of a computed loan. Nothing here does arithmetic beyond
//! rounding to two decimals for display.

use std::fmt;
use std::io::{self, Write};

use crate::loan::{LoanTotals, PaymentPlan, ScheduleRow};

pub const TABLE_HEADER: &str = "|_Mnt___Int_________Princ_______Balance__|";
pub const TABLE_FOOTER: &str = "|________________________________________|";

const TOTAL_LABEL_WIDTH: usize = 29;

impl fmt::Display for ScheduleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {:03} | {:8.2} | {:8.2} | {:10.2} |",
            self.period, self.interest, self.principal, self.balance
        )
    }
}

impl fmt::Display for PaymentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Monthly Payment: ${:.2}", self.monthly_payment)
    }
}

impl fmt::Display for LoanTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = [
            ("Total Interest Cost:", self.total_interest),
            ("Total Principal Cost:", self.total_principal),
            ("Total Cost:", self.total_cost),
        ];
        for (i, (label, amount)) in lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:<w$}${:10.2}", label, amount, w = TOTAL_LABEL_WIDTH)?;
        }
        Ok(())
    }
}

pub fn write_schedule<W: Write>(out: &mut W, rows: &[ScheduleRow]) -> io::Result<()> {
    writeln!(out, "{}", TABLE_HEADER)?;
    for row in rows {
        writeln!(out, "{}", row)?;
    }
    writeln!(out, "{}", TABLE_FOOTER)
}

/// Payment line, schedule table, then totals, separated the way the
/// interactive session shows them.
pub fn write_report<W: Write>(
    out: &mut W,
    plan: &PaymentPlan,
    rows: &[ScheduleRow],
    totals: &LoanTotals,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", plan)?;
    write_schedule(out, rows)?;
    writeln!(out, "{}", totals)?;
    writeln!(out)?;
    out.flush()
}

use log::{debug, info};
use std::io::{BufRead, Write};

use crate::input::{Entry, InputError, Prompter};
use crate::limits::Limits;
use crate::loan::{generate_schedule, LoanTerms, LoanTotals, PaymentPlan};
use crate::report::write_report;

/// Asks for loans and prints their schedules until the sentinel (or end of
/// input) is reached. Returns how many schedules were produced.
pub fn run<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    limits: Limits,
) -> Result<u32, InputError> {
    let mut prompter = Prompter::new(reader, writer, limits);
    let mut totals = LoanTotals::default();
    let mut loans = 0;

    loop {
        let Entry::Value(duration_months) = prompter.duration_months()? else {
            break;
        };
        let Entry::Value(annual_rate) = prompter.annual_rate()? else {
            break;
        };
        let Entry::Value(principal) = prompter.principal(&mut totals)? else {
            break;
        };

        let terms = LoanTerms {
            duration_months,
            annual_rate,
            principal,
        };
        debug!("accepted {:?}", terms);

        let plan = PaymentPlan::for_terms(&terms);
        let rows = generate_schedule(&terms, &plan, &mut totals);
        let settled = totals.settle();
        write_report(prompter.writer_mut(), &plan, &rows, &settled)?;
        loans += 1;
    }

    info!("session finished after {} schedule(s)", loans);
    Ok(loans)
}

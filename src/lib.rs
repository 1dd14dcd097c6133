pub mod input;
pub mod limits;
pub mod loan;
pub mod report;
pub mod session;

pub use input::{Entry, InputError, Prompter};
pub use limits::Limits;
pub use loan::{
    amortize, monthly_payment, Amortization, LoanTerms, LoanTotals, PaymentPlan, Schedule,
    ScheduleRow,
};

use amortize::{session, Limits};
use simple_logger::SimpleLogger;
use std::{error::Error, io};

fn main() -> Result<(), Box<dyn Error>> {
    // RUST_LOG overrides the default level
    SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    session::run(stdin.lock(), stdout.lock(), Limits::default())?;
    Ok(())
}

// verifies that types can implement the gated traits below
#[allow(dead_code)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<amortize::LoanTerms>();
    is_normal::<amortize::ScheduleRow>();
    is_normal::<amortize::LoanTotals>();
    is_normal::<amortize::Schedule>();
}

//! Loan subsystem: monthly interest on outstanding studio loans.
//!
//! Interest is simple: principal × monthly_rate, charged every month.
//! Principal is never amortised.

use crate::{
    error::HookResult,
    rng::SubsystemSlot,
    state::{AlertKind, AlertPriority, GameState},
    subsystem::StudioSubsystem,
};

#[derive(Debug, Default)]
pub struct LoanSubsystem {
    pub interest_charged: f64,
}

impl LoanSubsystem {
    pub const DEFAULT_MONTHLY_RATE: f64 = 0.01;

    pub fn new() -> Self {
        Self::default()
    }
}

impl StudioSubsystem for LoanSubsystem {
    fn name(&self) -> &'static str { "loans" }

    fn slot(&self) -> SubsystemSlot { SubsystemSlot::Loans }

    fn process_monthly_loans(&mut self, state: &mut GameState) -> HookResult {
        let mut total = 0.0;
        for loan in state.loans.iter_mut() {
            let interest = (loan.principal * loan.monthly_rate).floor();
            loan.interest_paid += interest;
            total += interest;
        }
        if total <= 0.0 {
            return Ok(());
        }

        state.charge(total);
        self.interest_charged += total;
        state.add_alert(
            AlertKind::Finance,
            AlertPriority::Low,
            format!("Loan interest: ${total:.0}"),
        );
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}

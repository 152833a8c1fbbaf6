pub mod basis;
pub mod calculator;
pub mod record;

pub use basis::{CommissionBasis, PaymentStatus};
pub use calculator::{
    calculate_commission, derive_figures, recompute, BaseSource, CalculatorSettings,
    CommissionBreakdown, CommissionCalculator, ProfitSign, DEFAULT_TDS_RATE, NET_PROFIT_TOLERANCE,
};
pub use record::{DerivedFigures, PayoutRecord};

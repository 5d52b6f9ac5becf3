pub mod use_cases;

pub use use_cases::payroll_batch::PayrollBatchUseCase;

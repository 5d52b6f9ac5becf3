pub mod payroll_batch;

mod report;
mod summary;

pub use report::{to_json, write_report, PlanReport, PlanTotals};
pub use summary::{render_estimates, render_plan, render_risks};

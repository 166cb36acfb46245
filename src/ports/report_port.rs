//! Report generation port trait.

use crate::domain::error::SlotwalkError;
use crate::domain::period::DataRange;
use crate::domain::walk_forward::WalkForwardResult;

/// Everything a report needs to describe one walk-forward run.
pub struct ReportContext<'a> {
    pub source: &'a str,
    pub range: &'a DataRange,
    pub result: &'a WalkForwardResult,
}

/// Port for writing walk-forward reports.
pub trait ReportPort {
    fn write(&self, ctx: &ReportContext<'_>, output_path: &str) -> Result<(), SlotwalkError>;
}

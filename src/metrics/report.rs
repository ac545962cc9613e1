use super::{CompletionStats, DeadlineStats};
use crate::flow::FlowRange;
use anyhow::Result;
use clap::ValueEnum;
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Metrics of one analysis pass over a flow-info/flow-result pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub label: String,
    pub spec_records: usize,
    pub outcome_records: usize,
    pub deadline_range: FlowRange,
    pub afct_range: FlowRange,
    pub deadline: DeadlineStats,
    pub completion: CompletionStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Csv,
}

// csv can't serialize nested structs
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    label: &'a str,
    spec_records: usize,
    outcome_records: usize,
    deadline_range: String,
    deadline_miss_ratio: f64,
    deadline_missed: usize,
    deadline_eligible: usize,
    afct_range: String,
    afct: f64,
    finished: usize,
    unfinished: usize,
}

impl<'a> From<&'a RunReport> for ReportRow<'a> {
    fn from(report: &'a RunReport) -> Self {
        Self {
            label: &report.label,
            spec_records: report.spec_records,
            outcome_records: report.outcome_records,
            deadline_range: report.deadline_range.to_string(),
            deadline_miss_ratio: report.deadline.ratio,
            deadline_missed: report.deadline.missed,
            deadline_eligible: report.deadline.eligible,
            afct_range: report.afct_range.to_string(),
            afct: report.completion.afct,
            finished: report.completion.finished,
            unfinished: report.completion.unfinished,
        }
    }
}

pub fn write_reports<W: Write>(reports: &[RunReport], format: ReportFormat, writer: W) -> Result<()> {
    match format {
        ReportFormat::Table => write_table(reports, writer),
        ReportFormat::Json => write_json(reports, writer),
        ReportFormat::Csv => write_csv(reports, writer),
    }
}

fn write_json<W: Write>(reports: &[RunReport], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, reports)?;
    writeln!(writer)?;
    Ok(())
}

fn write_csv<W: Write>(reports: &[RunReport], writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    for report in reports {
        writer.serialize(ReportRow::from(report))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_table<W: Write>(reports: &[RunReport], mut w: W) -> Result<()> {
    writeln!(w, "╔════════════╦══════════════╦═══════════════════╦══════════════╦═══════════════════╗")?;
    writeln!(w, "║ Run        ║ Deadline     ║ Missed / Eligible ║ AFCT         ║ Done / Unfinished ║")?;
    writeln!(w, "║            ║ miss (%)     ║                   ║ (s)          ║                   ║")?;
    writeln!(w, "╠════════════╬══════════════╬═══════════════════╬══════════════╬═══════════════════╣")?;

    for report in reports {
        writeln!(
            w,
            "║ {:<10} ║ {:>11.2}% ║ {:>17} ║ {:>12.6} ║ {:>17} ║",
            report.label,
            report.deadline.ratio * 100.0,
            format!("{} / {}", report.deadline.missed, report.deadline.eligible),
            report.completion.afct,
            format!("{} / {}", report.completion.finished, report.completion.unfinished),
        )?;
    }

    writeln!(w, "╚════════════╩══════════════╩═══════════════════╩══════════════╩═══════════════════╝")?;

    // Plain `label, value` lines for plotting scripts: miss ratio first, then AFCT
    for report in reports {
        writeln!(w, "{}, {:?}", report.label, report.deadline.ratio)?;
        writeln!(w, "{}, {:?}", report.label, report.completion.afct)?;
    }

    // Zero ratios and zero AFCT are placeholders when nothing qualified
    for report in reports {
        if !report.deadline.has_data() {
            writeln!(w, "{}: no eligible flows in {}", report.label, report.deadline_range)?;
        }
        if !report.completion.has_data() {
            writeln!(w, "{}: no finished flows in {}", report.label, report.afct_range)?;
        }
    }

    Ok(())
}

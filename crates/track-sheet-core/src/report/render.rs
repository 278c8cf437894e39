//! Printable and export renderers for the track sheets.
//!
//! The host owns the actual print/export flow; these functions hand it
//! self-contained documents as strings.

use crate::models::{PatientHeader, ServiceCatalog, TrackSheet};

use super::{ProcessSheet, ScheduleStatus};

const PRINT_STYLE: &str = r#"
body { font-family: sans-serif; font-size: 12px; margin: 16px; }
h1 { font-size: 16px; text-transform: uppercase; text-align: center; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #444; padding: 4px 6px; text-align: left; vertical-align: top; }
th { background: #eee; }
td.empty-set { text-align: center; font-style: italic; color: #666; padding: 24px; }
span.ahead { color: #166534; font-weight: bold; }
span.behind { color: #b91c1c; font-weight: bold; }
@media print { body { margin: 0; } }
"#;

/// Printable rendering of one in-progress track sheet: the header block
/// followed by the full per-service table.
pub fn track_sheet_html(
    header: &PatientHeader,
    sheet: &TrackSheet,
    catalog: &ServiceCatalog,
) -> String {
    let mut html = String::new();
    document_open(&mut html, "Individual Patient Track Sheet");

    html.push_str("<table><tbody>");
    html.push_str(&format!(
        "<tr><th>Patient Name</th><td>{}</td><th>MRN</th><td>{}</td>\
         <th>Reporting Date</th><td>{}</td><th>Reporting Time</th><td>{}</td></tr>",
        escape_html(&header.name),
        escape_html(&header.mrn),
        escape_html(&header.reporting_date),
        escape_html(&header.reporting_time),
    ));
    html.push_str("</tbody></table>");

    html.push_str("<table><thead>");
    html.push_str(
        "<tr><th rowspan=\"2\">Service Detail</th>\
         <th colspan=\"3\">Desired Service Delivery</th>\
         <th colspan=\"3\">Actual Service Delivery</th>\
         <th rowspan=\"2\">Variance TAT</th>\
         <th rowspan=\"2\">Gaps Identified</th>\
         <th rowspan=\"2\">Corrective Action</th>\
         <th rowspan=\"2\">Responsibility</th>\
         <th rowspan=\"2\">Timeline</th>\
         <th rowspan=\"2\">Evidence of Completion</th></tr>",
    );
    html.push_str(
        "<tr><th>Date</th><th>Time</th><th>TAT (mins)</th>\
         <th>Date</th><th>Time</th><th>TAT</th></tr>",
    );
    html.push_str("</thead><tbody>");

    for id in catalog.ids() {
        let row = match sheet.row(id) {
            Some(row) => row,
            None => continue,
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(catalog.name(id)),
            escape_html(&row.desired_date),
            escape_html(&row.desired_time),
            escape_html(&row.desired_tat),
            escape_html(&row.actual_date),
            escape_html(&row.actual_time),
            escape_html(&row.actual_tat),
            escape_html(&row.variance_tat),
            escape_html(&row.gaps_identified),
            escape_html(&row.corrective_action),
            escape_html(&row.responsibility),
            escape_html(&row.timeline),
            escape_html(&row.evidence),
        ));
    }

    html.push_str("</tbody></table>");
    document_close(&mut html);
    html
}

/// Printable rendering of the full process sheet matrix. Zero records
/// render as a single placeholder row spanning every column.
pub fn process_sheet_html(sheet: &ProcessSheet) -> String {
    let mut html = String::new();
    document_open(&mut html, "Process Track Sheet");

    html.push_str("<table><thead><tr><th>Pt. Name</th><th>MRN</th>");
    for service in &sheet.services {
        html.push_str(&format!("<th>{}</th>", escape_html(service)));
    }
    html.push_str("</tr></thead><tbody>");

    if sheet.rows.is_empty() {
        html.push_str(&format!(
            "<tr><td class=\"empty-set\" colspan=\"{}\">\
             No records found. Add a new patient track to populate this sheet.\
             </td></tr>",
            sheet.column_count(),
        ));
    } else {
        for row in &sheet.rows {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td>",
                escape_html(dash_if_empty(&row.patient_name)),
                escape_html(dash_if_empty(&row.mrn)),
            ));
            for cell in &row.cells {
                html.push_str("<td>");
                if let Some(date) = &cell.actual_date {
                    html.push_str(&escape_html(date));
                }
                if let Some(tag) = &cell.variance {
                    let class = match tag.status {
                        ScheduleStatus::Ahead => "ahead",
                        ScheduleStatus::Behind => "behind",
                    };
                    html.push_str(&format!(
                        " <span class=\"{}\" title=\"{}\">Var: {}</span>",
                        class,
                        tag.status.label(),
                        escape_html(&tag.value),
                    ));
                }
                html.push_str("</td>");
            }
            html.push_str("</tr>");
        }
    }

    html.push_str("</tbody></table>");
    document_close(&mut html);
    html
}

/// CSV export of the process sheet matrix, one line per record.
pub fn process_sheet_csv(sheet: &ProcessSheet) -> String {
    let mut csv = String::new();

    csv.push_str("patient_name,mrn");
    for service in &sheet.services {
        csv.push(',');
        csv.push_str(&escape_csv(service));
    }
    csv.push('\n');

    for row in &sheet.rows {
        csv.push_str(&escape_csv(&row.patient_name));
        csv.push(',');
        csv.push_str(&escape_csv(&row.mrn));
        for cell in &row.cells {
            let mut parts = Vec::new();
            if let Some(date) = &cell.actual_date {
                parts.push(date.clone());
            }
            if let Some(tag) = &cell.variance {
                parts.push(format!("Var: {} ({})", tag.value, tag.status.label()));
            }
            csv.push(',');
            csv.push_str(&escape_csv(&parts.join(" ")));
        }
        csv.push('\n');
    }

    csv
}

fn document_open(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{}</title>", escape_html(title)));
    html.push_str(&format!("<style>{}</style>", PRINT_STYLE));
    html.push_str("</head><body>");
    html.push_str(&format!("<h1>{}</h1>", escape_html(title)));
}

fn document_close(html: &mut String) {
    html.push_str("</body></html>");
}

fn dash_if_empty(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Escape a string for HTML text or attribute content.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

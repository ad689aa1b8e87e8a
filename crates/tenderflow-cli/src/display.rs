//! Human-readable rendering of quotes and scan reports.

use tenderflow_core::scan::best_opportunity;
use tenderflow_core::specmatch::SpecStatus;
use tenderflow_core::{QuoteResult, ScanReport};

/// Print a priced quote as a sectioned card.
pub fn print_quote(result: &QuoteResult) {
    println!("=== Quote ===");
    println!("{}", result.summary);
    println!();

    let analysis = &result.strategic_analysis;
    println!("Strategic Analysis");
    println!(
        "  {:<24} {:.1}",
        "capability score", analysis.overall_capability_score
    );
    println!("  {:<24} {:?}", "win probability", analysis.win_probability);
    println!("  {:<24} {:?}", "risk", analysis.risk_assessment);
    println!("  {:<24} {}", "summary", analysis.executive_summary);
    println!();

    if !result.line_items.is_empty() {
        println!("Line Items");
        for item in &result.line_items {
            let rec = &item.recommendation;
            println!(
                "  {:<50} -> {} (score {})",
                truncate(&item.requirement.name, 50),
                rec.sku,
                rec.match_score
            );
            let breakdown = rec
                .comparison_table
                .iter()
                .find(|c| c.sku == rec.sku)
                .map(|c| c.spec_breakdown.as_slice())
                .unwrap_or_default();
            for check in breakdown {
                let marker = match check.status {
                    SpecStatus::Match => "ok",
                    SpecStatus::Mismatch => "MISMATCH",
                };
                println!("      {:<14} {:<10} {}", check.spec, marker, check.value);
            }
            if let Some(pricing) = &item.pricing {
                println!(
                    "      {:<14} {} x {} + {} = {}",
                    "pricing",
                    pricing.unit_price,
                    pricing.quantity,
                    pricing.service_add_ons,
                    pricing.total_price
                );
            }
        }
        println!();
    }

    let commercial = &result.commercial_summary;
    println!("Commercial Summary");
    println!("  {:<24} {:.2}", "subtotal", commercial.subtotal);
    println!("  {:<24} {:.2}", "tax", commercial.tax);
    println!("  {:<24} {:.2}", "grand total", commercial.grand_total);
}

/// Print a tender scan report with the best pick highlighted.
pub fn print_scan_report(report: &ScanReport) {
    println!("=== Tender Scan ===");
    println!("  {:<24} {}", "last scanned", report.last_scanned);
    println!("  {:<24} {}", "criteria", report.search_criteria);
    println!("  {:<24} {}", "frequency", report.scan_frequency);
    println!("  {:<24} {}", "found", report.opportunities_found);
    println!();

    for opp in &report.opportunities {
        println!("  {:<14} {}", opp.id, truncate(&opp.title, 60));
        println!(
            "      due {}  fit {}  r2w {}  {}  [{}]",
            opp.due_date, opp.match_score, opp.right_to_win_score, opp.submission_risk, opp.action
        );
    }

    if let Some(best) = best_opportunity(&report.opportunities) {
        println!();
        println!("Best opportunity: {} ({})", best.id, best.title);
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

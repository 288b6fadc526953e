use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::SimulationSummary;

const CSV_HEADER: &str = "seed,label,policy,shifts,customers_served,money,reputation,perfect,good,acceptable,poor,wrong_tea,success_rate,foraging_trips,coins_foraged,teas_discovered,vessels_owned,equipped_vessel";

pub fn generate_console_report<W: Write>(
    out: &mut W,
    results: &[SimulationSummary],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Shift Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;
    writeln!(out, "Seeds simulated: {}", results.len())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let money = if result.money >= 100 {
            result.money.to_string().green()
        } else {
            result.money.to_string().red()
        };
        writeln!(
            out,
            "{} {} ({})",
            "☕".bold(),
            result.label.bold(),
            result.policy
        )?;
        writeln!(
            out,
            "   Shifts: {}  Customers: {}",
            result.shifts, result.customers_served
        )?;
        writeln!(out, "   Money: {money}  Reputation: {}", result.reputation)?;
        writeln!(
            out,
            "   Tiers: perfect {} / good {} / acceptable {} / poor {} / wrong {}",
            result.tiers.perfect,
            result.tiers.good,
            result.tiers.acceptable,
            result.tiers.poor,
            result.tiers.wrong_tea.to_string().red()
        )?;
        writeln!(out, "   Success rate: {:.1}%", result.success_rate())?;
        writeln!(
            out,
            "   Foraging: {} trips, {} coins",
            result.foraging_trips, result.coins_foraged
        )?;
        if !result.teas_discovered.is_empty() {
            writeln!(
                out,
                "   Discovered: {}",
                result.teas_discovered.join(", ").yellow()
            )?;
        }
        writeln!(
            out,
            "   Vessels: {} (equipped {})",
            result.vessels_owned.join(", "),
            result.equipped_vessel.bold()
        )?;
        writeln!(out)?;
    }

    if let (Some(richest), Some(poorest)) = (
        results.iter().max_by_key(|r| r.money),
        results.iter().min_by_key(|r| r.money),
    ) {
        writeln!(out, "{}", "💰 Economy Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "==================".yellow())?;
        writeln!(out, "Richest: {} ({})", richest.label.green(), richest.money)?;
        writeln!(out, "Poorest: {} ({})", poorest.label.yellow(), poorest.money)?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write>(out: &mut W, results: &[SimulationSummary]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write>(
    out: &mut W,
    results: &[SimulationSummary],
) -> Result<()> {
    writeln!(out, "# Teahouse Shift Simulation Results\n")?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Seeds simulated**: {}", results.len())?;
    let served: u32 = results.iter().map(|r| r.customers_served).sum();
    writeln!(out, "- **Customers served**: {served}\n")?;

    writeln!(out, "## Detailed Results\n")?;
    writeln!(
        out,
        "| Seed | Policy | Money | Reputation | Perfect | Good | Acceptable | Poor | Wrong | Success |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|---|---|")?;
    for result in results {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {:.1}% |",
            result.label,
            result.policy,
            result.money,
            result.reputation,
            result.tiers.perfect,
            result.tiers.good,
            result.tiers.acceptable,
            result.tiers.poor,
            result.tiers.wrong_tea,
            result.success_rate()
        )?;
    }
    writeln!(out)?;

    for result in results {
        writeln!(out, "### {}\n", result.label)?;
        writeln!(
            out,
            "- **Teas discovered**: {}",
            if result.teas_discovered.is_empty() {
                "none".to_string()
            } else {
                result.teas_discovered.join(", ")
            }
        )?;
        writeln!(out, "- **Vessels owned**: {}", result.vessels_owned.join(", "))?;
        writeln!(out, "- **Equipped**: {}\n", result.equipped_vessel)?;
    }
    Ok(())
}

pub fn generate_csv_report<W: Write>(out: &mut W, results: &[SimulationSummary]) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for result in results {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{:.1},{},{},{},{},{}",
            result.seed,
            result.label,
            result.policy.label().to_lowercase(),
            result.shifts,
            result.customers_served,
            result.money,
            result.reputation,
            result.tiers.perfect,
            result.tiers.good,
            result.tiers.acceptable,
            result.tiers.poor,
            result.tiers.wrong_tea,
            result.success_rate(),
            result.foraging_trips,
            result.coins_foraged,
            result.teas_discovered.join(";"),
            result.vessels_owned.join(";"),
            result.equipped_vessel
        )?;
    }
    Ok(())
}

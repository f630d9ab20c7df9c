//! Plain-text rendering of analysis results, in Brazilian Portuguese.

use aquabill_core::{
    format_currency, format_number, Analysis, CommunityEntry, CommunityStats, Decimal, Severity,
    TariffBand, WaterBillResult,
};
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

fn heading<W: Write>(title: &str, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "=".repeat(RULE_WIDTH))
}

const fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "INFO",
        Severity::Success => "OK",
        Severity::Warning => "ATENÇÃO",
        Severity::Danger => "ALERTA",
        Severity::Money => "CUSTO",
    }
}

fn signed_currency(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{}", format_currency(value))
    } else {
        format_currency(value)
    }
}

/// Write the tariff bands.
pub fn write_tariff_table<W: Write>(bands: &[TariffBand], writer: &mut W) -> io::Result<()> {
    heading("Tabela tarifária", writer)?;
    for band in bands {
        writeln!(
            writer,
            "  {:<12} {:>14} /m³",
            band.label,
            format_currency(band.unit_price)
        )?;
    }
    Ok(())
}

/// Write a bill with its per-band breakdown.
pub fn write_bill<W: Write>(bill: &WaterBillResult, writer: &mut W) -> io::Result<()> {
    heading("Conta", writer)?;
    for item in &bill.breakdown {
        writeln!(
            writer,
            "  {:<12} {:>8} m³ x {:>10} = {:>14}",
            item.range_label,
            format_number(item.volume_in_band, 2),
            format_currency(item.unit_price),
            format_currency(item.subtotal)
        )?;
    }
    if !bill.breakdown.is_empty() {
        writeln!(writer)?;
    }
    writeln!(writer, "  {:<20} {:>14}", "Água", format_currency(bill.water_value))?;
    writeln!(writer, "  {:<20} {:>14}", "Esgoto", format_currency(bill.sewer_value))?;
    writeln!(writer, "  {:<20} {:>14}", "Taxa fixa", format_currency(bill.fixed_fee))?;
    writeln!(writer)?;
    writeln!(
        writer,
        "  {:<20} {:>14}",
        "Total sem Esgoto",
        format_currency(bill.total_without_sewer())
    )?;
    writeln!(
        writer,
        "  {:<20} {:>14}",
        "Total com Esgoto",
        format_currency(bill.total_with_sewer())
    )?;
    writeln!(writer, "  {:<20} {:>14}", "Valor técnico", format_currency(bill.total))?;
    Ok(())
}

/// Write a full analysis.
pub fn write_analysis<W: Write>(analysis: &Analysis, writer: &mut W) -> io::Result<()> {
    let residence = &analysis.residence;
    if !residence.user_name.is_empty() || !residence.account_id.is_empty() {
        writeln!(writer, "{} ({})", residence.user_name, residence.account_id)?;
        writeln!(writer)?;
    }

    let cycle = &analysis.cycle;
    heading("Ciclo", writer)?;
    writeln!(writer, "  {:<20} {:>14}", "Dias", cycle.cycle_days)?;
    writeln!(
        writer,
        "  {:<20} {:>11} m³",
        "Consumo",
        format_number(cycle.consumption, 2)
    )?;
    writeln!(
        writer,
        "  {:<20} {:>11} m³",
        "Por dia",
        format_number(cycle.daily_consumption, 3)
    )?;
    writeln!(
        writer,
        "  {:<20} {:>11} m³",
        "Normalizado (30 d)",
        format_number(cycle.normalized_consumption, 2)
    )?;
    writeln!(writer)?;

    heading("Histórico", writer)?;
    let average = &analysis.historical_average;
    if average.has_baseline() {
        writeln!(
            writer,
            "  {:<20} {:>11} m³",
            "Média mensal",
            format_number(average.monthly_average, 2)
        )?;
        writeln!(writer, "  {:<20} {:>14}", "Meses usados", average.valid_entry_count)?;
    } else {
        writeln!(writer, "  sem histórico de referência")?;
    }
    if let Some(classified) = &analysis.classification {
        writeln!(
            writer,
            "  {:<20} {:>14}",
            "Classificação",
            classified.classification.localized_label()
        )?;
        writeln!(
            writer,
            "  {:<20} {:>13}%",
            "Desvio",
            format_number(classified.deviation_percent, 1)
        )?;
    }
    writeln!(writer)?;

    write_bill(&analysis.bill, writer)?;
    writeln!(writer)?;

    let comparison = &analysis.comparison;
    heading("Comparação", writer)?;
    writeln!(
        writer,
        "  {:<20} {:>14}",
        "Cobrado",
        format_currency(residence.charged_value)
    )?;
    writeln!(
        writer,
        "  {:<20} {:>14}",
        "Diferença",
        signed_currency(comparison.difference_absolute)
    )?;
    writeln!(
        writer,
        "  {:<20} {:>13}%",
        "Diferença",
        format_number(comparison.difference_percent, 1)
    )?;
    if let Some(anomaly) = comparison.volume_anomaly {
        writeln!(
            writer,
            "  {:<20} {:>11} m³",
            "Volume excedente",
            format_number(anomaly, 1)
        )?;
    }
    writeln!(writer)?;

    heading("Diagnóstico", writer)?;
    for item in &analysis.diagnosis {
        writeln!(writer, "  [{}] {}", severity_tag(item.severity), item.message)?;
    }

    Ok(())
}

/// Write a neighbourhood comparison.
pub fn write_community<W: Write>(
    entries: &[CommunityEntry],
    stats: Option<&CommunityStats>,
    writer: &mut W,
) -> io::Result<()> {
    heading("Comunidade", writer)?;
    let Some(stats) = stats else {
        writeln!(writer, "  nenhuma residência cadastrada")?;
        return Ok(());
    };

    for entry in entries {
        writeln!(
            writer,
            "  {:<20} {:>8} m³ {:>14} {:>14} {:>15}",
            entry.name,
            format_number(entry.consumption, 1),
            format_currency(entry.charged_value),
            format_currency(entry.technical_value),
            signed_currency(entry.difference())
        )?;
    }
    writeln!(writer)?;

    writeln!(writer, "  {:<24} {:>14}", "Residências", stats.total_residences)?;
    writeln!(
        writer,
        "  {:<24} {:>11} m³",
        "Consumo médio",
        format_number(stats.average_consumption, 1)
    )?;
    writeln!(
        writer,
        "  {:<24} {:>14}",
        "Valor cobrado médio",
        format_currency(stats.average_charged_value)
    )?;
    writeln!(
        writer,
        "  {:<24} {:>14}",
        "Valor técnico médio",
        format_currency(stats.average_technical_value)
    )?;
    writeln!(
        writer,
        "  {:<24} {:>14}",
        "Diferença total",
        signed_currency(stats.total_difference)
    )?;
    writeln!(
        writer,
        "  {:<24} {:>14}",
        "Diferença média",
        signed_currency(stats.average_difference)
    )?;
    let sign = if stats.average_distortion_percent > Decimal::ZERO {
        "+"
    } else {
        ""
    };
    writeln!(
        writer,
        "  {:<24} {:>13}%",
        "Distorção tarifária média",
        format!("{sign}{}", format_number(stats.average_distortion_percent, 1))
    )?;
    Ok(())
}

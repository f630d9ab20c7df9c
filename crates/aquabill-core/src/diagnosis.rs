//! Human-readable diagnosis of a water bill.
//!
//! Each check appends at most one finding, always in the same order:
//!
//! 1. cycle length distortion
//! 2. progressive tariff impact
//! 3. statistical deviation from the baseline
//! 4. classification summary (always present)
//! 5. charged versus calculated bill

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_consumption, Classification};
use crate::format::{format_currency, format_number};

/// Cycles longer than this inflate apparent consumption.
pub const STANDARD_CYCLE_DAYS: i64 = 30;

/// Cycles shorter than this may understate monthly consumption.
pub const SHORT_CYCLE_DAYS: i64 = 28;

/// Normalized consumption above which the upper tariff bands apply.
pub const UPPER_BAND_THRESHOLD: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Deviation, in percent, worth calling out either way.
pub const DEVIATION_NOTICE_PERCENT: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Billing differences up to this amount are ignored.
pub const BILLING_TOLERANCE: Decimal = Decimal::ONE;

/// Kind of a diagnosis finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral information.
    Info,
    /// Favourable finding.
    Success,
    /// Something worth checking.
    Warning,
    /// Something that needs action.
    Danger,
    /// A cost effect.
    Money,
}

/// A single diagnosis finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisItem {
    /// Kind of finding.
    #[serde(rename = "type")]
    pub severity: Severity,
    /// Fully rendered message.
    pub message: String,
}

impl DiagnosisItem {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Build the ordered list of findings for an analysed bill.
///
/// `historical_average` of zero means no baseline: the deviation check is
/// skipped and the classification falls back to normal.
#[must_use]
pub fn generate_diagnosis(
    cycle_days: i64,
    normalized_consumption: Decimal,
    historical_average: Decimal,
    charged_value: Decimal,
    calculated_total: Decimal,
) -> Vec<DiagnosisItem> {
    let mut diagnosis = Vec::new();
    let classified = classify_consumption(normalized_consumption, historical_average);

    if cycle_days > STANDARD_CYCLE_DAYS {
        diagnosis.push(DiagnosisItem::new(
            Severity::Warning,
            format!(
                "Distorção por atraso de leitura: O ciclo teve {cycle_days} dias ({} dias a mais \
                 que o padrão de {STANDARD_CYCLE_DAYS} dias), o que pode ter inflacionado o \
                 consumo aparente.",
                cycle_days - STANDARD_CYCLE_DAYS
            ),
        ));
    } else if cycle_days < SHORT_CYCLE_DAYS {
        diagnosis.push(DiagnosisItem::new(
            Severity::Info,
            format!(
                "Ciclo reduzido: O período teve apenas {cycle_days} dias, o que pode subestimar \
                 o consumo mensal real."
            ),
        ));
    }

    if normalized_consumption > UPPER_BAND_THRESHOLD {
        diagnosis.push(DiagnosisItem::new(
            Severity::Money,
            format!(
                "Impacto da tarifa progressiva: Consumo de {} m³ atinge faixas superiores com \
                 valores mais altos por m³.",
                format_number(normalized_consumption, 1)
            ),
        ));
    }

    let percent = classified.deviation_percent;
    if historical_average > Decimal::ZERO && percent.abs() > DEVIATION_NOTICE_PERCENT {
        let (severity, direction) = if percent > Decimal::ZERO {
            (Severity::Warning, "acima")
        } else {
            (Severity::Success, "abaixo")
        };
        diagnosis.push(DiagnosisItem::new(
            severity,
            format!(
                "Desvio estatístico: Consumo {direction} da média histórica em {}%.",
                format_number(percent.abs(), 1)
            ),
        ));
    }

    diagnosis.push(classification_item(classified.classification));

    let difference = charged_value.saturating_sub(calculated_total);
    if difference.abs() > BILLING_TOLERANCE {
        if difference > Decimal::ZERO {
            diagnosis.push(DiagnosisItem::new(
                Severity::Danger,
                format!(
                    "Cobrança superior: Valor cobrado {} excede o valor técnico {} em {}.",
                    format_currency(charged_value),
                    format_currency(calculated_total),
                    format_currency(difference)
                ),
            ));
        } else {
            diagnosis.push(DiagnosisItem::new(
                Severity::Success,
                format!(
                    "Cobrança compatível: Valor cobrado está {} abaixo do cálculo técnico.",
                    format_currency(difference.abs())
                ),
            ));
        }
    }

    diagnosis
}

fn classification_item(classification: Classification) -> DiagnosisItem {
    match classification {
        Classification::Normal => DiagnosisItem::new(
            Severity::Success,
            "Classificação: Consumo NORMAL dentro do padrão histórico.",
        ),
        Classification::Elevated => DiagnosisItem::new(
            Severity::Warning,
            "Classificação: Consumo ELEVADO POR PERÍODO - pode indicar uso sazonal ou ciclo \
             estendido.",
        ),
        Classification::Anomalous => DiagnosisItem::new(
            Severity::Danger,
            "Classificação: Consumo ANÔMALO - desvio significativo que requer investigação.",
        ),
    }
}

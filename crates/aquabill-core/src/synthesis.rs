//! Narrative report of an analysis, in Brazilian Portuguese.
//!
//! The text is built from an [`Analysis`] alone and is laid out as titled
//! sections separated by blank lines:
//!
//! 1. introduction (account holder, account and reading period)
//! 2. `ANÁLISE DO CICLO DE FATURAMENTO`
//! 3. `ANÁLISE DO CONSUMO`
//! 4. `COMPARAÇÃO COM HISTÓRICO`, only with a baseline
//! 5. `ANÁLISE TARIFÁRIA`
//! 6. `RESULTADO DA ANÁLISE - DESTAQUES`
//! 7. `CONCLUSÃO`

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::analysis::Analysis;
use crate::classify::Classification;
use crate::cycle::NORMALIZED_DAYS;
use crate::diagnosis::{BILLING_TOLERANCE, STANDARD_CYCLE_DAYS};
use crate::format::{format_currency, format_number};

/// Title line of the narrative report.
pub const SYNTHESIS_TITLE: &str = "SÍNTESE DISCURSIVA DA ANÁLISE";

fn date_text(date: Option<NaiveDate>) -> String {
    date.map_or_else(
        || "data não informada".to_string(),
        |date| date.format("%d/%m/%Y").to_string(),
    )
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn sign(value: Decimal) -> &'static str {
    if value > Decimal::ZERO {
        "+"
    } else {
        ""
    }
}

const fn classification_text(classification: Classification) -> &'static str {
    match classification {
        Classification::Normal => "NORMAL - dentro do padrão histórico",
        Classification::Elevated => {
            "ELEVADO POR PERÍODO - pode indicar ciclo estendido ou uso sazonal"
        }
        Classification::Anomalous => {
            "ANÔMALO - requer investigação de possíveis vazamentos ou irregularidades"
        }
    }
}

/// Write the narrative report for an analysis.
///
/// # Example
///
/// ```
/// use aquabill_core::{analyze, generate_synthesis, AnalysisOptions, NaiveDate, ResidenceData};
/// use rust_decimal_macros::dec;
///
/// let residence = ResidenceData {
///     user_name: "Ana".to_string(),
///     previous_reading_date: NaiveDate::from_ymd_opt(2024, 3, 1),
///     current_reading_date: NaiveDate::from_ymd_opt(2024, 4, 5),
///     previous_reading: dec!(100),
///     current_reading: dec!(135),
///     charged_value: dec!(400),
///     ..ResidenceData::default()
/// };
///
/// let analysis = analyze(&residence, &[], &AnalysisOptions::default()).unwrap();
/// let text = generate_synthesis(&analysis);
/// assert!(text.contains("excede o ciclo padrão de 30 dias em 5 dias"));
/// assert!(text.contains("ACIMA do valor técnico justo"));
/// ```
#[must_use]
pub fn generate_synthesis(analysis: &Analysis) -> String {
    let residence = &analysis.residence;
    let cycle = &analysis.cycle;
    let bill = &analysis.bill;
    let comparison = &analysis.comparison;

    let mut out = String::new();
    out.push_str(SYNTHESIS_TITLE);
    out.push_str("\n\n");

    out.push_str(&format!(
        "A presente análise técnica refere-se à conta de água do usuário {}, matrícula {}, \
         correspondente ao período de {} a {}.\n\n",
        or_placeholder(&residence.user_name, "não identificado"),
        or_placeholder(&residence.account_id, "não informada"),
        date_text(residence.previous_reading_date),
        date_text(residence.current_reading_date),
    ));

    // Cycle
    out.push_str("ANÁLISE DO CICLO DE FATURAMENTO\n");
    out.push_str(&format!(
        "O ciclo de faturamento analisado compreendeu {} dias. ",
        cycle.cycle_days
    ));
    let extra_days = cycle.cycle_days - STANDARD_CYCLE_DAYS;
    if extra_days > 0 {
        let extra_percent = Decimal::from(extra_days) * Decimal::ONE_HUNDRED
            / Decimal::from(NORMALIZED_DAYS);
        out.push_str(&format!(
            "Este período excede o ciclo padrão de {STANDARD_CYCLE_DAYS} dias em {extra_days} \
             dias, o que representa um acréscimo de {}% no tempo de medição. Esta extensão do \
             ciclo impacta diretamente no volume registrado, pois há mais dias de consumo sendo \
             contabilizados em uma única fatura, gerando distorção na percepção do consumo \
             mensal real.\n\n",
            format_number(extra_percent, 1)
        ));
    } else if extra_days < 0 {
        out.push_str(&format!(
            "Este período é inferior ao ciclo padrão de {STANDARD_CYCLE_DAYS} dias em {} dias, \
             o que pode subestimar o consumo mensal efetivo.\n\n",
            extra_days.unsigned_abs()
        ));
    } else {
        out.push_str(&format!(
            "Este período corresponde exatamente ao ciclo padrão de {STANDARD_CYCLE_DAYS} dias, \
             não havendo distorção temporal na medição.\n\n"
        ));
    }

    // Consumption
    out.push_str("ANÁLISE DO CONSUMO\n");
    out.push_str(&format!(
        "O consumo real registrado no hidrômetro foi de {} m³ (diferença entre leitura atual \
         de {} m³ e anterior de {} m³). O consumo médio diário calculado foi de {} m³/dia.\n\n",
        format_number(cycle.consumption, 1),
        format_number(residence.current_reading, 0),
        format_number(residence.previous_reading, 0),
        format_number(cycle.daily_consumption, 3),
    ));
    out.push_str(&format!(
        "Para fins de comparação justa, o consumo foi normalizado para um período padrão de \
         {NORMALIZED_DAYS} dias, resultando em {} m³. Este valor representa o consumo \
         equivalente mensal e é a base para o cálculo do valor técnico justo.\n\n",
        format_number(cycle.normalized_consumption, 1),
    ));

    // History
    if let (Some(average), Some(classified)) = (analysis.baseline(), &analysis.classification) {
        let exclusion = if analysis.exclude_january {
            " (excluindo janeiros por sazonalidade)"
        } else {
            ""
        };
        out.push_str("COMPARAÇÃO COM HISTÓRICO\n");
        out.push_str(&format!(
            "Com base em {} meses de histórico{exclusion}, a média mensal de consumo do imóvel \
             é de {} m³. O consumo atual normalizado apresenta desvio de {}{}% em relação a \
             esta média ({}{} m³).\n\n",
            analysis.historical_average.valid_entry_count,
            format_number(average, 1),
            sign(classified.deviation_percent),
            format_number(classified.deviation_percent, 1),
            sign(classified.deviation),
            format_number(classified.deviation, 1),
        ));
        out.push_str(&format!(
            "Classificação do consumo: {}.\n\n",
            classification_text(classified.classification)
        ));
    }

    // Tariff
    out.push_str("ANÁLISE TARIFÁRIA\n");
    out.push_str(&format!(
        "Aplicando-se a tabela tarifária progressiva sobre o consumo normalizado de {} m³, \
         obtém-se:\n",
        format_number(cycle.normalized_consumption, 1)
    ));
    out.push_str(&format!(
        "- Valor da água: {}\n",
        format_currency(bill.water_value)
    ));
    if residence.include_sewer {
        out.push_str(&format!(
            "- Valor do esgoto (100% da água): {}\n",
            format_currency(bill.sewer_value)
        ));
    }
    out.push_str(&format!(
        "- Taxa fixa de resíduos: {}\n",
        format_currency(bill.fixed_fee)
    ));
    out.push_str(&format!(
        "- VALOR TÉCNICO JUSTO TOTAL: {}\n\n",
        format_currency(bill.total)
    ));

    // Highlights
    let difference = comparison.difference_absolute;
    let difference_percent = format_number(comparison.difference_percent, 1);
    out.push_str("RESULTADO DA ANÁLISE - DESTAQUES\n");
    out.push_str(&format!(
        "Consumo Normalizado ({NORMALIZED_DAYS} dias): {} m³. Valor Técnico Justo a ser \
         Cobrado: {}. Valor Efetivamente Cobrado na Conta: {}. Diferença: {} ({}%).\n\n",
        format_number(cycle.normalized_consumption, 1),
        format_currency(bill.total),
        format_currency(residence.charged_value),
        format_currency(difference),
        difference_percent,
    ));

    // Conclusion
    out.push_str("CONCLUSÃO\n");
    if difference.abs() <= BILLING_TOLERANCE {
        out.push_str(&format!(
            "O valor cobrado está compatível com o cálculo técnico, com diferença desprezível \
             de {}.",
            format_currency(difference.abs())
        ));
    } else if difference > Decimal::ZERO {
        out.push_str(&format!(
            "O valor cobrado na conta está {} ACIMA do valor técnico justo. Esta diferença de \
             {difference_percent}% pode decorrer de: (1) Ciclo de faturamento superior a \
             {STANDARD_CYCLE_DAYS} dias ({} dias neste caso); (2) Inclusão de taxas ou multas \
             não informadas; (3) Erro de cálculo na aplicação da tarifa progressiva. \
             Recomenda-se verificar a composição detalhada da fatura junto à concessionária e, \
             se confirmada a cobrança indevida, solicitar revisão formal.",
            format_currency(difference),
            cycle.cycle_days,
        ));
    } else {
        out.push_str(&format!(
            "O valor cobrado está {} ABAIXO do valor técnico calculado, indicando possível \
             desconto, isenção ou benefício tarifário aplicado.",
            format_currency(difference.abs())
        ));
    }
    out.push('\n');

    out
}

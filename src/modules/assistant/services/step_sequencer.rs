use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::warn;

use super::answer_parser::{parse_number, parse_yes_no};
use crate::core::money::MAX_AMOUNT;
use crate::core::Result;
use crate::modules::assistant::models::{Answers, ClosingFlow, ClosingStage};
use crate::modules::closings::models::{
    AdHocExpenseEntry, ClosingCatalog, ClosingContext, ClosingInput, ClosingResult,
    VariableExpenseEntry,
};
use crate::modules::closings::services::AllocationCalculator;

pub const PROMPT_PARTICIPATION: &str = "% de Participação?";
pub const PROMPT_GROSS_REVENUE: &str = "Faturamento Bruto?";
pub const PROMPT_AD_HOC_YES_NO: &str = "Houve algum gasto esporádico este mês? (Sim/Não)";
pub const PROMPT_AD_HOC_DESCRIPTION: &str = "Qual a descrição?";
pub const PROMPT_AD_HOC_AMOUNT: &str = "Qual o valor (R$)?";
pub const PROMPT_MORE_AD_HOC: &str = "Deseja adicionar MAIS ALGUM gasto esporádico? (Sim/Não)";
pub const PROMPT_CONFIRM_CLOSING: &str =
    "Os valores estão corretos? Deseja salvar o fechamento e registrar o pagamento?";

pub const REPROMPT_PARTICIPATION: &str =
    "Informe a porcentagem de participação (0 a 100). Ex: 25,77";
pub const REPROMPT_GROSS_REVENUE: &str =
    "Informe o faturamento bruto em reais (ex: 5000 ou R$ 5.000,00).";
pub const REPROMPT_QUANTITY: &str = "Informe a quantidade (número). Ex: 0, 1, 2...";
pub const REPROMPT_YES_NO: &str = "Responda Sim ou Não.";
pub const REPROMPT_AD_HOC_DESCRIPTION: &str = "Informe a descrição (ex: Manutenção equipamento).";
pub const REPROMPT_AD_HOC_AMOUNT: &str = "Informe o valor em reais. Ex: 150,00";
pub const CLOSING_OUT_OF_RANGE: &str =
    "Os valores informados são grandes demais para calcular o fechamento. Envie um novo comando de fechamento.";

/// Outcome of feeding one answer to the sequencer
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    pub flow: ClosingFlow,
    /// Next prompt, a re-prompt, or the rendered summary
    pub prompt: String,
    /// False when the answer was rejected and the stage is unchanged
    pub accepted: bool,
}

/// Closing step sequencer
///
/// A pure state machine over `ClosingStage`. Session storage and
/// persistence belong to the caller.
pub struct StepSequencer;

impl StepSequencer {
    /// Begin a closing for `context` over a catalog snapshot
    pub fn start(context: ClosingContext, catalog: ClosingCatalog) -> (ClosingFlow, String) {
        let flow = ClosingFlow {
            context,
            catalog,
            stage: ClosingStage::AwaitingParticipationPct,
        };
        (flow, PROMPT_PARTICIPATION.to_string())
    }

    /// Apply one user answer to the flow
    ///
    /// Invalid answers leave the stage untouched and return a re-prompt.
    /// At the summary stage input is ignored; confirmation happens elsewhere.
    pub fn advance(flow: ClosingFlow, text: &str) -> Advance {
        let ClosingFlow {
            context,
            catalog,
            stage,
        } = flow;

        let (stage, prompt, accepted) = match stage {
            ClosingStage::AwaitingParticipationPct => {
                match parse_number(text).filter(|pct| is_percentage(*pct)) {
                    Some(participation_pct) => accept(
                        ClosingStage::AwaitingGrossRevenue { participation_pct },
                        PROMPT_GROSS_REVENUE,
                    ),
                    None => reject(
                        ClosingStage::AwaitingParticipationPct,
                        REPROMPT_PARTICIPATION,
                    ),
                }
            }

            ClosingStage::AwaitingGrossRevenue { participation_pct } => {
                match parse_amount(text) {
                    Some(gross_revenue) => match catalog.variable_entries.first() {
                        Some(first) => accept(
                            ClosingStage::AwaitingVariableQuantity {
                                participation_pct,
                                gross_revenue,
                                quantities: Vec::new(),
                            },
                            quantity_prompt(first),
                        ),
                        None => accept(
                            ClosingStage::AwaitingAdHocYesNo {
                                answers: Answers {
                                    participation_pct,
                                    gross_revenue,
                                    quantities: Vec::new(),
                                    ad_hoc: Vec::new(),
                                },
                            },
                            PROMPT_AD_HOC_YES_NO,
                        ),
                    },
                    None => reject(
                        ClosingStage::AwaitingGrossRevenue { participation_pct },
                        REPROMPT_GROSS_REVENUE,
                    ),
                }
            }

            ClosingStage::AwaitingVariableQuantity {
                participation_pct,
                gross_revenue,
                mut quantities,
            } => match parse_quantity(text) {
                Some(quantity) => {
                    quantities.push(quantity);
                    match catalog.variable_entries.get(quantities.len()) {
                        Some(next) => accept(
                            ClosingStage::AwaitingVariableQuantity {
                                participation_pct,
                                gross_revenue,
                                quantities,
                            },
                            quantity_prompt(next),
                        ),
                        None => accept(
                            ClosingStage::AwaitingAdHocYesNo {
                                answers: Answers {
                                    participation_pct,
                                    gross_revenue,
                                    quantities,
                                    ad_hoc: Vec::new(),
                                },
                            },
                            PROMPT_AD_HOC_YES_NO,
                        ),
                    }
                }
                None => reject(
                    ClosingStage::AwaitingVariableQuantity {
                        participation_pct,
                        gross_revenue,
                        quantities,
                    },
                    REPROMPT_QUANTITY,
                ),
            },

            ClosingStage::AwaitingAdHocYesNo { answers } => match parse_yes_no(text) {
                Some(true) => accept(
                    ClosingStage::AwaitingAdHocDescription { answers },
                    PROMPT_AD_HOC_DESCRIPTION,
                ),
                Some(false) => match compute(&context, &catalog, &answers) {
                    Ok(result) => {
                        let summary = summary_text(&result);
                        (ClosingStage::Summary { result }, summary, true)
                    }
                    Err(e) => {
                        warn!(
                            franchise = %context.franchise,
                            period = %context.period_label(),
                            error = %e,
                            "Closing could not be calculated"
                        );
                        reject(ClosingStage::AwaitingAdHocYesNo { answers }, CLOSING_OUT_OF_RANGE)
                    }
                },
                None => reject(ClosingStage::AwaitingAdHocYesNo { answers }, REPROMPT_YES_NO),
            },

            ClosingStage::AwaitingAdHocDescription { answers } => {
                let description = text.trim();
                if description.is_empty() {
                    reject(
                        ClosingStage::AwaitingAdHocDescription { answers },
                        REPROMPT_AD_HOC_DESCRIPTION,
                    )
                } else {
                    accept(
                        ClosingStage::AwaitingAdHocAmount {
                            answers,
                            description: description.to_string(),
                        },
                        PROMPT_AD_HOC_AMOUNT,
                    )
                }
            }

            ClosingStage::AwaitingAdHocAmount {
                mut answers,
                description,
            } => match parse_amount(text) {
                Some(amount) => {
                    answers
                        .ad_hoc
                        .push(AdHocExpenseEntry::new(description, amount));
                    accept(
                        ClosingStage::AwaitingAdHocYesNo { answers },
                        PROMPT_MORE_AD_HOC,
                    )
                }
                None => reject(
                    ClosingStage::AwaitingAdHocAmount {
                        answers,
                        description,
                    },
                    REPROMPT_AD_HOC_AMOUNT,
                ),
            },

            ClosingStage::Summary { result } => {
                let summary = summary_text(&result);
                (ClosingStage::Summary { result }, summary, false)
            }
        };

        Advance {
            flow: ClosingFlow {
                context,
                catalog,
                stage,
            },
            prompt,
            accepted,
        }
    }
}

/// Rendered closing plus the confirmation question
pub fn summary_text(result: &ClosingResult) -> String {
    format!("{}\n\n{}", result.render_summary(), PROMPT_CONFIRM_CLOSING)
}

fn accept(stage: ClosingStage, prompt: impl Into<String>) -> (ClosingStage, String, bool) {
    (stage, prompt.into(), true)
}

fn reject(stage: ClosingStage, prompt: &str) -> (ClosingStage, String, bool) {
    (stage, prompt.to_string(), false)
}

fn quantity_prompt(entry: &VariableExpenseEntry) -> String {
    format!("Qual a quantidade de {}?", entry.supplier)
}

fn is_percentage(pct: Decimal) -> bool {
    pct >= Decimal::ZERO && pct <= Decimal::ONE_HUNDRED
}

/// Non-negative amount no larger than a stored amount can be
fn parse_amount(text: &str) -> Option<Decimal> {
    parse_number(text).filter(|v| !v.is_sign_negative() && *v <= MAX_AMOUNT)
}

/// Whole, non-negative quantity
fn parse_quantity(text: &str) -> Option<u32> {
    let value = parse_number(text)?;
    if value.is_sign_negative() || !value.fract().is_zero() {
        return None;
    }
    value.to_u32()
}

fn compute(
    context: &ClosingContext,
    catalog: &ClosingCatalog,
    answers: &Answers,
) -> Result<ClosingResult> {
    let input = ClosingInput {
        participation_pct: answers.participation_pct,
        gross_revenue: answers.gross_revenue,
        fixed_entries: catalog.fixed_entries.clone(),
        variable_entries: catalog.variable_entries.clone(),
        variable_quantities: answers.quantities.clone(),
        ad_hoc_entries: answers.ad_hoc.clone(),
    };
    AllocationCalculator::calculate(&input, &context.franchise)
}

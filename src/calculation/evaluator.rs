//! Component evaluation.
//!
//! This module computes the monthly amount of every component in an
//! [`EvaluationPlan`] and aggregates them into earnings, deductions and net
//! salary. Amounts are computed at full precision in plan order, then
//! rounded once with [`round_money`] when the output is assembled.

use rust_decimal::Decimal;
use serde_json::json;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, BaseRef, CalculationRule, ComponentAmount, ComponentType,
    GrossBasis, StructureComponent,
};

use super::{EvaluationPlan, round_money};

const MONTHS_PER_YEAR: i64 = 12;

/// Inputs that vary per evaluation of the same plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationInput {
    /// Annual cost-to-company.
    pub ctc_annual: Decimal,
    /// Proration factor applied to attendance-based components (1 = full attendance).
    pub attendance_factor: Decimal,
    /// How `GROSS` references are resolved.
    pub gross_basis: GrossBasis,
}

/// The evaluated breakdown of a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Rounded per-component amounts, in declared order.
    pub components: Vec<ComponentAmount>,
    /// Annual CTC / 12, rounded.
    pub ctc_monthly: Decimal,
    /// Sum of rounded earning amounts.
    pub total_earnings: Decimal,
    /// Sum of rounded deduction amounts.
    pub total_deductions: Decimal,
    /// `total_earnings - total_deductions`.
    pub net_salary: Decimal,
    /// Evaluation steps and warnings.
    pub audit_trace: AuditTrace,
}

/// The full-precision outcome for one component.
struct ComponentOutcome {
    amount: Decimal,
    clamped: bool,
    step: AuditStep,
}

/// Evaluates every component of a plan.
///
/// In [`GrossBasis::DeclaredOrder`] mode a `GROSS` reference sums every
/// earning declared before the referencing component that has already been
/// evaluated, in either pass.
///
/// # Returns
///
/// Returns the rounded breakdown, or an error if:
/// - deductions exceed earnings (`NegativeNetSalary`)
/// - an amount leaves the decimal range (`AmountOverflow`)
/// - the plan references a component that has not been evaluated yet
///   (`CalculationError`; cannot happen for plans built by [`super::resolve`])
pub fn evaluate(plan: &EvaluationPlan, input: &EvaluationInput) -> EngineResult<Evaluation> {
    let components = plan.components();
    let ctc_monthly = input.ctc_annual / Decimal::from(MONTHS_PER_YEAR);

    let mut amounts: Vec<Option<Decimal>> = vec![None; components.len()];
    let mut clamped = vec![false; components.len()];
    let mut steps = Vec::with_capacity(components.len());
    let mut step_number: u32 = 1;

    for &index in plan.first_pass() {
        let outcome = evaluate_component(plan, index, &amounts, ctc_monthly, None, input, step_number)?;
        amounts[index] = Some(outcome.amount);
        clamped[index] = outcome.clamped;
        steps.push(outcome.step);
        step_number += 1;
    }

    let gross_all = if plan.second_pass().is_empty() {
        Decimal::ZERO
    } else {
        checked_total(
            plan.first_pass()
                .iter()
                .filter(|&&i| components[i].definition.is_earning())
                .filter_map(|&i| amounts[i]),
            "GROSS",
            "gross",
        )?
    };

    for &index in plan.second_pass() {
        let gross = match input.gross_basis {
            GrossBasis::AllEarnings => gross_all,
            GrossBasis::DeclaredOrder => checked_total(
                (0..index)
                    .filter(|&i| components[i].definition.is_earning())
                    .filter_map(|i| amounts[i]),
                &components[index].component_id,
                "gross",
            )?,
        };
        let outcome =
            evaluate_component(plan, index, &amounts, ctc_monthly, Some(gross), input, step_number)?;
        amounts[index] = Some(outcome.amount);
        clamped[index] = outcome.clamped;
        steps.push(outcome.step);
        step_number += 1;
    }

    let mut warnings = Vec::new();
    let mut output = Vec::with_capacity(components.len());
    for (index, component) in components.iter().enumerate() {
        let amount = amounts[index].ok_or_else(|| EngineError::CalculationError {
            message: format!("Component '{}' was never evaluated", component.component_id),
        })?;
        let monthly_amount = round_money(amount);

        if clamped[index] {
            warnings.push(AuditWarning {
                code: "VALUE_CLAMPED".to_string(),
                message: format!(
                    "Component '{}' was limited to {} by its bounds",
                    component.component_id, monthly_amount
                ),
                severity: "low".to_string(),
            });
        }

        output.push(ComponentAmount {
            component_id: component.component_id.clone(),
            code: component.definition.code.clone(),
            name: component.definition.name.clone(),
            component_type: component.definition.component_type,
            category: component.definition.category,
            monthly_amount,
            annual_amount: monthly_amount
                .checked_mul(Decimal::from(MONTHS_PER_YEAR))
                .map(round_money)
                .ok_or_else(|| overflow(&component.component_id, "annual amount"))?,
            is_variable: component.is_variable,
            clamped: clamped[index],
        });
    }

    let (earnings, deductions): (Vec<&ComponentAmount>, Vec<&ComponentAmount>) = output
        .iter()
        .partition(|c| c.component_type == ComponentType::Earning);
    let total_earnings = round_money(checked_total(
        earnings.iter().map(|c| c.monthly_amount),
        "totals",
        "total earnings",
    )?);
    let total_deductions = round_money(checked_total(
        deductions.iter().map(|c| c.monthly_amount),
        "totals",
        "total deductions",
    )?);
    let net_salary = total_earnings
        .checked_sub(total_deductions)
        .ok_or_else(|| overflow("totals", "net salary"))?;

    if net_salary.is_sign_negative() && !net_salary.is_zero() {
        return Err(EngineError::NegativeNetSalary { net_salary });
    }

    let ctc_monthly = round_money(ctc_monthly);
    if total_earnings > ctc_monthly {
        warnings.push(AuditWarning {
            code: "EARNINGS_EXCEED_CTC".to_string(),
            message: format!(
                "Total earnings {} exceed monthly CTC {}",
                total_earnings, ctc_monthly
            ),
            severity: "medium".to_string(),
        });
    }

    Ok(Evaluation {
        components: output,
        ctc_monthly,
        total_earnings,
        total_deductions,
        net_salary,
        audit_trace: AuditTrace { steps, warnings },
    })
}

/// Computes one component's full-precision amount and its audit step.
fn evaluate_component(
    plan: &EvaluationPlan,
    index: usize,
    amounts: &[Option<Decimal>],
    ctc_monthly: Decimal,
    gross: Option<Decimal>,
    input: &EvaluationInput,
    step_number: u32,
) -> EngineResult<ComponentOutcome> {
    let component = &plan.components()[index];

    let (rule_id, raw, input_json, reasoning) = match &component.rule {
        CalculationRule::Fixed { value } => (
            "fixed_amount".to_string(),
            *value,
            json!({ "fixed_value": value.normalize().to_string() }),
            format!("Fixed monthly amount {}", value.normalize()),
        ),
        CalculationRule::AttendanceBased { value } => {
            let scaled = value
                .checked_mul(input.attendance_factor)
                .ok_or_else(|| overflow(&component.component_id, "attendance scaling"))?;
            (
                "attendance_scaled".to_string(),
                scaled,
                json!({
                    "fixed_value": value.normalize().to_string(),
                    "attendance_factor": input.attendance_factor.normalize().to_string()
                }),
                format!(
                    "{} x attendance {} = {}",
                    value.normalize(),
                    input.attendance_factor.normalize(),
                    scaled.normalize()
                ),
            )
        }
        CalculationRule::Percentage { percentage, base } => {
            let reference = reference_amount(plan, component, base, amounts, ctc_monthly, gross)?;
            let computed = reference
                .checked_mul(*percentage)
                .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
                .ok_or_else(|| overflow(&component.component_id, "percentage"))?;
            (
                format!("percentage_of_{}", base_label(base)),
                computed,
                json!({
                    "percentage": percentage.normalize().to_string(),
                    "base": base.to_string(),
                    "reference_amount": reference.normalize().to_string()
                }),
                format!(
                    "{}% of {} ({}) = {}",
                    percentage.normalize(),
                    base,
                    reference.normalize(),
                    computed.normalize()
                ),
            )
        }
    };

    let amount = component.bounds.clamp(raw);
    let clamped = amount != raw;
    let reasoning = if clamped {
        format!("{}, limited to {}", reasoning, amount.normalize())
    } else {
        reasoning
    };

    Ok(ComponentOutcome {
        amount,
        clamped,
        step: AuditStep {
            step_number,
            component_id: component.component_id.clone(),
            rule_id,
            input: input_json,
            output: json!({
                "amount": amount.normalize().to_string(),
                "clamped": clamped
            }),
            reasoning,
        },
    })
}

/// Resolves the amount a percentage is taken of.
fn reference_amount(
    plan: &EvaluationPlan,
    component: &StructureComponent,
    base: &BaseRef,
    amounts: &[Option<Decimal>],
    ctc_monthly: Decimal,
    gross: Option<Decimal>,
) -> EngineResult<Decimal> {
    let not_ready = |what: &str| EngineError::CalculationError {
        message: format!(
            "Component '{}' references {} before it was evaluated",
            component.component_id, what
        ),
    };

    match base {
        BaseRef::Ctc => Ok(ctc_monthly),
        BaseRef::Gross => gross.ok_or_else(|| not_ready("GROSS")),
        BaseRef::Basic => amounts[plan.structure().anchor()].ok_or_else(|| not_ready("BASIC")),
        BaseRef::Component(id) => plan
            .position_of(id)
            .and_then(|position| amounts[position])
            .ok_or_else(|| not_ready(id.as_str())),
    }
}

fn overflow(component_id: &str, operation: &'static str) -> EngineError {
    EngineError::AmountOverflow {
        component_id: component_id.to_string(),
        operation,
    }
}

/// Sums amounts, failing instead of panicking when the total leaves the decimal range.
fn checked_total(
    amounts: impl IntoIterator<Item = Decimal>,
    component_id: &str,
    operation: &'static str,
) -> EngineResult<Decimal> {
    amounts.into_iter().try_fold(Decimal::ZERO, |total, amount| {
        total
            .checked_add(amount)
            .ok_or_else(|| overflow(component_id, operation))
    })
}

fn base_label(base: &BaseRef) -> &'static str {
    match base {
        BaseRef::Ctc => "ctc",
        BaseRef::Gross => "gross",
        BaseRef::Basic => "basic",
        BaseRef::Component(_) => "component",
    }
}

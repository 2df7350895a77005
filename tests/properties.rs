//! Property tests for preview arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;

use salary_engine::calculation::{PreviewService, StructureSource, round_money};
use salary_engine::config::ConfigLoader;
use salary_engine::models::{
    BaseRef, ComponentType, GrossBasis, PreviewResult, StructureComponentDraft,
};

fn loader() -> ConfigLoader {
    ConfigLoader::load("./config/default").expect("Failed to load config")
}

fn draft(component_id: &str) -> StructureComponentDraft {
    StructureComponentDraft {
        component_id: component_id.to_string(),
        fixed_value: None,
        percentage: None,
        base_component_ref: None,
        min_value: None,
        max_value: None,
        is_variable: false,
        order: None,
    }
}

/// A structure with every kind of base reference; percentages are in basis points.
fn structure(
    basic_bp: u32,
    hra_bp: u32,
    bonus_bp: u32,
    special: u32,
) -> Vec<StructureComponentDraft> {
    let pct = |bp: u32| Some(Decimal::new(i64::from(bp), 2));
    vec![
        StructureComponentDraft {
            percentage: pct(basic_bp),
            base_component_ref: Some(BaseRef::Ctc),
            ..draft("basic")
        },
        StructureComponentDraft {
            percentage: pct(hra_bp),
            base_component_ref: Some(BaseRef::Basic),
            ..draft("hra")
        },
        StructureComponentDraft {
            percentage: pct(bonus_bp),
            base_component_ref: Some(BaseRef::Gross),
            ..draft("performance_bonus")
        },
        StructureComponentDraft {
            fixed_value: Some(Decimal::from(special)),
            ..draft("special_allowance")
        },
        StructureComponentDraft {
            percentage: Some(Decimal::from(12)),
            base_component_ref: Some(BaseRef::Basic),
            max_value: Some(Decimal::from(1800)),
            ..draft("epf")
        },
        StructureComponentDraft {
            fixed_value: Some(Decimal::from(200)),
            ..draft("professional_tax")
        },
    ]
}

proptest! {
    #[test]
    fn totals_always_balance(
        ctc in 120_000u64..50_000_000,
        basic_bp in 1_000u32..6_000,
        hra_bp in 0u32..5_000,
        bonus_bp in 0u32..2_000,
        special in 0u32..20_000,
    ) {
        let loader = loader();
        let drafts = structure(basic_bp, hra_bp, bonus_bp, special);
        let preview = PreviewService::new(loader.config())
            .compute_preview(StructureSource::Draft(&drafts), Decimal::from(ctc), None)
            .unwrap();

        let sum_of = |kind: ComponentType| -> Decimal {
            preview
                .components
                .iter()
                .filter(|c| c.component_type == kind)
                .map(|c| c.monthly_amount)
                .sum()
        };
        prop_assert_eq!(sum_of(ComponentType::Earning), preview.total_earnings);
        prop_assert_eq!(sum_of(ComponentType::Deduction), preview.total_deductions);
        prop_assert_eq!(preview.total_earnings - preview.total_deductions, preview.net_salary);

        for component in &preview.components {
            prop_assert_eq!(component.monthly_amount.scale(), 2);
            prop_assert_eq!(round_money(component.monthly_amount), component.monthly_amount);
        }
    }

    #[test]
    fn preview_is_deterministic(
        ctc in 120_000u64..50_000_000,
        basic_bp in 1_000u32..6_000,
        bonus_bp in 0u32..2_000,
    ) {
        let loader = loader();
        let drafts = structure(basic_bp, 5_000, bonus_bp, 5_000);
        let service = PreviewService::new(loader.config());

        let first = service
            .compute_preview(StructureSource::Draft(&drafts), Decimal::from(ctc), None)
            .unwrap();
        let second = service
            .compute_preview(StructureSource::Draft(&drafts), Decimal::from(ctc), None)
            .unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn declared_order_never_exceeds_all_earnings(
        ctc in 120_000u64..50_000_000,
        bonus_bp in 0u32..2_000,
        special in 0u32..20_000,
    ) {
        let loader = loader();
        let drafts = structure(4_000, 5_000, bonus_bp, special);
        let service = PreviewService::new(loader.config());

        let all = service
            .compute_preview(StructureSource::Draft(&drafts), Decimal::from(ctc), None)
            .unwrap();
        let declared = service
            .with_gross_basis(GrossBasis::DeclaredOrder)
            .compute_preview(StructureSource::Draft(&drafts), Decimal::from(ctc), None)
            .unwrap();

        let bonus = |p: &PreviewResult| p.amount_of("performance_bonus").unwrap();
        prop_assert!(bonus(&declared) <= bonus(&all));
    }
}

use rust_decimal::Decimal;

use crate::models::payroll::{ExtractedPayrollData, LineItem};

/// Canned payslip used when extraction is unavailable in demo deployments.
///
/// The record is deliberately imperfect: its date is long past and the
/// national ID carries the wrong check letter, so a demo run shows failing
/// checks.
pub fn demo_payroll_record() -> ExtractedPayrollData {
    ExtractedPayrollData {
        employee_name: Some("Juan Pérez García".to_string()),
        employee_national_id: Some("12345678A".to_string()),
        company_name: Some("Empresa Ejemplo S.L.".to_string()),
        company_tax_id: Some("B12345678".to_string()),
        payroll_date: Some("2024-01-31".to_string()),
        liquidation_period: Some("01/2024".to_string()),
        seniority_date: Some("2020-01-15".to_string()),
        total_earnings: Some(Decimal::new(250000, 2)),
        total_deductions: Some(Decimal::new(62450, 2)),
        net_salary: Some(Decimal::new(187550, 2)),
        earning_items: Some(vec![
            LineItem::new("Salario base", Decimal::new(180000, 2)),
            LineItem::new("Complementos", Decimal::new(70000, 2)),
        ]),
        deduction_items: Some(vec![
            LineItem::new("IRPF", Decimal::new(45000, 2)),
            LineItem::new("Seguridad Social", Decimal::new(17450, 2)),
        ]),
    }
}

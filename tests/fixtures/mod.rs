//! Payslip records and document bytes shared by the integration tests

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::io::Cursor;

use payslip_verify::models::payroll::{ExtractedPayrollData, LineItem};

/// A payslip dated ten days before `today` whose figures all add up.
pub fn consistent_payslip(today: NaiveDate) -> ExtractedPayrollData {
    let payroll_date = today.checked_sub_days(Days::new(10)).unwrap_or(today);

    ExtractedPayrollData {
        employee_name: Some("María García López".to_string()),
        employee_national_id: Some("12345678Z".to_string()),
        company_name: Some("Construcciones Levante S.A.".to_string()),
        company_tax_id: Some("A28123456".to_string()),
        payroll_date: Some(payroll_date.format("%Y-%m-%d").to_string()),
        liquidation_period: Some(payroll_date.format("%m/%Y").to_string()),
        seniority_date: Some("2019-06-01".to_string()),
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

pub fn consistent_payslip_today() -> ExtractedPayrollData {
    consistent_payslip(Utc::now().date_naive())
}

/// Same payslip with a net salary 24.50 above the calculation.
pub fn net_mismatch_payslip_today() -> ExtractedPayrollData {
    let mut data = consistent_payslip_today();
    data.net_salary = Some(Decimal::new(190000, 2));
    data
}

/// A small, decodable PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(16, 16, image::Rgb([240, 240, 240]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("PNG encoding failed");
    out.into_inner()
}

/// Minimal bytes that sniff as a PDF.
pub fn pdf_bytes(padding: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.7\n".to_vec();
    bytes.extend(std::iter::repeat(b' ').take(padding));
    bytes.extend_from_slice(b"\n%%EOF\n");
    bytes
}

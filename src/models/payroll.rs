use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimum number of payslip marker fields that must be filled in before the
/// classifier is skipped.
pub const PAYSLIP_MARKER_THRESHOLD: usize = 3;

/// One earning or deduction concept printed on a payslip.
///
/// The vendor may send `null` for either field; a missing amount counts as
/// zero when items are summed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub concept: Option<String>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
}

impl LineItem {
    pub fn new(concept: impl Into<String>, amount: Decimal) -> Self {
        Self {
            concept: Some(concept.into()),
            amount: Some(amount),
        }
    }

    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }
}

/// Fields extracted from a payslip by the document-extraction vendor.
///
/// Extraction is best-effort, so every field is optional. Empty strings are
/// treated the same as missing values by the validators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPayrollData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,

    /// 8 digits followed by a check letter.
    #[serde(default, alias = "employeeNIF", skip_serializing_if = "Option::is_none")]
    pub employee_national_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Leading letter, 7 digits and a trailing check character.
    #[serde(default, alias = "companyCIF", skip_serializing_if = "Option::is_none")]
    pub company_tax_id: Option<String>,

    /// Issuance date (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payroll_date: Option<String>,

    /// Settlement period in one of the free-text formats understood by
    /// [`crate::services::period`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidation_period: Option<String>,

    /// Employee start date at the company (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seniority_date: Option<String>,

    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_earnings: Option<Decimal>,

    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_deductions: Option<Decimal>,

    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub net_salary: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earning_items: Option<Vec<LineItem>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduction_items: Option<Vec<LineItem>>,
}

impl ExtractedPayrollData {
    pub fn employee_name(&self) -> Option<&str> {
        non_empty(&self.employee_name)
    }

    /// Returned verbatim: identifier formats are checked without trimming.
    pub fn employee_national_id(&self) -> Option<&str> {
        non_blank(&self.employee_national_id)
    }

    pub fn company_name(&self) -> Option<&str> {
        non_empty(&self.company_name)
    }

    /// Returned verbatim, like [`Self::employee_national_id`].
    pub fn company_tax_id(&self) -> Option<&str> {
        non_blank(&self.company_tax_id)
    }

    pub fn payroll_date(&self) -> Option<&str> {
        non_empty(&self.payroll_date)
    }

    pub fn liquidation_period(&self) -> Option<&str> {
        non_empty(&self.liquidation_period)
    }

    pub fn seniority_date(&self) -> Option<&str> {
        non_empty(&self.seniority_date)
    }

    /// Earning items, only when at least one was extracted.
    pub fn earning_items(&self) -> Option<&[LineItem]> {
        self.earning_items.as_deref().filter(|items| !items.is_empty())
    }

    /// Deduction items, only when at least one was extracted.
    pub fn deduction_items(&self) -> Option<&[LineItem]> {
        self.deduction_items.as_deref().filter(|items| !items.is_empty())
    }

    /// Number of payslip marker fields (employee, company, total earnings,
    /// payroll date) that carry a value.
    pub fn payslip_marker_count(&self) -> usize {
        [
            self.employee_name().is_some(),
            self.company_name().is_some(),
            self.total_earnings.is_some(),
            self.payroll_date().is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Whether enough marker fields are present to treat the document as a
    /// payslip without calling the classifier.
    pub fn looks_like_payslip(&self) -> bool {
        self.payslip_marker_count() >= PAYSLIP_MARKER_THRESHOLD
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_vendor_aliases() {
        let json = r#"{
            "employeeName": "Ana",
            "employeeNIF": "12345678Z",
            "companyCIF": "B12345678",
            "totalEarnings": 2500,
            "netSalary": 1875.5,
            "earningItems": [{"concept": "Salario base", "amount": 1800.0}]
        }"#;
        let data: ExtractedPayrollData = serde_json::from_str(json).unwrap();
        assert_eq!(data.employee_national_id(), Some("12345678Z"));
        assert_eq!(data.company_tax_id(), Some("B12345678"));
        assert_eq!(data.total_earnings, Some(Decimal::new(2500, 0)));
        assert_eq!(data.net_salary, Some(Decimal::new(18755, 1)));
        assert_eq!(data.earning_items().map(<[LineItem]>::len), Some(1));
        assert!(data.deduction_items().is_none());
    }

    #[test]
    fn test_null_item_fields_keep_the_record() {
        let json = r#"{
            "employeeName": "Ana",
            "totalEarnings": 2500,
            "earningItems": [
                {"concept": "Salario base", "amount": 1800},
                {"concept": "Plus", "amount": null},
                {"concept": null, "amount": 10}
            ]
        }"#;
        let data: ExtractedPayrollData = serde_json::from_str(json).unwrap();
        assert_eq!(data.employee_name(), Some("Ana"));

        let items = data.earning_items().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].amount, None);
        assert_eq!(items[1].amount_or_zero(), Decimal::ZERO);
        assert_eq!(items[2].concept, None);
        assert_eq!(items[2].amount_or_zero(), Decimal::new(10, 0));
    }

    #[test]
    fn test_blank_strings_count_as_missing() {
        let data = ExtractedPayrollData {
            employee_name: Some("  ".to_string()),
            company_name: Some("Empresa".to_string()),
            payroll_date: Some("".to_string()),
            total_earnings: Some(Decimal::new(1000, 0)),
            ..Default::default()
        };
        assert_eq!(data.employee_name(), None);
        assert_eq!(data.payslip_marker_count(), 2);
        assert!(!data.looks_like_payslip());
    }

    #[test]
    fn test_identifiers_are_not_trimmed() {
        let data = ExtractedPayrollData {
            employee_name: Some(" Ana ".to_string()),
            employee_national_id: Some(" 12345678Z ".to_string()),
            company_tax_id: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(data.employee_name(), Some("Ana"));
        assert_eq!(data.employee_national_id(), Some(" 12345678Z "));
        assert_eq!(data.company_tax_id(), None);
    }

    #[test]
    fn test_three_markers_identify_payslip() {
        let data = ExtractedPayrollData {
            employee_name: Some("Ana".to_string()),
            company_name: Some("Empresa".to_string()),
            payroll_date: Some("2025-01-31".to_string()),
            ..Default::default()
        };
        assert!(data.looks_like_payslip());
    }
}

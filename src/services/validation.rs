use chrono::{DateTime, Months, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::payroll::{ExtractedPayrollData, LineItem};
use crate::models::verification::CheckResult;
use crate::services::identifiers::{self, NationalIdCheck};
use crate::services::period;

/// Maximum accepted difference between a printed total and its recomputation.
const AMOUNT_TOLERANCE: Decimal = Decimal::ONE;

/// Payslips older than this many calendar months are rejected.
const FRESHNESS_MONTHS: u32 = 3;

/// Stable check identifiers.
pub mod codes {
    pub const PAYROLL_DATE: &str = "payroll_date";
    pub const PAYROLL_DATE_FUTURE: &str = "payroll_date_future";
    pub const PAYROLL_DATE_TOO_OLD: &str = "payroll_date_too_old";
    pub const PAYROLL_DATE_UNREADABLE: &str = "payroll_date_unreadable";
    pub const LIQUIDATION_PERIOD: &str = "liquidation_period";
    pub const LIQUIDATION_PERIOD_BEFORE_SENIORITY: &str = "liquidation_period_before_seniority";
    pub const LIQUIDATION_PERIOD_UNREADABLE: &str = "liquidation_period_unreadable";
    pub const EARNINGS_SUM: &str = "earnings_sum";
    pub const EARNINGS_SUM_MISMATCH: &str = "earnings_sum_mismatch";
    pub const EARNINGS_TOTAL: &str = "earnings_total";
    pub const DEDUCTIONS_SUM: &str = "deductions_sum";
    pub const DEDUCTIONS_SUM_MISMATCH: &str = "deductions_sum_mismatch";
    pub const NET_SALARY: &str = "net_salary";
    pub const NET_SALARY_MISMATCH: &str = "net_salary_mismatch";
    pub const NATIONAL_ID: &str = "national_id";
    pub const NATIONAL_ID_CHECK_DIGIT: &str = "national_id_check_digit";
    pub const NATIONAL_ID_FORMAT: &str = "national_id_format";
    pub const TAX_ID: &str = "tax_id";
    pub const TAX_ID_FORMAT: &str = "tax_id_format";
}

/// Outcome of running every payroll validator against one record.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub checks: Vec<CheckResult>,
    /// Failure reasons in check order.
    pub reasons: Vec<String>,
}

impl ValidationReport {
    /// True when no executed check failed. Warnings do not fail a record.
    pub fn is_valid(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Primary reason for an invalid record: the first failing check.
    pub fn reason(&self) -> Option<&str> {
        self.reasons.first().map(String::as_str)
    }

    fn record(&mut self, check: Option<CheckResult>) {
        if let Some(check) = check {
            if check.is_failure() {
                self.reasons.push(check.label.clone());
            }
            self.checks.push(check);
        }
    }
}

/// Validate extracted payslip fields as of `today`.
///
/// Checks run in a fixed order and are skipped when the fields they need are
/// missing:
/// - Payroll date freshness (not in the future, not older than 3 months)
/// - Settlement period not before the seniority date
/// - Earning items add up to total earnings
/// - Deduction items add up to total deductions
/// - Net salary equals earnings minus deductions
/// - Employee national ID format and check letter
/// - Company tax ID format
pub fn validate_payroll(data: &ExtractedPayrollData, today: NaiveDate) -> ValidationReport {
    let mut report = ValidationReport::default();

    // ── Dates ────────────────────────────────────────────────────────
    report.record(check_payroll_date(data, today));
    report.record(check_liquidation_period(data));

    // ── Arithmetic reconciliation ────────────────────────────────────
    report.record(check_earnings_sum(data));
    report.record(check_deductions_sum(data));
    report.record(check_net_salary(data));

    // ── Identifiers ──────────────────────────────────────────────────
    report.record(check_national_id(data));
    report.record(check_tax_id(data));

    report
}

/// Oldest payroll date still accepted on `today` (calendar-month arithmetic).
pub fn oldest_accepted_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(FRESHNESS_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}

pub fn check_payroll_date(data: &ExtractedPayrollData, today: NaiveDate) -> Option<CheckResult> {
    let raw = data.payroll_date()?;

    let Some(payroll_date) = parse_date(raw) else {
        return Some(CheckResult::warning(
            codes::PAYROLL_DATE_UNREADABLE,
            "Payroll date could not be read",
            format!(
                "The payroll date ({raw}) is not a recognized date, so its freshness could not be checked."
            ),
        ));
    };

    let oldest = oldest_accepted_date(today);
    let check = if payroll_date > today {
        CheckResult::error(
            codes::PAYROLL_DATE_FUTURE,
            "Payroll date is in the future",
            format!(
                "The payroll date ({raw}) is later than today ({today}). Payslips cannot be dated in the future."
            ),
        )
    } else if payroll_date < oldest {
        CheckResult::error(
            codes::PAYROLL_DATE_TOO_OLD,
            "Payslip is more than 3 months old",
            format!(
                "The payroll date ({raw}) is earlier than {oldest}. Only payslips from the last {FRESHNESS_MONTHS} months are accepted."
            ),
        )
    } else {
        CheckResult::success(
            codes::PAYROLL_DATE,
            "Payroll date valid",
            format!("The payroll date ({raw}) is within the last {FRESHNESS_MONTHS} months."),
        )
    };
    Some(check)
}

pub fn check_liquidation_period(data: &ExtractedPayrollData) -> Option<CheckResult> {
    let period_text = data.liquidation_period()?;
    let seniority_text = data.seniority_date()?;

    let unreadable = || {
        CheckResult::warning(
            codes::LIQUIDATION_PERIOD_UNREADABLE,
            "Settlement period could not be validated",
            format!(
                "The relationship between the settlement period ({period_text}) and the seniority date ({seniority_text}) could not be validated because a date format was not recognized."
            ),
        )
    };

    let period = match period::parse(period_text) {
        Ok(period) => period,
        Err(e) => {
            debug!(error = %e, "Settlement period not recognized");
            return Some(unreadable());
        }
    };
    let Some(seniority) = parse_date(seniority_text) else {
        debug!(seniority = %seniority_text, "Seniority date not recognized");
        return Some(unreadable());
    };

    let check = if period.starts_before(seniority) {
        CheckResult::error(
            codes::LIQUIDATION_PERIOD_BEFORE_SENIORITY,
            "Settlement period is before the seniority date",
            format!(
                "The settlement period ({period_text}) starts before the employee's seniority date ({seniority_text}); the employee was not with the company in that period."
            ),
        )
    } else {
        CheckResult::success(
            codes::LIQUIDATION_PERIOD,
            "Settlement period valid",
            format!(
                "The settlement period ({period_text}) is on or after the employee's seniority date ({seniority_text})."
            ),
        )
    };
    Some(check)
}

/// Wording and codes for one side of the payslip (earnings or deductions).
struct ItemSumRule {
    noun: &'static str,
    ok_code: &'static str,
    mismatch_code: &'static str,
}

const EARNINGS: ItemSumRule = ItemSumRule {
    noun: "earning",
    ok_code: codes::EARNINGS_SUM,
    mismatch_code: codes::EARNINGS_SUM_MISMATCH,
};

const DEDUCTIONS: ItemSumRule = ItemSumRule {
    noun: "deduction",
    ok_code: codes::DEDUCTIONS_SUM,
    mismatch_code: codes::DEDUCTIONS_SUM_MISMATCH,
};

pub fn check_earnings_sum(data: &ExtractedPayrollData) -> Option<CheckResult> {
    let total = data.total_earnings?;
    match data.earning_items() {
        Some(items) => Some(item_sum_check(&EARNINGS, items, total)),
        None => Some(CheckResult::success(
            codes::EARNINGS_TOTAL,
            "Total earnings verified",
            format!("The total earnings ({total:.2}€) are present; no itemized concepts were extracted."),
        )),
    }
}

pub fn check_deductions_sum(data: &ExtractedPayrollData) -> Option<CheckResult> {
    let total = data.total_deductions?;
    let items = data.deduction_items()?;
    Some(item_sum_check(&DEDUCTIONS, items, total))
}

fn item_sum_check(rule: &ItemSumRule, items: &[LineItem], total: Decimal) -> CheckResult {
    let sum: Decimal = items.iter().map(LineItem::amount_or_zero).sum();
    let difference = (sum - total).abs();

    if difference < AMOUNT_TOLERANCE {
        CheckResult::success(
            rule.ok_code,
            format!("{} items add up correctly", capitalize(rule.noun)),
            format!(
                "The sum of the {} items ({sum:.2}€) matches the total {}s ({total:.2}€).",
                rule.noun, rule.noun
            ),
        )
    } else {
        CheckResult::error(
            rule.mismatch_code,
            format!("{} items do not add up to the total", capitalize(rule.noun)),
            format!(
                "The {} items add up to {sum:.2}€, but the stated total is {total:.2}€. Difference: {difference:.2}€.",
                rule.noun
            ),
        )
    }
}

pub fn check_net_salary(data: &ExtractedPayrollData) -> Option<CheckResult> {
    let earnings = data.total_earnings?;
    let deductions = data.total_deductions?;
    let net = data.net_salary?;

    let calculated = earnings - deductions;
    let difference = (calculated - net).abs();

    let check = if difference < AMOUNT_TOLERANCE {
        CheckResult::success(
            codes::NET_SALARY,
            "Net salary correct",
            format!(
                "Total earnings ({earnings:.2}€) - total deductions ({deductions:.2}€) = net salary ({net:.2}€)."
            ),
        )
    } else {
        CheckResult::error(
            codes::NET_SALARY_MISMATCH,
            "Net salary does not match the calculation",
            format!(
                "Total earnings ({earnings:.2}€) - total deductions ({deductions:.2}€) = {calculated:.2}€, but the document states {net:.2}€. Difference: {difference:.2}€."
            ),
        )
    };
    Some(check)
}

pub fn check_national_id(data: &ExtractedPayrollData) -> Option<CheckResult> {
    let id = data.employee_national_id()?;

    let check = match identifiers::check_national_id(id) {
        NationalIdCheck::Valid => CheckResult::success(
            codes::NATIONAL_ID,
            "Employee national ID valid",
            format!("The employee national ID ({id}) is well formed and its check letter is correct."),
        ),
        NationalIdCheck::WrongCheckLetter { expected, found } => CheckResult::error(
            codes::NATIONAL_ID_CHECK_DIGIT,
            "Employee national ID has an invalid check digit",
            format!(
                "The employee national ID ({id}) has an incorrect check letter. It should be {expected} instead of {found}."
            ),
        ),
        NationalIdCheck::InvalidFormat => CheckResult::error(
            codes::NATIONAL_ID_FORMAT,
            "Employee national ID has an invalid format",
            format!(
                "The employee national ID ({id}) is not 8 digits followed by an uppercase letter."
            ),
        ),
    };
    Some(check)
}

pub fn check_tax_id(data: &ExtractedPayrollData) -> Option<CheckResult> {
    let id = data.company_tax_id()?;

    let check = if identifiers::is_valid_tax_id_format(id) {
        CheckResult::success(
            codes::TAX_ID,
            "Company tax ID valid",
            format!(
                "The company tax ID ({id}) has a valid format: a letter, 7 digits and a control character."
            ),
        )
    } else {
        CheckResult::error(
            codes::TAX_ID_FORMAT,
            "Company tax ID has an invalid format",
            format!(
                "The company tax ID ({id}) must be an uppercase letter followed by 7 digits and a control character."
            ),
        )
    };
    Some(check)
}

/// Parse an ISO 8601 date, accepting full timestamps as well.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

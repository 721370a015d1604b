/// Every config pointer the report path actually reads.
///
/// Keep in sync with `ReportConfig::from_json`; anything outside this list is
/// reported as unused.
pub static CONSUMED_POINTERS: &[&str] = &[
    "/input/path",
    "/input/date_format",
    "/input/day_basis",
    "/input/delimiter",
    "/matching/horizon_day",
    "/matching/valuation_date",
    "/matching/require_terminal_valuation",
    "/output/color",
    "/output/format",
];

//! View models derived from [`ClientState`].
//!
//! Amounts are shown in rupiah with Indonesian grouping (`Rp1.234,5`).

use chrono::NaiveDate;
use engine::MoneyCents;

use crate::state::{ClientState, Tab};

/// Formats `amount` as `Rp` followed by `.`-grouped units and up to two
/// `,`-separated decimals without trailing zeros.
pub fn rupiah(amount: MoneyCents) -> String {
    let cents = amount.cents();
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let units = group_thousands(abs / 100);
    let fraction = match abs % 100 {
        0 => String::new(),
        c if c % 10 == 0 => format!(",{}", c / 10),
        c => format!(",{c:02}"),
    };
    format!("{sign}Rp{units}{fraction}")
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

fn rupiah_text(amount: &str) -> String {
    rupiah(amount.parse().unwrap_or_default())
}

/// `d/m/yyyy`, the Indonesian short date.
fn short_date(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

pub fn header_total(state: &ClientState) -> String {
    format!("Total Spent: {}", rupiah(state.all_expenses_total))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    pub tab: Tab,
    pub label: &'static str,
    pub active: bool,
}

pub fn tab_labels(state: &ClientState) -> [TabLabel; 3] {
    let add = if state.editing.is_some() {
        "Edit Expense"
    } else {
        "Add Expense"
    };
    [
        (Tab::Add, add),
        (Tab::List, "Expenses List"),
        (Tab::Summary, "Summary"),
    ]
    .map(|(tab, label)| TabLabel {
        tab,
        label,
        active: state.active_tab == tab,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRow {
    pub id: i32,
    pub description: String,
    pub category: String,
    pub date: String,
    pub amount: String,
}

pub fn expense_rows(state: &ClientState) -> Vec<ExpenseRow> {
    state
        .expenses
        .iter()
        .map(|e| ExpenseRow {
            id: e.id,
            description: e.description.clone(),
            category: e.category.clone(),
            date: e.date.format("%Y-%m-%d").to_string(),
            amount: rupiah_text(&e.amount),
        })
        .collect()
}

/// Placeholder shown instead of the list when the page is empty.
pub fn empty_list_message(state: &ClientState) -> Option<&'static str> {
    if !state.expenses.is_empty() {
        return None;
    }
    Some(if state.expense_filters.is_active() {
        "No expenses found matching your filters. Try adjusting your search criteria."
    } else {
        "No expenses found. Add your first expense to get started!"
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub info: String,
    /// Controls are hidden when everything fits on one page.
    pub show_controls: bool,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub pages: Vec<PageButton>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub number: u64,
    pub current: bool,
}

pub fn pagination(state: &ClientState) -> PaginationView {
    let p = state.pagination;
    let mut info = format!(
        "Showing {} of {} expenses",
        state.expenses.len(),
        p.total_items
    );
    if p.total_items > 0 {
        info.push_str(&format!(" (Page {} of {})", p.current_page, p.total_pages));
    }

    PaginationView {
        info,
        show_controls: p.total_pages > 1,
        previous_enabled: state.previous_page_target().is_some(),
        next_enabled: state.next_page_target().is_some(),
        pages: (1..=p.total_pages)
            .map(|number| PageButton {
                number,
                current: number == p.current_page,
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub category: String,
    pub amount: String,
    pub count: String,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub heading: String,
    pub total: String,
    pub rows: Vec<SummaryRow>,
}

/// `None` when there is nothing to summarize for the selected period.
pub fn summary(state: &ClientState) -> Option<SummaryView> {
    if state.summary.is_empty() {
        return None;
    }

    let range = state.summary_range;
    let heading = if range.is_empty() {
        "All Time Summary".to_string()
    } else {
        let start = range.start_date.map(short_date).unwrap_or_default();
        let end = range.end_date.map(short_date).unwrap_or_default();
        let sep = if range.is_complete() { " - " } else { "" };
        format!("Summary for {start}{sep}{end}")
    };

    let total: MoneyCents = state
        .summary
        .iter()
        .map(|row| row.total.parse::<MoneyCents>().unwrap_or_default())
        .sum();

    Some(SummaryView {
        heading,
        total: format!("Total: {}", rupiah(total)),
        rows: state
            .summary
            .iter()
            .map(|row| SummaryRow {
                category: row.category.clone(),
                amount: rupiah_text(&row.total),
                count: format!("{} transactions", row.count),
                percentage: format!("{}%", row.percentage),
            })
            .collect(),
    })
}

pub const EMPTY_SUMMARY_MESSAGE: &str = "No spending data available for the selected period.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub title: &'static str,
    pub prompt: &'static str,
    pub description: String,
    pub category: String,
    pub date: String,
    pub amount: String,
    pub warning: &'static str,
}

pub fn delete_confirmation(state: &ClientState) -> Option<DeleteConfirmation> {
    state.delete_target.as_ref().map(|e| DeleteConfirmation {
        title: "Confirm Delete",
        prompt: "Are you sure you want to delete this expense?",
        description: e.description.clone(),
        category: e.category.clone(),
        date: e.date.format("%Y-%m-%d").to_string(),
        amount: rupiah_text(&e.amount),
        warning: "This action cannot be undone.",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::{
        expense::{ExpenseListResponse, ExpenseView, Pagination},
        summary::CategorySummary,
    };
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn expense(id: i32, amount: &str) -> ExpenseView {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        ExpenseView {
            id,
            amount: amount.to_string(),
            description: "Dinner".to_string(),
            category: "Food & Dining".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn rupiah_uses_indonesian_grouping() {
        assert_eq!(rupiah(MoneyCents::ZERO), "Rp0");
        assert_eq!(rupiah(MoneyCents::new(123_450)), "Rp1.234,5");
        assert_eq!(rupiah(MoneyCents::new(30_000)), "Rp300");
        assert_eq!(rupiah(MoneyCents::new(1_234_567_89)), "Rp1.234.567,89");
        assert_eq!(rupiah(MoneyCents::new(5)), "Rp0,05");
        assert_eq!(rupiah(MoneyCents::new(-100_000)), "-Rp1.000");
    }

    #[test]
    fn header_shows_running_total() {
        let mut state = ClientState::new(today());
        state.total_loaded(MoneyCents::new(250_000));
        assert_eq!(header_total(&state), "Total Spent: Rp2.500");
    }

    #[test]
    fn add_tab_label_follows_editing() {
        let mut state = ClientState::new(today());
        assert_eq!(tab_labels(&state)[0].label, "Add Expense");
        assert!(tab_labels(&state)[0].active);

        state.expenses_loaded(ExpenseListResponse {
            expenses: vec![expense(1, "1.00")],
            pagination: Pagination::default(),
        });
        state.start_edit(1);
        assert_eq!(tab_labels(&state)[0].label, "Edit Expense");
    }

    #[test]
    fn pagination_label_and_buttons() {
        let mut state = ClientState::new(today());
        state.expenses_loaded(ExpenseListResponse {
            expenses: vec![expense(1, "1.00"), expense(2, "2.00")],
            pagination: Pagination {
                current_page: 3,
                total_pages: 3,
                total_items: 12,
            },
        });

        let view = pagination(&state);
        assert_eq!(view.info, "Showing 2 of 12 expenses (Page 3 of 3)");
        assert!(view.show_controls);
        assert!(view.previous_enabled);
        assert!(!view.next_enabled);
        assert_eq!(view.pages.len(), 3);
        assert!(view.pages[2].current);
    }

    #[test]
    fn empty_list_has_no_page_suffix() {
        let state = ClientState::new(today());
        let view = pagination(&state);
        assert_eq!(view.info, "Showing 0 of 0 expenses");
        assert!(!view.show_controls);
        assert_eq!(
            empty_list_message(&state),
            Some("No expenses found. Add your first expense to get started!")
        );
    }

    #[test]
    fn summary_view_formats_rows() {
        let mut state = ClientState::new(today());
        assert!(summary(&state).is_none());

        state.summary_loaded(vec![
            CategorySummary {
                category: "Food & Dining".to_string(),
                total: "300.00".to_string(),
                count: 2,
                percentage: "75.0".to_string(),
            },
            CategorySummary {
                category: "Transportation".to_string(),
                total: "100.00".to_string(),
                count: 1,
                percentage: "25.0".to_string(),
            },
        ]);
        state.summary_range.start_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        state.summary_range.end_date = NaiveDate::from_ymd_opt(2024, 3, 31);

        let view = summary(&state).unwrap();
        assert_eq!(view.heading, "Summary for 1/3/2024 - 31/3/2024");
        assert_eq!(view.total, "Total: Rp400");
        assert_eq!(view.rows[0].amount, "Rp300");
        assert_eq!(view.rows[0].count, "2 transactions");
        assert_eq!(view.rows[1].percentage, "25.0%");
    }

    #[test]
    fn delete_confirmation_describes_target() {
        let mut state = ClientState::new(today());
        assert!(delete_confirmation(&state).is_none());

        state.expenses_loaded(ExpenseListResponse {
            expenses: vec![expense(9, "45000.50")],
            pagination: Pagination::default(),
        });
        state.request_delete(9);
        let confirm = delete_confirmation(&state).unwrap();
        assert_eq!(confirm.description, "Dinner");
        assert_eq!(confirm.amount, "Rp45.000,5");
        assert_eq!(confirm.date, "2024-05-01");
    }
}

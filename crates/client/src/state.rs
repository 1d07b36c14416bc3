//! Client view state and its transitions.
//!
//! [`ClientState`] holds everything a front end needs to render the tracker.
//! Transitions never perform I/O: the controller fetches, then hands the
//! result to the matching `*_loaded` or `*_failed` method.

use api_types::{
    expense::{
        AmountInput, ExpenseInput, ExpenseListQuery, ExpenseListResponse, ExpenseView, Pagination,
    },
    summary::{CategorySummary, SummaryQuery},
};
use chrono::NaiveDate;
use engine::{ALL_CATEGORIES, MoneyCents};
use serde::{Deserialize, Serialize};

/// Rows per page in the expense list.
pub const PAGE_SIZE: u64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Add,
    List,
    Summary,
}

/// Contents of the add/edit form, kept as typed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub amount: String,
    pub description: String,
    pub category: String,
    pub date: String,
}

impl ExpenseForm {
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            amount: String::new(),
            description: String::new(),
            category: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
        }
    }

    fn from_expense(expense: &ExpenseView) -> Self {
        Self {
            amount: expense.amount.clone(),
            description: expense.description.clone(),
            category: expense.category.clone(),
            date: expense.date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Request body for create or update. Validation is left to the server.
    pub fn to_input(&self) -> ExpenseInput {
        ExpenseInput {
            amount: Some(AmountInput::Text(self.amount.clone())),
            description: Some(self.description.clone()),
            category: Some(self.category.clone()),
            date: Some(self.date.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilters {
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ExpenseFilters {
    pub fn is_active(&self) -> bool {
        self.category.as_deref().is_some_and(|c| !c.is_empty())
            || self.start_date.is_some()
            || self.end_date.is_some()
    }

    pub fn query(&self, page: u64, limit: u64) -> ExpenseListQuery {
        ExpenseListQuery {
            page: Some(page),
            limit: Some(limit),
            category: self
                .category
                .clone()
                .filter(|c| !c.is_empty() && c != ALL_CATEGORIES),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SummaryRange {
    /// A range is only applied once both ends are chosen.
    pub fn is_complete(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }

    pub fn query(&self) -> SummaryQuery {
        SummaryQuery {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    pub expenses: Vec<ExpenseView>,
    pub pagination: Pagination,
    pub categories: Vec<String>,
    pub summary: Vec<CategorySummary>,
    /// Sum of every stored expense, ignoring list filters.
    pub all_expenses_total: MoneyCents,
    pub loading: bool,
    pub active_tab: Tab,
    pub editing: Option<ExpenseView>,
    pub form: ExpenseForm,
    pub expense_filters: ExpenseFilters,
    pub summary_range: SummaryRange,
    pub delete_target: Option<ExpenseView>,
}

impl ClientState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            expenses: Vec::new(),
            pagination: Pagination::default(),
            categories: Vec::new(),
            summary: Vec::new(),
            all_expenses_total: MoneyCents::ZERO,
            loading: false,
            active_tab: Tab::Add,
            editing: None,
            form: ExpenseForm::blank(today),
            expense_filters: ExpenseFilters::default(),
            summary_range: SummaryRange::default(),
            delete_target: None,
        }
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Loads the expense with `id` from the current page into the form.
    /// Returns `false` if it is not on the page.
    pub fn start_edit(&mut self, id: i32) -> bool {
        let Some(expense) = self.expenses.iter().find(|e| e.id == id).cloned() else {
            return false;
        };
        self.form = ExpenseForm::from_expense(&expense);
        self.editing = Some(expense);
        self.active_tab = Tab::Add;
        true
    }

    pub fn cancel_edit(&mut self, today: NaiveDate) {
        self.editing = None;
        self.form = ExpenseForm::blank(today);
    }

    /// Marks the expense with `id` on the current page for deletion.
    pub fn request_delete(&mut self, id: i32) -> bool {
        self.delete_target = self.expenses.iter().find(|e| e.id == id).cloned();
        self.delete_target.is_some()
    }

    pub fn cancel_delete(&mut self) {
        self.delete_target = None;
    }

    /// `page` if it lies within `[1, total_pages]`.
    pub fn page_target(&self, page: u64) -> Option<u64> {
        (1..=self.pagination.total_pages)
            .contains(&page)
            .then_some(page)
    }

    pub fn next_page_target(&self) -> Option<u64> {
        self.page_target(self.pagination.current_page.saturating_add(1))
    }

    pub fn previous_page_target(&self) -> Option<u64> {
        self.page_target(self.pagination.current_page.saturating_sub(1))
    }

    /// Page to fetch once the delete target is gone: one back when it was the
    /// only row on a page past the first.
    pub fn page_after_delete(&self) -> u64 {
        let current = self.pagination.current_page;
        if self.expenses.len() == 1 && current > 1 {
            current - 1
        } else {
            current
        }
    }

    pub fn expenses_loaded(&mut self, response: ExpenseListResponse) {
        self.expenses = response.expenses;
        self.pagination = response.pagination;
    }

    pub fn expenses_failed(&mut self) {
        self.expenses.clear();
        self.pagination = Pagination::default();
    }

    pub fn categories_loaded(&mut self, categories: Vec<String>) {
        self.categories = categories;
    }

    pub fn summary_loaded(&mut self, rows: Vec<CategorySummary>) {
        self.summary = rows;
    }

    pub fn summary_failed(&mut self) {
        self.summary.clear();
    }

    pub fn total_loaded(&mut self, total: MoneyCents) {
        self.all_expenses_total = total;
    }

    pub fn total_failed(&mut self) {
        self.all_expenses_total = MoneyCents::ZERO;
    }

    /// A create or update went through.
    pub fn submitted(&mut self, today: NaiveDate) {
        self.form = ExpenseForm::blank(today);
        self.editing = None;
        self.active_tab = Tab::List;
    }

    pub fn clear_filters(&mut self) {
        self.expense_filters = ExpenseFilters::default();
    }

    pub fn clear_summary_range(&mut self) {
        self.summary_range = SummaryRange::default();
    }
}

/// Sum of the `amount` fields of a listing page.
pub fn page_total(expenses: &[ExpenseView]) -> MoneyCents {
    expenses
        .iter()
        .map(|e| match e.amount.parse::<MoneyCents>() {
            Ok(amount) => amount,
            Err(_) => {
                tracing::warn!("ignoring unparsable amount {:?} of expense {}", e.amount, e.id);
                MoneyCents::ZERO
            }
        })
        .sum()
}

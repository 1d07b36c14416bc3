//! Drives [`ClientState`] against the API.
//!
//! Every mutation is followed by a full, sequential re-fetch of the expense
//! page, the summary and the running total. Cached rows are never patched
//! locally. Fetch failures are logged and turned into state resets.

use api_types::expense::ExpenseListQuery;
use chrono::NaiveDate;
use engine::MoneyCents;

use crate::{
    client::{Client, ClientError},
    state::{ClientState, ExpenseFilters, ExpenseForm, PAGE_SIZE, SummaryRange, Tab, page_total},
};

/// Page size used when summing every stored expense.
const TOTAL_PAGE_LIMIT: u64 = 100;

type ClientResult<T> = Result<T, ClientError>;

pub struct Controller {
    client: Client,
    state: ClientState,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl Controller {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: ClientState::new(today()),
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub async fn init(&mut self) {
        self.fetch_expenses(1).await;
        self.fetch_categories().await;
        self.fetch_summary().await;
        self.fetch_total().await;
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.state.select_tab(tab);
    }

    pub fn set_form(&mut self, form: ExpenseForm) {
        self.state.form = form;
    }

    pub fn start_edit(&mut self, id: i32) -> bool {
        self.state.start_edit(id)
    }

    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit(today());
    }

    /// Creates or updates from the form, depending on whether an edit is in
    /// progress, then re-fetches from page 1.
    ///
    /// The form is only reset when the write succeeds. The re-fetch runs
    /// either way.
    pub async fn submit(&mut self) -> ClientResult<()> {
        self.state.loading = true;
        let input = self.state.form.to_input();
        let result = match &self.state.editing {
            Some(expense) => self.client.update_expense(expense.id, &input).await,
            None => self.client.create_expense(&input).await,
        };

        match &result {
            Ok(expense) => {
                tracing::debug!("saved expense {}", expense.id);
                self.state.submitted(today());
            }
            Err(err) => tracing::error!("error saving expense: {err}"),
        }

        self.fetch_expenses(1).await;
        self.fetch_summary().await;
        self.fetch_total().await;
        self.state.loading = false;
        result.map(|_| ())
    }

    pub fn request_delete(&mut self, id: i32) -> bool {
        self.state.request_delete(id)
    }

    pub fn cancel_delete(&mut self) {
        self.state.cancel_delete();
    }

    /// Deletes the pending target, if any, and re-fetches the page that is
    /// still valid afterwards.
    pub async fn confirm_delete(&mut self) -> ClientResult<()> {
        let Some(target) = self.state.delete_target.clone() else {
            return Ok(());
        };

        let result = self.client.delete_expense(target.id).await;
        if let Err(err) = &result {
            tracing::error!("error deleting expense {}: {err}", target.id);
        }

        let page = self.state.page_after_delete();
        self.fetch_expenses(page).await;
        self.fetch_summary().await;
        self.fetch_total().await;
        self.state.cancel_delete();
        result.map(|_| ())
    }

    /// Fetches `page` if it lies within the known page range. Returns
    /// whether a fetch happened.
    pub async fn go_to_page(&mut self, page: u64) -> bool {
        match self.state.page_target(page) {
            Some(page) => {
                self.fetch_expenses(page).await;
                true
            }
            None => false,
        }
    }

    pub async fn next_page(&mut self) -> bool {
        match self.state.next_page_target() {
            Some(page) => self.go_to_page(page).await,
            None => false,
        }
    }

    pub async fn previous_page(&mut self) -> bool {
        match self.state.previous_page_target() {
            Some(page) => self.go_to_page(page).await,
            None => false,
        }
    }

    pub async fn apply_filters(&mut self, filters: ExpenseFilters) {
        self.state.expense_filters = filters;
        self.fetch_expenses(1).await;
    }

    pub async fn clear_filters(&mut self) {
        self.state.clear_filters();
        self.fetch_expenses(1).await;
    }

    /// Applies a summary range once both ends are set; otherwise leaves the
    /// summary untouched and returns `false`.
    pub async fn apply_summary_range(&mut self, range: SummaryRange) -> bool {
        if !range.is_complete() {
            tracing::warn!("summary range needs both a start and an end date");
            return false;
        }
        self.state.summary_range = range;
        self.fetch_summary().await;
        true
    }

    pub async fn clear_summary_range(&mut self) {
        self.state.clear_summary_range();
        self.fetch_summary().await;
    }

    async fn fetch_expenses(&mut self, page: u64) {
        self.state.loading = true;
        let query = self.state.expense_filters.query(page, PAGE_SIZE);
        match self.client.list_expenses(&query).await {
            Ok(response) => self.state.expenses_loaded(response),
            Err(err) => {
                tracing::error!("error fetching expenses: {err}");
                self.state.expenses_failed();
            }
        }
        self.state.loading = false;
    }

    async fn fetch_categories(&mut self) {
        match self.client.categories().await {
            Ok(categories) => self.state.categories_loaded(categories),
            Err(err) => tracing::error!("error fetching categories: {err}"),
        }
    }

    async fn fetch_summary(&mut self) {
        match self.client.summary(&self.state.summary_range.query()).await {
            Ok(rows) => self.state.summary_loaded(rows),
            Err(err) => {
                tracing::error!("error fetching summary: {err}");
                self.state.summary_failed();
            }
        }
    }

    async fn fetch_total(&mut self) {
        match self.sum_all_expenses().await {
            Ok(total) => self.state.total_loaded(total),
            Err(err) => {
                tracing::error!("error fetching total expenses: {err}");
                self.state.total_failed();
            }
        }
    }

    /// Walks every page of the unfiltered listing.
    async fn sum_all_expenses(&self) -> ClientResult<MoneyCents> {
        let mut total = MoneyCents::ZERO;
        let mut page = 1;
        loop {
            let query = ExpenseListQuery {
                page: Some(page),
                limit: Some(TOTAL_PAGE_LIMIT),
                ..Default::default()
            };
            let response = self.client.list_expenses(&query).await?;
            total += page_total(&response.expenses);
            if page >= response.pagination.total_pages {
                return Ok(total);
            }
            page += 1;
        }
    }
}

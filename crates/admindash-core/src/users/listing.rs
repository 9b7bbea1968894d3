use std::collections::BTreeSet;

use super::model::{ListedUser, UserFilters};

pub const ITEMS_PER_PAGE: usize = 5;

/// Client-side view over the fetched users: filters, pagination and
/// local edits. Edits are never sent back to the API.
#[derive(Debug, Clone)]
pub struct UserListing {
    users: Vec<ListedUser>,
    filters: UserFilters,
    page: usize,
}

impl Default for UserListing {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            filters: UserFilters::default(),
            page: 1,
        }
    }
}

impl UserListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the listing with a fresh fetch. Filters survive, the page
    /// is clamped to the new result.
    pub fn set_users(&mut self, users: Vec<ListedUser>) {
        self.users = users;
        self.clamp_page();
    }

    pub fn users(&self) -> &[ListedUser] {
        &self.users
    }

    pub fn filters(&self) -> &UserFilters {
        &self.filters
    }

    pub fn filtered(&self) -> Vec<&ListedUser> {
        self.users.iter().filter(|u| self.filters.matches(u)).collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.users.iter().filter(|u| self.filters.matches(u)).count()
    }

    /// Current page, 1-based
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.filtered_count().div_ceil(ITEMS_PER_PAGE)
    }

    pub fn page_items(&self) -> Vec<&ListedUser> {
        let start = (self.page - 1) * ITEMS_PER_PAGE;
        self.filtered()
            .into_iter()
            .skip(start)
            .take(ITEMS_PER_PAGE)
            .collect()
    }

    pub fn next_page(&mut self) {
        if self.page < self.total_pages() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    // ===== Filters (any change resets to page 1) =====

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.page = 1;
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.filters.city = city.into();
        self.page = 1;
    }

    pub fn set_company(&mut self, company: impl Into<String>) {
        self.filters.company = company.into();
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters = UserFilters::default();
        self.page = 1;
    }

    pub fn has_active_filters(&self) -> bool {
        self.filters.is_active()
    }

    /// Distinct cities, sorted
    pub fn cities(&self) -> Vec<String> {
        self.users
            .iter()
            .map(|u| u.city().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct company names, sorted
    pub fn companies(&self) -> Vec<String> {
        self.users
            .iter()
            .map(|u| u.company_name().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Replace the user with the same id. Returns false if no such user.
    pub fn update_user(&mut self, updated: ListedUser) -> bool {
        match self.users.iter_mut().find(|u| u.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                self.clamp_page();
                true
            }
            None => false,
        }
    }

    pub fn find(&self, id: u64) -> Option<&ListedUser> {
        self.users.iter().find(|u| u.id == id)
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.total_pages().max(1));
    }
}

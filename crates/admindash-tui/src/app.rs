//! Application state for the admindash TUI.
//!
//! `App` owns the core services (auth, settings, the shared `AppStore` and
//! the users API) together with all UI state. The users listing is fetched
//! on a background task and delivered through an mpsc channel.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use admindash_core::api::{ApiError, HttpTransport, ReqwestTransport, UsersApi};
use admindash_core::auth::{AuthService, SessionCodec};
use admindash_core::settings::{
    cycle_option, SettingsStore, UserPreferences, EMAIL_DIGESTS, LANGUAGES, TIMEZONES,
};
use admindash_core::state::{AppStore, NotificationKind};
use admindash_core::storage::{FileStore, KeyValueStore, MemoryStore};
use admindash_core::users::{ListedUser, UserListing};
use admindash_core::Config;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 8;

const MAX_EMAIL_LENGTH: usize = 100;

/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

const MAX_SEARCH_LENGTH: usize = 64;

/// Maximum length of an editable user field
const MAX_FIELD_LENGTH: usize = 100;

/// How often the persistent store is re-read for changes made elsewhere
const STORAGE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Login form prefill, read from the environment (or `.env`)
const EMAIL_ENV: &str = "ADMINDASH_EMAIL";
const PASSWORD_ENV: &str = "ADMINDASH_PASSWORD";

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Users,
    Settings,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Users => "Users",
            Tab::Settings => "Settings",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Users,
            Tab::Users => Tab::Settings,
            Tab::Settings => Tab::Dashboard,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Settings,
            Tab::Users => Tab::Dashboard,
            Tab::Settings => Tab::Users,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    LoggingIn,
    EditingUser,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// Rows of the settings form, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    DarkMode,
    EmailNotifications,
    PushNotifications,
    SmsNotifications,
    Language,
    Timezone,
    EmailDigest,
}

impl SettingsField {
    pub const ALL: [SettingsField; 7] = [
        SettingsField::DarkMode,
        SettingsField::EmailNotifications,
        SettingsField::PushNotifications,
        SettingsField::SmsNotifications,
        SettingsField::Language,
        SettingsField::Timezone,
        SettingsField::EmailDigest,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::DarkMode => "Dark Mode",
            SettingsField::EmailNotifications => "Email Notifications",
            SettingsField::PushNotifications => "Push Notifications",
            SettingsField::SmsNotifications => "SMS Notifications",
            SettingsField::Language => "Language",
            SettingsField::Timezone => "Timezone",
            SettingsField::EmailDigest => "Email Digest",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Editable fields of the user edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Email,
    Phone,
    Website,
}

impl EditField {
    pub const ALL: [EditField; 4] = [
        EditField::Name,
        EditField::Email,
        EditField::Phone,
        EditField::Website,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EditField::Name => "Name",
            EditField::Email => "Email",
            EditField::Phone => "Phone",
            EditField::Website => "Website",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            EditField::Name => EditField::Email,
            EditField::Email => EditField::Phone,
            EditField::Phone => EditField::Website,
            EditField::Website => EditField::Name,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            EditField::Name => EditField::Website,
            EditField::Email => EditField::Name,
            EditField::Phone => EditField::Email,
            EditField::Website => EditField::Phone,
        }
    }
}

/// In-progress edit of one listed user
#[derive(Debug, Clone)]
pub struct UserEditForm {
    pub user: ListedUser,
    pub focus: EditField,
    pub error: Option<String>,
}

impl UserEditForm {
    fn new(user: ListedUser) -> Self {
        Self {
            user,
            focus: EditField::Name,
            error: None,
        }
    }

    pub fn value(&self, field: EditField) -> &str {
        match field {
            EditField::Name => &self.user.name,
            EditField::Email => &self.user.email,
            EditField::Phone => &self.user.phone,
            EditField::Website => &self.user.website,
        }
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            EditField::Name => &mut self.user.name,
            EditField::Email => &mut self.user.email,
            EditField::Phone => &mut self.user.phone,
            EditField::Website => &mut self.user.website,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.user.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if !self.user.email.contains('@') {
            return Err("Email must contain '@'".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from background tasks back to the main loop.
enum BackgroundResult {
    Users(Result<Vec<ListedUser>, ApiError>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub auth: AuthService,
    pub store: AppStore,
    pub settings: SettingsStore,
    preferences_rx: watch::Receiver<UserPreferences>,
    persistent: Arc<dyn KeyValueStore>,
    file_store: Option<Arc<FileStore>>,
    /// Write the config back to disk on login (off for in-memory setups)
    save_config: bool,
    users_api: UsersApi,
    pub listing: UserListing,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub status_message: Option<String>,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Users tab state
    pub search_query: String,
    pub user_selection: usize,
    pub users_loading: bool,
    pub users_error: Option<String>,
    pub edit_form: Option<UserEditForm>,

    // Settings tab state
    pub settings_draft: UserPreferences,
    settings_baseline: UserPreferences,
    pub settings_field: SettingsField,

    // Background task channel
    bg_rx: mpsc::Receiver<BackgroundResult>,
    bg_tx: mpsc::Sender<BackgroundResult>,

    last_storage_poll: Instant,
    persisted_notification_ids: Vec<String>,
}

impl App {
    /// Create the application with on-disk storage and a real HTTP client
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let storage_path = config.storage_path()?;
        let file_store = Arc::new(
            FileStore::open(&storage_path)
                .with_context(|| format!("Failed to open storage at {}", storage_path.display()))?,
        );
        debug!(path = %storage_path.display(), "Persistent storage opened");

        let transport = ReqwestTransport::new(Duration::from_secs(config.request_timeout_secs))?;

        let mut app = Self::with_backends(config, file_store.clone(), Arc::new(transport))?;
        app.file_store = Some(file_store);
        app.save_config = true;
        Ok(app)
    }

    /// Create the application on top of the given persistent store and
    /// HTTP transport. The session store is always process-scoped.
    pub fn with_backends(
        config: Config,
        persistent: Arc<dyn KeyValueStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let codec = match config.session_passphrase {
            Some(ref passphrase) => SessionCodec::new(passphrase)?,
            None => SessionCodec::with_default_key()?,
        };
        let session_store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let auth = AuthService::new(session_store, codec)
            .with_login_delay(Duration::from_millis(config.login_delay_ms));

        let store = AppStore::new();
        store.restore_notifications(persistent.as_ref());
        let persisted_notification_ids = notification_ids(&store);

        let settings = SettingsStore::load(persistent.clone());
        let preferences_rx = settings.subscribe();
        let preferences = settings.preferences();

        let users_api = UsersApi::with_transport(&config, transport, store.clone());

        let login_email = std::env::var(EMAIL_ENV)
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();
        let login_password = std::env::var(PASSWORD_ENV).unwrap_or_default();

        let (bg_tx, bg_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            auth,
            store,
            settings,
            preferences_rx,
            persistent,
            file_store: None,
            save_config: false,
            users_api,
            listing: UserListing::new(),

            state: AppState::Normal,
            current_tab: Tab::Dashboard,
            status_message: None,

            login_email,
            login_password,
            login_focus: LoginFocus::Email,
            login_error: None,

            search_query: String::new(),
            user_selection: 0,
            users_loading: false,
            users_error: None,
            edit_form: None,

            settings_draft: preferences.clone(),
            settings_baseline: preferences,
            settings_field: SettingsField::DarkMode,

            bg_rx,
            bg_tx,

            last_storage_poll: Instant::now(),
            persisted_notification_ids,
        })
    }

    /// Restore a saved session or show the login form
    pub fn startup(&mut self) {
        if self.auth.restore().is_some() {
            self.state = AppState::Normal;
            self.refresh_users();
        } else {
            self.start_login();
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Show the login overlay
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) {
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();

        if email.is_empty() || password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return;
        }

        self.login_error = None;
        let result = self.auth.login(&email, &password).await;

        if result.success {
            self.config.last_email = Some(email);
            if self.save_config {
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
            }
            self.login_password.clear();
            self.state = AppState::Normal;
            self.current_tab = Tab::Dashboard;
            info!("Login successful");
            self.refresh_users();
        } else {
            self.login_error = result.error;
        }
    }

    pub fn logout(&mut self) {
        self.auth.logout();
        self.listing = UserListing::new();
        self.user_selection = 0;
        self.search_query.clear();
        self.users_error = None;
        self.edit_form = None;
        self.login_password.clear();
        self.start_login();
    }

    // =========================================================================
    // Background Tasks
    // =========================================================================

    /// Fetch the users listing on a background task
    pub fn refresh_users(&mut self) {
        if self.users_loading {
            return;
        }
        self.users_loading = true;
        self.users_error = None;

        let api = self.users_api.clone();
        let tx = self.bg_tx.clone();
        tokio::spawn(async move {
            let result = api.load_users().await;
            if tx.send(BackgroundResult::Users(result)).await.is_err() {
                debug!("Users result dropped, receiver closed");
            }
        });
    }

    /// Drain completed background tasks
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.bg_rx.try_recv() {
            self.process_background_result(result);
        }
    }

    fn process_background_result(&mut self, result: BackgroundResult) {
        match result {
            BackgroundResult::Users(Ok(users)) => {
                debug!(count = users.len(), "Users received");
                self.listing.set_users(users);
                self.clamp_user_selection();
                self.users_loading = false;
            }
            BackgroundResult::Users(Err(e)) => {
                self.users_error = Some(e.to_string());
                self.users_loading = false;
            }
        }
    }

    /// Periodic housekeeping, called once per main-loop iteration
    pub fn tick(&mut self) {
        self.check_background_tasks();
        self.poll_storage();
        self.sync_preferences();

        if self.store.prune_expired() > 0 {
            debug!("Expired notifications pruned");
        }
        self.persist_notifications_if_changed();
    }

    /// Pick up edits other processes made to the persistent store
    fn poll_storage(&mut self) {
        let Some(ref file_store) = self.file_store else {
            return;
        };
        if self.last_storage_poll.elapsed() < STORAGE_POLL_INTERVAL {
            return;
        }
        self.last_storage_poll = Instant::now();

        match file_store.reload() {
            Ok(events) => {
                for event in &events {
                    self.settings.on_storage_event(event);
                }
            }
            Err(e) => warn!(error = %e, "Failed to reload persistent storage"),
        }
    }

    /// Follow saved preferences. Unsaved edits in the form are kept.
    fn sync_preferences(&mut self) {
        if !self.preferences_rx.has_changed().unwrap_or(false) {
            return;
        }
        let latest = self.preferences_rx.borrow_and_update().clone();
        if self.settings_draft == self.settings_baseline {
            self.settings_draft = latest.clone();
        }
        self.settings_baseline = latest;
    }

    fn persist_notifications_if_changed(&mut self) {
        let ids = notification_ids(&self.store);
        if ids == self.persisted_notification_ids {
            return;
        }
        match self.store.persist_notifications(self.persistent.as_ref()) {
            Ok(()) => self.persisted_notification_ids = ids,
            Err(e) => warn!(error = %e, "Failed to persist notifications"),
        }
    }

    // =========================================================================
    // Users Tab
    // =========================================================================

    pub fn selected_user(&self) -> Option<&ListedUser> {
        self.listing.page_items().get(self.user_selection).copied()
    }

    pub fn move_user_selection(&mut self, down: bool) {
        let count = self.listing.page_items().len();
        if count == 0 {
            return;
        }
        if down {
            self.user_selection = (self.user_selection + 1).min(count - 1);
        } else {
            self.user_selection = self.user_selection.saturating_sub(1);
        }
    }

    pub fn next_page(&mut self) {
        self.listing.next_page();
        self.user_selection = 0;
    }

    pub fn prev_page(&mut self) {
        self.listing.prev_page();
        self.user_selection = 0;
    }

    /// Apply the current search query as a filter
    pub fn apply_search(&mut self) {
        self.listing.set_search(self.search_query.clone());
        self.user_selection = 0;
    }

    /// Step the city filter through "all" and every known city
    pub fn cycle_city_filter(&mut self) {
        let next = next_filter_value(&self.listing.cities(), &self.listing.filters().city);
        self.listing.set_city(next);
        self.user_selection = 0;
    }

    /// Step the company filter through "all" and every known company
    pub fn cycle_company_filter(&mut self) {
        let next = next_filter_value(&self.listing.companies(), &self.listing.filters().company);
        self.listing.set_company(next);
        self.user_selection = 0;
    }

    pub fn clear_filters(&mut self) {
        self.listing.clear_filters();
        self.search_query.clear();
        self.user_selection = 0;
    }

    pub fn begin_edit(&mut self) {
        if let Some(user) = self.selected_user().cloned() {
            self.edit_form = Some(UserEditForm::new(user));
            self.state = AppState::EditingUser;
        }
    }

    /// Apply the edit form to the listing. Edits stay local.
    pub fn save_edit(&mut self) {
        let Some(form) = self.edit_form.as_mut() else {
            return;
        };
        if let Err(message) = form.validate() {
            form.error = Some(message);
            return;
        }

        let Some(form) = self.edit_form.take() else {
            return;
        };
        let name = form.user.name.clone();
        if self.listing.update_user(form.user) {
            self.store.add_notification(
                format!("User {} updated successfully!", name),
                NotificationKind::Success,
            );
        }
        self.clamp_user_selection();
        self.state = AppState::Normal;
    }

    pub fn cancel_edit(&mut self) {
        self.edit_form = None;
        self.state = AppState::Normal;
    }

    fn clamp_user_selection(&mut self) {
        let count = self.listing.page_items().len();
        self.user_selection = self.user_selection.min(count.saturating_sub(1));
    }

    // =========================================================================
    // Settings Tab
    // =========================================================================

    pub fn dark_mode(&self) -> bool {
        self.settings.dark_mode()
    }

    pub fn settings_has_changes(&self) -> bool {
        self.settings_draft != self.settings_baseline
    }

    /// Toggle or cycle the focused settings field in the draft
    pub fn adjust_setting(&mut self, forward: bool) {
        let draft = &mut self.settings_draft;
        match self.settings_field {
            SettingsField::DarkMode => draft.dark_mode = !draft.dark_mode,
            SettingsField::EmailNotifications => {
                draft.notifications.email = !draft.notifications.email
            }
            SettingsField::PushNotifications => {
                draft.notifications.push = !draft.notifications.push
            }
            SettingsField::SmsNotifications => draft.notifications.sms = !draft.notifications.sms,
            SettingsField::Language => {
                draft.language = cycle_option(LANGUAGES, &draft.language, forward)
            }
            SettingsField::Timezone => {
                draft.timezone = cycle_option(TIMEZONES, &draft.timezone, forward)
            }
            SettingsField::EmailDigest => {
                draft.email_digest = cycle_option(EMAIL_DIGESTS, &draft.email_digest, forward)
            }
        }
    }

    pub fn save_settings(&mut self) {
        match self.settings.save(self.settings_draft.clone()) {
            Ok(()) => {
                self.settings_baseline = self.settings_draft.clone();
                self.store
                    .add_notification("Settings saved successfully!", NotificationKind::Success);
            }
            Err(e) => {
                warn!(error = %e, "Failed to save settings");
                self.store.add_notification(
                    "Failed to save settings. Please try again.",
                    NotificationKind::Error,
                );
            }
        }
    }

    pub fn reset_settings(&mut self) {
        match self.settings.reset() {
            Ok(()) => {
                self.settings_draft = UserPreferences::default();
                self.settings_baseline = UserPreferences::default();
                self.store
                    .add_notification("Settings reset to defaults!", NotificationKind::Info);
            }
            Err(e) => warn!(error = %e, "Failed to reset settings"),
        }
    }

    /// Discard unsaved edits
    pub fn cancel_settings(&mut self) {
        self.settings_draft = self.settings_baseline.clone();
    }

    /// Flip dark mode immediately, outside the settings form
    pub fn toggle_dark_mode(&mut self) {
        match self.settings.toggle_dark_mode() {
            Ok(dark_mode) => {
                self.settings_draft.dark_mode = dark_mode;
                self.settings_baseline.dark_mode = dark_mode;
            }
            Err(e) => {
                warn!(error = %e, "Failed to toggle dark mode");
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }
}

fn notification_ids(store: &AppStore) -> Vec<String> {
    store.notifications().into_iter().map(|n| n.id).collect()
}

/// Cycle "" -> first option -> ... -> last option -> ""
fn next_filter_value(options: &[String], current: &str) -> String {
    if current.is_empty() {
        return options.first().cloned().unwrap_or_default();
    }
    match options.iter().position(|o| o == current) {
        Some(i) if i + 1 < options.len() => options[i + 1].clone(),
        _ => String::new(),
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_search_char(current_len: usize, c: char) -> bool {
    current_len < MAX_SEARCH_LENGTH && is_valid_input_char(c)
}

pub fn can_add_field_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use admindash_core::api::{HttpRequest, HttpResponse};
    use admindash_core::settings::PREFERENCES_KEY;
    use admindash_core::users::{Address, Company, Geo};
    use async_trait::async_trait;

    struct StubTransport {
        body: String,
    }

    #[async_trait]
    impl HttpTransport for StubTransport {
        async fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            Ok(HttpResponse {
                status: 200,
                status_text: "OK".to_string(),
                body: self.body.clone(),
            })
        }
    }

    fn user(id: u64, name: &str, city: &str, company: &str) -> ListedUser {
        ListedUser {
            id,
            name: name.to_string(),
            username: format!("user{}", id),
            email: format!("user{}@example.org", id),
            address: Address {
                street: "Kulas Light".to_string(),
                suite: "Apt. 556".to_string(),
                city: city.to_string(),
                zipcode: "92998-3874".to_string(),
                geo: Geo {
                    lat: "0".to_string(),
                    lng: "0".to_string(),
                },
            },
            phone: "555-0100".to_string(),
            website: "example.org".to_string(),
            company: Company {
                name: company.to_string(),
                catch_phrase: "Synergy".to_string(),
                bs: "e-markets".to_string(),
            },
        }
    }

    fn sample_users() -> Vec<ListedUser> {
        vec![
            user(1, "Leanne Graham", "Gwenborough", "Romaguera-Crona"),
            user(2, "Ervin Howell", "Wisokyburgh", "Deckow-Crist"),
            user(3, "Clementine Bauch", "McKenziehaven", "Romaguera-Jacobson"),
            user(4, "Patricia Lebsack", "South Elvis", "Robel-Corkery"),
            user(5, "Chelsey Dietrich", "Roscoeview", "Keebler LLC"),
            user(6, "Dennis Schulist", "South Christy", "Considine-Lockman"),
            user(7, "Kurtis Weissnat", "Howemouth", "Johns Group"),
        ]
    }

    fn test_app() -> (App, Arc<MemoryStore>) {
        let persistent = Arc::new(MemoryStore::new());
        let transport = Arc::new(StubTransport {
            body: serde_json::to_string(&sample_users()).unwrap(),
        });
        let config = Config {
            login_delay_ms: 0,
            max_retries: 0,
            ..Config::default()
        };
        let mut app = App::with_backends(config, persistent.clone(), transport).unwrap();
        app.login_email.clear();
        app.login_password.clear();
        (app, persistent)
    }

    async fn wait_for_users(app: &mut App) {
        for _ in 0..200 {
            app.check_background_tasks();
            if !app.users_loading {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("users never loaded");
    }

    async fn loaded_app() -> App {
        let (mut app, _) = test_app();
        app.refresh_users();
        wait_for_users(&mut app).await;
        app
    }

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next() {
        assert_eq!(Tab::Dashboard.next(), Tab::Users);
        assert_eq!(Tab::Users.next(), Tab::Settings);
        assert_eq!(Tab::Settings.next(), Tab::Dashboard); // Wraps around
    }

    #[test]
    fn test_tab_prev() {
        assert_eq!(Tab::Dashboard.prev(), Tab::Settings); // Wraps around
        assert_eq!(Tab::Settings.prev(), Tab::Users);
        assert_eq!(Tab::Users.prev(), Tab::Dashboard);
    }

    #[test]
    fn test_settings_field_cycle() {
        assert_eq!(SettingsField::DarkMode.next(), SettingsField::EmailNotifications);
        assert_eq!(SettingsField::EmailDigest.next(), SettingsField::DarkMode);
        assert_eq!(SettingsField::DarkMode.prev(), SettingsField::EmailDigest);
        assert_eq!(EditField::Website.next(), EditField::Name);
        assert_eq!(EditField::Name.prev(), EditField::Website);
    }

    // -------------------------------------------------------------------------
    // Login Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_startup_without_session_shows_login() {
        let (mut app, _) = test_app();
        app.startup();
        assert_eq!(app.state, AppState::LoggingIn);
        assert_eq!(app.login_focus, LoginFocus::Email);
        assert!(!app.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let (mut app, _) = test_app();
        app.start_login();
        app.login_email = "admin@example.com".to_string();
        app.attempt_login().await;
        assert_eq!(app.login_error.as_deref(), Some("Email and password required"));
        assert_eq!(app.state, AppState::LoggingIn);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let (mut app, _) = test_app();
        app.start_login();
        app.login_email = "admin@example.com".to_string();
        app.login_password = "hunter2".to_string();
        app.attempt_login().await;
        assert_eq!(app.login_error.as_deref(), Some("Invalid email or password"));
        assert_eq!(app.state, AppState::LoggingIn);
        assert!(!app.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let (mut app, _) = test_app();
        app.start_login();
        app.login_email = "admin@example.com".to_string();
        app.login_password = "admin123".to_string();
        app.attempt_login().await;

        assert_eq!(app.state, AppState::Normal);
        assert!(app.is_authenticated());
        assert!(app.login_password.is_empty());
        assert_eq!(app.auth.user().map(|u| u.name.as_str()), Some("Admin User"));

        wait_for_users(&mut app).await;
        assert_eq!(app.listing.users().len(), 7);

        app.logout();
        assert!(!app.is_authenticated());
        assert_eq!(app.state, AppState::LoggingIn);
        assert!(app.listing.users().is_empty());
        // Email is kept for the next attempt
        assert_eq!(app.login_focus, LoginFocus::Password);
    }

    // -------------------------------------------------------------------------
    // Users Tab Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_users_pagination_and_selection() {
        let mut app = loaded_app().await;
        assert_eq!(app.listing.total_pages(), 2);
        assert_eq!(app.selected_user().map(|u| u.id), Some(1));

        for _ in 0..10 {
            app.move_user_selection(true);
        }
        assert_eq!(app.user_selection, 4);

        app.next_page();
        assert_eq!(app.user_selection, 0);
        assert_eq!(app.selected_user().map(|u| u.id), Some(6));
        app.move_user_selection(true);
        app.move_user_selection(true);
        assert_eq!(app.user_selection, 1);
    }

    #[tokio::test]
    async fn test_search_and_filter_cycle() {
        let mut app = loaded_app().await;

        app.search_query = "south".to_string();
        app.apply_search();
        assert_eq!(app.listing.filtered_count(), 0);

        app.search_query = "lean".to_string();
        app.apply_search();
        assert_eq!(app.listing.filtered_count(), 1);

        app.clear_filters();
        assert!(!app.listing.has_active_filters());

        app.cycle_city_filter();
        assert_eq!(app.listing.filters().city, "Gwenborough");
        for _ in 0..6 {
            app.cycle_city_filter();
        }
        assert_eq!(app.listing.filters().city, "Wisokyburgh");
        app.cycle_city_filter();
        assert_eq!(app.listing.filters().city, "");

        app.cycle_company_filter();
        assert_eq!(app.listing.filters().company, "Considine-Lockman");
    }

    #[test]
    fn test_next_filter_value() {
        let options = vec!["A".to_string(), "B".to_string()];
        assert_eq!(next_filter_value(&options, ""), "A");
        assert_eq!(next_filter_value(&options, "A"), "B");
        assert_eq!(next_filter_value(&options, "B"), "");
        assert_eq!(next_filter_value(&options, "gone"), "");
        assert_eq!(next_filter_value(&[], ""), "");
    }

    #[tokio::test]
    async fn test_edit_user() {
        let mut app = loaded_app().await;
        app.begin_edit();
        assert_eq!(app.state, AppState::EditingUser);

        let form = app.edit_form.as_mut().unwrap();
        form.focus = EditField::Email;
        form.focused_value_mut().clear();
        app.save_edit();
        assert_eq!(
            app.edit_form.as_ref().and_then(|f| f.error.as_deref()),
            Some("Email must contain '@'")
        );
        assert_eq!(app.state, AppState::EditingUser);

        let form = app.edit_form.as_mut().unwrap();
        form.focused_value_mut().push_str("leanne@april.biz");
        form.focus = EditField::Name;
        *form.focused_value_mut() = "Leanne G.".to_string();
        app.save_edit();

        assert_eq!(app.state, AppState::Normal);
        assert!(app.edit_form.is_none());
        let updated = app.listing.find(1).unwrap();
        assert_eq!(updated.name, "Leanne G.");
        assert_eq!(updated.email, "leanne@april.biz");

        let notifications = app.store.notifications();
        assert_eq!(
            notifications.last().map(|n| n.message.as_str()),
            Some("User Leanne G. updated successfully!")
        );
    }

    #[tokio::test]
    async fn test_cancel_edit_leaves_listing_alone() {
        let mut app = loaded_app().await;
        app.begin_edit();
        app.edit_form.as_mut().unwrap().focused_value_mut().push_str("!!!");
        app.cancel_edit();
        assert_eq!(app.listing.find(1).unwrap().name, "Leanne Graham");
    }

    // -------------------------------------------------------------------------
    // Settings Tab Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_settings_draft_save_and_cancel() {
        let (mut app, persistent) = test_app();
        assert!(!app.settings_has_changes());

        app.settings_field = SettingsField::Language;
        app.adjust_setting(true);
        assert_eq!(app.settings_draft.language, "es");
        assert!(app.settings_has_changes());

        app.cancel_settings();
        assert!(!app.settings_has_changes());
        assert_eq!(app.settings_draft.language, "en");

        app.settings_field = SettingsField::SmsNotifications;
        app.adjust_setting(true);
        app.save_settings();
        assert!(!app.settings_has_changes());
        assert!(app.settings.preferences().notifications.sms);
        assert!(persistent.get(PREFERENCES_KEY).unwrap().is_some());
        assert_eq!(
            app.store.notifications().last().map(|n| n.message.as_str()),
            Some("Settings saved successfully!")
        );
    }

    #[tokio::test]
    async fn test_reset_settings() {
        let (mut app, _) = test_app();
        app.settings_field = SettingsField::EmailDigest;
        app.adjust_setting(true);
        app.save_settings();
        app.reset_settings();
        assert_eq!(app.settings.preferences(), UserPreferences::default());
        assert_eq!(app.settings_draft, UserPreferences::default());
        assert_eq!(
            app.store.notifications().last().map(|n| n.kind),
            Some(NotificationKind::Info)
        );
    }

    #[tokio::test]
    async fn test_tick_follows_saved_preferences() {
        let (mut app, _) = test_app();
        app.settings
            .update(|p| p.timezone = "Europe/Paris".to_string())
            .unwrap();
        app.tick();
        assert_eq!(app.settings_draft.timezone, "Europe/Paris");
        assert!(!app.settings_has_changes());
    }

    #[tokio::test]
    async fn test_tick_keeps_unsaved_edits() {
        let (mut app, _) = test_app();
        app.settings_field = SettingsField::Language;
        app.adjust_setting(true);

        app.settings.update(|p| p.email_digest = "never".to_string()).unwrap();
        app.tick();
        assert_eq!(app.settings_draft.language, "es");
        assert_eq!(app.settings_draft.email_digest, "daily");
        assert!(app.settings_has_changes());
    }

    #[tokio::test]
    async fn test_toggle_dark_mode() {
        let (mut app, _) = test_app();
        app.toggle_dark_mode();
        assert!(app.dark_mode());
        assert!(app.settings_draft.dark_mode);
        app.tick();
        assert!(!app.settings_has_changes());
    }

    #[tokio::test]
    async fn test_tick_persists_notifications() {
        let (mut app, persistent) = test_app();
        app.store.add_notification("Saved", NotificationKind::Success);
        app.tick();
        let stored = persistent
            .get(admindash_core::state::APP_STORAGE_KEY)
            .unwrap()
            .unwrap();
        assert!(stored.contains("Saved"));
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(99, '@'));
        assert!(!can_add_email_char(100, 'a'));
        assert!(!can_add_email_char(0, ' '));
        assert!(!can_add_email_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(can_add_password_char(0, ' '));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_search_and_field_chars() {
        assert!(can_add_search_char(63, 'x'));
        assert!(!can_add_search_char(64, 'x'));
        assert!(can_add_field_char(0, ' '));
        assert!(!can_add_field_char(100, 'x'));
        assert!(!can_add_field_char(0, '\t'));
    }
}

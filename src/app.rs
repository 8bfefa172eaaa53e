//! Application state management for Crypto Monitor
//!
//! This module contains the display controller: it owns every on-screen
//! region, reacts to key presses, and resolves finished fetches into either a
//! live render, a cached (offline) render, or a notification.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{info, warn};

use crate::cache::CacheStore;
use crate::data::{TickerSnapshot, ASSET_LABEL};
use crate::format::{format_price, format_timestamp, status_message};
use crate::refresh::{FetchOutcome, RefreshMessage};

/// How long error notifications stay on screen
const LONG_NOTIFICATION: Duration = Duration::from_millis(3500);

/// How long informational notifications stay on screen
const SHORT_NOTIFICATION: Duration = Duration::from_millis(2000);

/// Controller state; the loading indicator is shown while `Loading`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Idle,
    Loading,
}

/// Where the currently displayed values came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Cached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A transient message shown below the ticker
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub posted_at: Instant,
}

impl Notification {
    /// Display time, longer for errors
    pub fn duration(&self) -> Duration {
        match self.level {
            NotificationLevel::Error => LONG_NOTIFICATION,
            NotificationLevel::Info => SHORT_NOTIFICATION,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.posted_at) >= self.duration()
    }
}

/// Main application struct managing state and display regions
pub struct App {
    /// Idle or Loading
    pub state: AppState,
    /// Asset label region (`Bitcoin (BTC)` or its offline variant)
    pub asset_label: Option<String>,
    /// Formatted price region
    pub price: Option<String>,
    /// Formatted timestamp region
    pub timestamp: Option<String>,
    /// Origin of the last render, if any
    pub source: Option<DataSource>,
    /// Pending notifications, oldest first
    pub notifications: Vec<Notification>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating a refresh has been requested
    pub refresh_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Frame counter driving the loading spinner
    pub tick: usize,
    /// Persisted last known ticker
    cache: Option<CacheStore>,
}

impl App {
    /// Creates a new App with blank regions
    ///
    /// # Arguments
    /// * `cache` - Store for the last known ticker; `None` disables caching
    pub fn new(cache: Option<CacheStore>) -> Self {
        Self {
            state: AppState::Idle,
            asset_label: None,
            price: None,
            timestamp: None,
            source: None,
            notifications: Vec::new(),
            should_quit: false,
            refresh_requested: false,
            show_help: false,
            tick: 0,
            cache,
        }
    }

    /// Marks a fetch as started and shows the loading indicator
    pub fn begin_refresh(&mut self, request_id: u64) {
        info!("Refresh #{} requested", request_id);
        self.refresh_requested = false;
        self.state = AppState::Loading;
    }

    /// Applies a message from the background refresh
    pub fn handle_message(&mut self, message: RefreshMessage) {
        match message {
            RefreshMessage::Completed {
                request_id,
                outcome,
            } => {
                info!("Refresh #{} resolved", request_id);
                self.resolve(outcome);
            }
        }
    }

    /// Resolves one fetch outcome into display updates
    pub fn resolve(&mut self, outcome: FetchOutcome) {
        self.state = AppState::Idle;

        match outcome {
            FetchOutcome::Success(snapshot) => {
                self.show_live(&snapshot);
            }
            FetchOutcome::HttpStatus(code) => {
                warn!("Ticker request returned HTTP {}", code);
                self.notify(status_message(code), NotificationLevel::Error);
                self.fall_back_to_cache();
            }
            FetchOutcome::Failed(cause) => {
                warn!("Ticker request failed: {}", cause);
                self.notify(format!("Request failed: {}", cause), NotificationLevel::Error);
                self.fall_back_to_cache();
            }
        }
    }

    /// Renders a live snapshot and writes it through to the cache
    ///
    /// Fields that cannot be formatted leave their region unchanged, unless
    /// that region holds cached data while the other received a live value;
    /// then it is cleared so live and cached values never share a render.
    fn show_live(&mut self, snapshot: &TickerSnapshot) {
        let price = format_price(&snapshot.last);
        if price.is_none() {
            warn!("Ignoring unparseable price {:?}", snapshot.last);
        }
        let timestamp = format_timestamp(snapshot.date);

        let showing_cache = self.source == Some(DataSource::Cached);
        if price.is_none() && timestamp.is_none() && showing_cache {
            // Nothing live to show; the offline render stays as it is
            info!("Live ticker had no usable fields, keeping cached render");
        } else {
            if price.is_some() || showing_cache {
                self.price = price;
            }
            if timestamp.is_some() || showing_cache {
                self.timestamp = timestamp;
            }
            self.asset_label = Some(ASSET_LABEL.to_string());
            self.source = Some(DataSource::Live);
        }

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save(snapshot) {
                warn!("Failed to write ticker cache: {}", e);
            }
        }
    }

    /// Shows the cached ticker marked as offline, if one exists
    ///
    /// # Returns
    /// `true` if cached data was rendered
    fn fall_back_to_cache(&mut self) -> bool {
        let Some(record) = self.cache.as_ref().and_then(CacheStore::load) else {
            info!("No cached ticker to fall back to");
            return false;
        };
        let Some(price) = format_price(&record.last) else {
            warn!("Cached price {:?} is not a number", record.last);
            return false;
        };

        info!("Showing cached ticker from {}", record.date);
        self.asset_label = Some(format!("{} - Offline", ASSET_LABEL));
        self.price = Some(price);
        // A live timestamp must not sit next to the offline label
        self.timestamp = format_timestamp(record.date).map(|ts| format!("{} (cache)", ts));
        self.source = Some(DataSource::Cached);
        self.notify("Data loaded from cache", NotificationLevel::Info);
        true
    }

    /// Queues a notification
    pub fn notify(&mut self, message: impl Into<String>, level: NotificationLevel) {
        self.notifications.push(Notification {
            message: message.into(),
            level,
            posted_at: Instant::now(),
        });
    }

    /// Advances the spinner and drops expired notifications
    pub fn on_tick(&mut self, now: Instant) {
        self.tick = self.tick.wrapping_add(1);
        self.notifications.retain(|n| !n.is_expired(now));
    }

    /// Whether a price (live or cached) is on screen
    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `r`: Refresh the ticker
    /// - `?`: Toggle help overlay
    /// - `q` or `Esc`: Quit (Esc closes the help overlay first)
    /// - `Ctrl-C`: Quit
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') => {
                    self.show_help = false;
                }
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::F(5) => {
                self.refresh_requested = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_cache() -> (App, CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheStore::with_dir(temp_dir.path().to_path_buf());
        (App::new(Some(cache.clone())), cache, temp_dir)
    }

    fn messages(app: &App) -> Vec<&str> {
        app.notifications.iter().map(|n| n.message.as_str()).collect()
    }

    // ========================================================================
    // Refresh lifecycle
    // ========================================================================

    #[test]
    fn test_new_app_is_idle_and_blank() {
        let app = App::new(None);
        assert_eq!(app.state, AppState::Idle);
        assert!(app.asset_label.is_none());
        assert!(app.price.is_none());
        assert!(app.timestamp.is_none());
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn test_begin_refresh_enters_loading() {
        let mut app = App::new(None);
        app.refresh_requested = true;

        app.begin_refresh(1);

        assert_eq!(app.state, AppState::Loading);
        assert!(!app.refresh_requested);
    }

    #[test]
    fn test_every_outcome_returns_to_idle() {
        for outcome in [
            FetchOutcome::Success(TickerSnapshot::new("1.00", 1700000000)),
            FetchOutcome::HttpStatus(500),
            FetchOutcome::Failed("timeout".to_string()),
        ] {
            let mut app = App::new(None);
            app.begin_refresh(1);
            app.resolve(outcome);
            assert_eq!(app.state, AppState::Idle);
        }
    }

    #[test]
    fn test_handle_message_resolves_outcome() {
        let mut app = App::new(None);
        app.begin_refresh(7);

        app.handle_message(RefreshMessage::Completed {
            request_id: 7,
            outcome: FetchOutcome::HttpStatus(404),
        });

        assert_eq!(app.state, AppState::Idle);
        assert_eq!(messages(&app), vec!["Not Found"]);
    }

    // ========================================================================
    // Live renders
    // ========================================================================

    #[test]
    fn test_success_renders_and_writes_through() {
        let (mut app, cache, _temp_dir) = app_with_cache();

        app.resolve(FetchOutcome::Success(TickerSnapshot::new(
            "65000.50", 1700000000,
        )));

        assert_eq!(app.asset_label.as_deref(), Some("Bitcoin (BTC)"));
        assert_eq!(app.price.as_deref(), Some("R$ 65.000,50"));
        assert_eq!(app.timestamp, format_timestamp(1700000000));
        assert_eq!(app.source, Some(DataSource::Live));
        assert!(app.notifications.is_empty());

        let record = cache.load().expect("Success should be cached");
        assert_eq!(record.last, "65000.50");
        assert_eq!(record.date, 1700000000);
    }

    #[test]
    fn test_unparseable_price_leaves_region_unchanged() {
        let mut app = App::new(None);
        app.resolve(FetchOutcome::Success(TickerSnapshot::new("100", 1700000000)));

        app.resolve(FetchOutcome::Success(TickerSnapshot::new("n/a", 1700000100)));

        assert_eq!(app.price.as_deref(), Some("R$ 100,00"));
        assert_eq!(app.timestamp, format_timestamp(1700000100));
    }

    #[test]
    fn test_missing_date_leaves_timestamp_unchanged() {
        let mut app = App::new(None);
        app.resolve(FetchOutcome::Success(TickerSnapshot::new("100", 1700000000)));

        app.resolve(FetchOutcome::Success(TickerSnapshot::new("200", 0)));

        assert_eq!(app.price.as_deref(), Some("R$ 200,00"));
        assert_eq!(app.timestamp, format_timestamp(1700000000));
    }

    // ========================================================================
    // Failures and cache fallback
    // ========================================================================

    #[test]
    fn test_status_failure_messages() {
        let cases = [
            (400, "Bad Request"),
            (401, "Unauthorized"),
            (403, "Forbidden"),
            (404, "Not Found"),
            (502, "Unknown error: 502"),
        ];
        for (code, expected) in cases {
            let mut app = App::new(None);
            app.resolve(FetchOutcome::HttpStatus(code));
            assert_eq!(messages(&app), vec![expected]);
            assert_eq!(app.notifications[0].level, NotificationLevel::Error);
        }
    }

    #[test]
    fn test_transport_failure_message_carries_cause() {
        let mut app = App::new(None);
        app.resolve(FetchOutcome::Failed("connection refused".to_string()));
        assert_eq!(messages(&app), vec!["Request failed: connection refused"]);
    }

    #[test]
    fn test_failure_falls_back_to_cache_with_marker() {
        let (mut app, cache, _temp_dir) = app_with_cache();
        cache
            .save(&TickerSnapshot::new("65000.50", 1700000000))
            .unwrap();

        app.resolve(FetchOutcome::HttpStatus(500));

        assert_eq!(app.asset_label.as_deref(), Some("Bitcoin (BTC) - Offline"));
        assert_eq!(app.price.as_deref(), Some("R$ 65.000,50"));
        let expected_ts = format!("{} (cache)", format_timestamp(1700000000).unwrap());
        assert_eq!(app.timestamp.as_deref(), Some(expected_ts.as_str()));
        assert_eq!(app.source, Some(DataSource::Cached));
        assert_eq!(
            messages(&app),
            vec!["Unknown error: 500", "Data loaded from cache"]
        );
    }

    #[test]
    fn test_transport_failure_also_falls_back() {
        let (mut app, cache, _temp_dir) = app_with_cache();
        cache.save(&TickerSnapshot::new("10", 1700000000)).unwrap();

        app.resolve(FetchOutcome::Failed("dns error".to_string()));

        assert_eq!(app.source, Some(DataSource::Cached));
        assert_eq!(app.price.as_deref(), Some("R$ 10,00"));
    }

    #[test]
    fn test_cached_render_matches_live_formatting() {
        let (mut live, _cache, _temp_dir) = app_with_cache();
        live.resolve(FetchOutcome::Success(TickerSnapshot::new(
            "123456.789",
            1700000000,
        )));

        // Same cache directory, fresh controller
        let mut offline = App::new(live.cache.clone());
        offline.resolve(FetchOutcome::HttpStatus(503));

        assert_eq!(offline.price, live.price);
        assert_eq!(
            offline.timestamp,
            live.timestamp.as_ref().map(|ts| format!("{} (cache)", ts))
        );
    }

    #[test]
    fn test_failure_without_cache_leaves_regions_blank() {
        let (mut app, _cache, _temp_dir) = app_with_cache();

        app.resolve(FetchOutcome::HttpStatus(404));

        assert!(app.asset_label.is_none());
        assert!(app.price.is_none());
        assert!(app.timestamp.is_none());
        assert!(app.source.is_none());
        assert_eq!(messages(&app), vec!["Not Found"]);
    }

    #[test]
    fn test_failure_without_cache_keeps_prior_live_values() {
        let mut app = App::new(None);
        app.resolve(FetchOutcome::Success(TickerSnapshot::new("1", 1700000000)));

        app.resolve(FetchOutcome::Failed("offline".to_string()));

        assert_eq!(app.asset_label.as_deref(), Some("Bitcoin (BTC)"));
        assert_eq!(app.price.as_deref(), Some("R$ 1,00"));
        assert_eq!(app.source, Some(DataSource::Live));
    }

    #[test]
    fn test_cached_non_numeric_price_is_not_rendered() {
        let (mut app, cache, _temp_dir) = app_with_cache();
        cache.save(&TickerSnapshot::new("garbage", 1700000000)).unwrap();

        app.resolve(FetchOutcome::HttpStatus(500));

        assert!(app.price.is_none());
        assert_eq!(messages(&app), vec!["Unknown error: 500"]);
    }

    #[test]
    fn test_live_after_offline_clears_marker() {
        let (mut app, cache, _temp_dir) = app_with_cache();
        cache.save(&TickerSnapshot::new("1", 1700000000)).unwrap();
        app.resolve(FetchOutcome::HttpStatus(500));
        assert_eq!(app.source, Some(DataSource::Cached));

        app.resolve(FetchOutcome::Success(TickerSnapshot::new("2", 1700000100)));

        assert_eq!(app.asset_label.as_deref(), Some("Bitcoin (BTC)"));
        assert_eq!(app.timestamp, format_timestamp(1700000100));
        assert_eq!(app.source, Some(DataSource::Live));
    }

    #[test]
    fn test_unusable_live_fields_keep_offline_render() {
        let (mut app, cache, _temp_dir) = app_with_cache();
        cache
            .save(&TickerSnapshot::new("65000.50", 1700000000))
            .unwrap();
        app.resolve(FetchOutcome::HttpStatus(500));

        // Write-through overwrites the cache; the screen must stay offline
        app.resolve(FetchOutcome::Success(TickerSnapshot::new("n/a", 0)));

        let expected_ts = format!("{} (cache)", format_timestamp(1700000000).unwrap());
        assert_eq!(app.asset_label.as_deref(), Some("Bitcoin (BTC) - Offline"));
        assert_eq!(app.price.as_deref(), Some("R$ 65.000,50"));
        assert_eq!(app.timestamp.as_deref(), Some(expected_ts.as_str()));
        assert_eq!(app.source, Some(DataSource::Cached));
    }

    #[test]
    fn test_live_price_after_offline_drops_cached_timestamp() {
        let (mut app, cache, _temp_dir) = app_with_cache();
        cache.save(&TickerSnapshot::new("1", 1700000000)).unwrap();
        app.resolve(FetchOutcome::HttpStatus(500));

        app.resolve(FetchOutcome::Success(TickerSnapshot::new("2", 0)));

        assert_eq!(app.asset_label.as_deref(), Some("Bitcoin (BTC)"));
        assert_eq!(app.price.as_deref(), Some("R$ 2,00"));
        assert!(app.timestamp.is_none());
        assert_eq!(app.source, Some(DataSource::Live));
    }

    #[test]
    fn test_live_timestamp_after_offline_drops_cached_price() {
        let (mut app, cache, _temp_dir) = app_with_cache();
        cache.save(&TickerSnapshot::new("1", 1700000000)).unwrap();
        app.resolve(FetchOutcome::HttpStatus(500));

        app.resolve(FetchOutcome::Success(TickerSnapshot::new("n/a", 1700000100)));

        assert_eq!(app.asset_label.as_deref(), Some("Bitcoin (BTC)"));
        assert!(app.price.is_none());
        assert_eq!(app.timestamp, format_timestamp(1700000100));
        assert_eq!(app.source, Some(DataSource::Live));
    }

    #[test]
    fn test_cached_out_of_range_date_drops_live_timestamp() {
        let (mut app, cache, _temp_dir) = app_with_cache();
        app.resolve(FetchOutcome::Success(TickerSnapshot::new("1", 1700000000)));
        cache.save(&TickerSnapshot::new("3", i64::MAX)).unwrap();

        app.resolve(FetchOutcome::HttpStatus(500));

        assert_eq!(app.asset_label.as_deref(), Some("Bitcoin (BTC) - Offline"));
        assert_eq!(app.price.as_deref(), Some("R$ 3,00"));
        assert!(app.timestamp.is_none());
        assert_eq!(app.source, Some(DataSource::Cached));
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    #[test]
    fn test_notifications_expire_by_level() {
        let mut app = App::new(None);
        app.notify("info", NotificationLevel::Info);
        app.notify("error", NotificationLevel::Error);
        let posted = app.notifications[0].posted_at;

        app.on_tick(posted + Duration::from_millis(2500));
        assert_eq!(messages(&app), vec!["error"]);

        app.on_tick(posted + Duration::from_secs(5));
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn test_on_tick_advances_spinner() {
        let mut app = App::new(None);
        app.on_tick(Instant::now());
        app.on_tick(Instant::now());
        assert_eq!(app.tick, 2);
    }

    // ========================================================================
    // Key handling
    // ========================================================================

    #[test]
    fn test_r_requests_refresh() {
        let mut app = App::new(None);
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_refresh_allowed_while_loading() {
        let mut app = App::new(None);
        app.begin_refresh(1);
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_q_and_esc_quit() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = App::new(None);
            app.handle_key(key_event(code));
            assert!(app.should_quit);
        }
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = App::new(None);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_overlay_toggle_and_intercept() {
        let mut app = App::new(None);
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        // Refresh is swallowed while help is open
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(!app.refresh_requested);

        // Esc closes help instead of quitting
        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }
}

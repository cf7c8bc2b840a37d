//! Application state management for the Met collection browser
//!
//! This module contains the main application state, handling keyboard input,
//! data loading through the cache-aware services, and state transitions
//! between the different views.

use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::info;

use crate::cache::{CacheError, CacheSnapshot, DataStore};
use crate::cli::StartupConfig;
use crate::data::{all_nationalities, canonical_nationality, Artwork, Department, MetClient};
use crate::services::{ArtworkService, SearchService};

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Loading state while fetching data
    Loading,
    /// List view showing all museum departments
    DepartmentList,
    /// List view showing artworks from a department or search
    ArtworkList,
    /// Detail view for a specific artwork
    ArtworkDetail(u32),
}

/// Which search the text input is collecting a query for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// Free-text artist name search
    Artist,
    /// Nationality search, validated against the supported list
    Nationality,
}

/// In-progress text input for a search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInput {
    /// Which search will run on submit
    pub kind: SearchKind,
    /// Characters typed so far
    pub buffer: String,
}

/// A data load scheduled by a key press, executed by the main loop
///
/// Keyboard handling stays synchronous; anything that needs the network is
/// described here and awaited between renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Load (or reload) the department list
    LoadDepartments,
    /// Open a department's artworks
    OpenDepartment { id: u32, name: String },
    /// Run an artist name search
    SearchArtist(String),
    /// Run a nationality search
    SearchNationality(String),
    /// Open the detail view for an artwork
    OpenArtwork(u32),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Index of currently selected department in the department list
    pub selected_department: usize,
    /// Index of currently selected artwork in the artwork list
    pub selected_artwork: usize,
    /// Loaded museum departments
    pub departments: Vec<Department>,
    /// Artworks shown in the current list view
    pub artworks: Vec<Artwork>,
    /// Heading for the artwork list (department name or search description)
    pub results_title: String,
    /// Artwork shown in the detail view
    pub current_artwork: Option<Artwork>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show the help overlay
    pub show_help: bool,
    /// Flag to show the cache diagnostics overlay
    pub show_stats: bool,
    /// Snapshot rendered by the diagnostics overlay
    pub stats: Option<CacheSnapshot>,
    /// One-line status/error message shown in the footer
    pub status_message: Option<String>,
    /// Active search text input, if any
    pub input: Option<SearchInput>,
    /// Scroll offset for the artwork detail view
    pub detail_scroll_offset: u16,
    /// Timestamp of the last successful data load
    pub last_refresh: Option<DateTime<Local>>,
    /// Next data load to execute, if any
    pending: Option<PendingAction>,
    /// Artist search to run once the initial department load finishes
    initial_artist: Option<String>,
    /// The one shared cache, injected into both services
    store: Arc<DataStore>,
    /// Cache-aware search service
    search_service: SearchService,
    /// Cache-aware artwork detail service
    artwork_service: ArtworkService,
}

impl App {
    /// Creates a new App instance from the startup configuration
    ///
    /// Constructs the single shared `DataStore` and injects it into both
    /// services, so search results and detail lookups reuse each other's
    /// cached artworks.
    ///
    /// # Returns
    /// * `Err(CacheError)` if the configured cache capacity is invalid
    pub fn new(config: StartupConfig) -> Result<Self, CacheError> {
        let store = Arc::new(DataStore::with_capacity(config.cache_capacity)?);
        let client = MetClient::new();
        Ok(Self::with_parts(client, store, config.initial_artist))
    }

    /// Creates an App around explicit parts (used by tests to inject an
    /// offline client)
    pub fn with_parts(
        client: MetClient,
        store: Arc<DataStore>,
        initial_artist: Option<String>,
    ) -> Self {
        let search_service = SearchService::new(client.clone(), Arc::clone(&store));
        let artwork_service = ArtworkService::new(client, Arc::clone(&store));
        Self {
            state: AppState::Loading,
            selected_department: 0,
            selected_artwork: 0,
            departments: Vec::new(),
            artworks: Vec::new(),
            results_title: String::new(),
            current_artwork: None,
            should_quit: false,
            show_help: false,
            show_stats: false,
            stats: None,
            status_message: None,
            input: None,
            detail_scroll_offset: 0,
            last_refresh: None,
            pending: Some(PendingAction::LoadDepartments),
            initial_artist,
            store,
            search_service,
            artwork_service,
        }
    }

    /// Returns the currently selected department, if any
    pub fn selected_department(&self) -> Option<&Department> {
        self.departments.get(self.selected_department)
    }

    /// Returns the currently selected artwork in the list view, if any
    pub fn selected_artwork(&self) -> Option<&Artwork> {
        self.artworks.get(self.selected_artwork)
    }

    /// Takes the next scheduled data load, if one is pending
    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    /// Whether a data load is waiting to be executed
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Executes one scheduled data load and applies its outcome
    ///
    /// Errors land in the footer status line; the remote client's message is
    /// shown unchanged.
    pub async fn run_pending(&mut self) {
        let Some(action) = self.take_pending() else {
            return;
        };

        match action {
            PendingAction::LoadDepartments => {
                match self.search_service.departments().await {
                    Ok(departments) => {
                        info!(count = departments.len(), "department list loaded");
                        self.departments = departments;
                        self.selected_department = 0;
                        self.last_refresh = Some(Local::now());
                    }
                    Err(err) => {
                        self.status_message = Some(err.to_string());
                    }
                }
                self.state = AppState::DepartmentList;

                // A --artist flag runs its search once startup data is in
                if let Some(name) = self.initial_artist.take() {
                    self.state = AppState::Loading;
                    self.pending = Some(PendingAction::SearchArtist(name));
                }
            }
            PendingAction::OpenDepartment { id, name } => {
                match self.search_service.search_by_department(id).await {
                    Ok(artworks) => {
                        self.show_results(artworks, name);
                    }
                    Err(err) => {
                        self.status_message = Some(err.to_string());
                        self.state = AppState::DepartmentList;
                    }
                }
            }
            PendingAction::SearchArtist(query) => {
                match self.search_service.search_by_artist(&query).await {
                    Ok(artworks) => {
                        self.show_results(artworks, format!("Artist: {query}"));
                    }
                    Err(err) => {
                        self.status_message = Some(err.to_string());
                        self.state = AppState::DepartmentList;
                    }
                }
            }
            PendingAction::SearchNationality(nationality) => {
                match self.search_service.search_by_nationality(&nationality).await {
                    Ok(artworks) => {
                        self.show_results(artworks, format!("Nationality: {nationality}"));
                    }
                    Err(err) => {
                        self.status_message = Some(err.to_string());
                        self.state = AppState::DepartmentList;
                    }
                }
            }
            PendingAction::OpenArtwork(object_id) => {
                match self.artwork_service.artwork_details(object_id).await {
                    Ok(artwork) => {
                        self.current_artwork = Some(artwork);
                        self.detail_scroll_offset = 0;
                        self.state = AppState::ArtworkDetail(object_id);
                    }
                    Err(err) => {
                        self.status_message = Some(err.to_string());
                        self.state = AppState::ArtworkList;
                    }
                }
            }
        }
    }

    /// Applies a successful search result and switches to the list view
    fn show_results(&mut self, artworks: Vec<Artwork>, title: impl Into<String>) {
        if artworks.is_empty() {
            self.status_message = Some("No artworks found".to_string());
        }
        self.artworks = artworks;
        self.results_title = title.into();
        self.selected_artwork = 0;
        self.last_refresh = Some(Local::now());
        self.state = AppState::ArtworkList;
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit the application (from any view)
    /// - `Up`/`k`, `Down`/`j`: Move selection / scroll
    /// - `Enter`: Open the selected department or artwork
    /// - `a`: Search by artist name, `n`: Search by nationality
    /// - `s`: Toggle cache diagnostics, `c` (in diagnostics): clear cache
    /// - `r` (in department list): Reload the department list
    /// - `Esc`: Go back / close overlay / cancel input
    /// - `?`: Toggle the help overlay
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Any key press dismisses a stale status line
        self.status_message = None;

        // Text input intercepts all keys while active
        if self.input.is_some() {
            self.handle_input_key(key_event.code);
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        // Cache diagnostics overlay: allows clearing and pruning in place
        if self.show_stats {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => {
                    self.show_stats = false;
                    self.stats = None;
                }
                KeyCode::Char('c') => {
                    self.clear_cache();
                }
                KeyCode::Char('p') => {
                    let report = self.store.cleanup();
                    self.stats = Some(self.store.snapshot());
                    self.status_message =
                        Some(format!("Cleanup removed {} entries", report.total_removed()));
                }
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::DepartmentList => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection_up();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection_down();
                }
                KeyCode::Enter => {
                    if let Some(department) = self.selected_department() {
                        self.pending = Some(PendingAction::OpenDepartment {
                            id: department.id,
                            name: department.name.clone(),
                        });
                        self.state = AppState::Loading;
                    }
                }
                KeyCode::Char('a') => {
                    self.open_input(SearchKind::Artist);
                }
                KeyCode::Char('n') => {
                    self.open_input(SearchKind::Nationality);
                }
                KeyCode::Char('s') => {
                    self.open_stats();
                }
                KeyCode::Char('r') => {
                    self.store.invalidate_departments();
                    self.pending = Some(PendingAction::LoadDepartments);
                    self.state = AppState::Loading;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::ArtworkList => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    self.state = AppState::DepartmentList;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection_up();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection_down();
                }
                KeyCode::Enter => {
                    if let Some(artwork) = self.selected_artwork() {
                        self.pending = Some(PendingAction::OpenArtwork(artwork.id));
                        self.state = AppState::Loading;
                    }
                }
                KeyCode::Char('a') => {
                    self.open_input(SearchKind::Artist);
                }
                KeyCode::Char('n') => {
                    self.open_input(SearchKind::Nationality);
                }
                KeyCode::Char('s') => {
                    self.open_stats();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::ArtworkDetail(object_id) => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    self.detail_scroll_offset = 0;
                    self.current_artwork = None;
                    self.state = AppState::ArtworkList;
                }
                KeyCode::Char('r') => {
                    // Force a refetch by dropping the cached record first
                    self.store.invalidate_artwork(object_id);
                    self.pending = Some(PendingAction::OpenArtwork(object_id));
                    self.state = AppState::Loading;
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.detail_scroll_offset = self.detail_scroll_offset.saturating_add(1);
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
                }
                KeyCode::Char('g') => {
                    self.detail_scroll_offset = 0;
                }
                KeyCode::Char('s') => {
                    self.open_stats();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    /// Handles keys while the search input is active
    fn handle_input_key(&mut self, code: KeyCode) {
        let Some(input) = &mut self.input else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.input = None;
            }
            KeyCode::Enter => {
                let query = input.buffer.trim().to_string();
                let kind = input.kind;
                self.input = None;
                if query.is_empty() {
                    self.status_message = Some("Search query must not be empty".to_string());
                    return;
                }
                match kind {
                    SearchKind::Artist => {
                        self.pending = Some(PendingAction::SearchArtist(query));
                        self.state = AppState::Loading;
                    }
                    // Nationalities are validated up front so a typo never
                    // costs a network round trip
                    SearchKind::Nationality => match canonical_nationality(&query) {
                        Some(canonical) => {
                            self.pending =
                                Some(PendingAction::SearchNationality(canonical.to_string()));
                            self.state = AppState::Loading;
                        }
                        None => {
                            self.status_message = Some(format!(
                                "Unsupported nationality '{query}' — supported: {}",
                                all_nationalities().join(", ")
                            ));
                        }
                    },
                }
            }
            KeyCode::Backspace => {
                input.buffer.pop();
            }
            KeyCode::Char(c) => {
                input.buffer.push(c);
            }
            _ => {}
        }
    }

    /// Opens the search text input for the given kind
    fn open_input(&mut self, kind: SearchKind) {
        self.input = Some(SearchInput {
            kind,
            buffer: String::new(),
        });
    }

    /// Opens the diagnostics overlay with a fresh snapshot
    fn open_stats(&mut self) {
        self.stats = Some(self.store.snapshot());
        self.show_stats = true;
    }

    /// Clears the whole cache and refreshes the diagnostics snapshot
    fn clear_cache(&mut self) {
        self.store.clear(None);
        self.stats = Some(self.store.snapshot());
        self.status_message = Some("Cache cleared".to_string());
        info!("cache cleared manually");
    }

    /// Moves the active list selection up, wrapping at the top
    fn move_selection_up(&mut self) {
        match self.state {
            AppState::DepartmentList => {
                let len = self.departments.len();
                if len > 0 {
                    self.selected_department = if self.selected_department == 0 {
                        len - 1
                    } else {
                        self.selected_department - 1
                    };
                }
            }
            AppState::ArtworkList => {
                let len = self.artworks.len();
                if len > 0 {
                    self.selected_artwork = if self.selected_artwork == 0 {
                        len - 1
                    } else {
                        self.selected_artwork - 1
                    };
                }
            }
            _ => {}
        }
    }

    /// Moves the active list selection down, wrapping at the bottom
    fn move_selection_down(&mut self) {
        match self.state {
            AppState::DepartmentList => {
                let len = self.departments.len();
                if len > 0 {
                    self.selected_department = (self.selected_department + 1) % len;
                }
            }
            AppState::ArtworkList => {
                let len = self.artworks.len();
                if len > 0 {
                    self.selected_artwork = (self.selected_artwork + 1) % len;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Artist;
    use chrono::Utc;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    /// App with an offline client; network calls would fail fast
    fn test_app() -> App {
        App::with_parts(
            MetClient::with_base_url("http://127.0.0.1:9"),
            Arc::new(DataStore::new()),
            None,
        )
    }

    fn test_app_with_departments() -> App {
        let mut app = test_app();
        app.take_pending();
        app.departments = vec![
            Department {
                id: 11,
                name: "European Paintings".to_string(),
            },
            Department {
                id: 6,
                name: "Asian Art".to_string(),
            },
        ];
        app.state = AppState::DepartmentList;
        app
    }

    fn test_artwork(id: u32) -> Artwork {
        Artwork {
            id,
            title: format!("Artwork {id}"),
            artist: Artist {
                name: "Test Artist".to_string(),
                nationality: None,
                birth_year: None,
                death_year: None,
            },
            classification: None,
            date: None,
            department: None,
            image_url: None,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_initial_state_is_loading_with_pending_departments() {
        let mut app = test_app();
        assert_eq!(app.state, AppState::Loading);
        assert_eq!(app.take_pending(), Some(PendingAction::LoadDepartments));
    }

    #[test]
    fn test_q_quits_from_department_list() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_navigation_down_increases_index() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.selected_department, 1);
    }

    #[test]
    fn test_navigation_wraps_at_bottom() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Down));
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.selected_department, 0);
    }

    #[test]
    fn test_navigation_up_wraps_at_top() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.selected_department, 1);
    }

    #[test]
    fn test_enter_on_department_schedules_load() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.state, AppState::Loading);
        assert_eq!(
            app.take_pending(),
            Some(PendingAction::OpenDepartment {
                id: 11,
                name: "European Paintings".to_string(),
            })
        );
    }

    #[test]
    fn test_enter_on_artwork_schedules_detail_load() {
        let mut app = test_app_with_departments();
        app.artworks = vec![test_artwork(500)];
        app.state = AppState::ArtworkList;

        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.state, AppState::Loading);
        assert_eq!(app.take_pending(), Some(PendingAction::OpenArtwork(500)));
    }

    #[test]
    fn test_esc_in_artwork_list_returns_to_departments() {
        let mut app = test_app_with_departments();
        app.state = AppState::ArtworkList;
        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.state, AppState::DepartmentList);
    }

    #[test]
    fn test_esc_in_detail_returns_to_artwork_list() {
        let mut app = test_app_with_departments();
        app.current_artwork = Some(test_artwork(500));
        app.detail_scroll_offset = 4;
        app.state = AppState::ArtworkDetail(500);

        app.handle_key(key_event(KeyCode::Esc));

        assert_eq!(app.state, AppState::ArtworkList);
        assert_eq!(app.detail_scroll_offset, 0);
        assert!(app.current_artwork.is_none());
    }

    #[test]
    fn test_artist_input_collects_characters() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Char('a')));
        assert!(app.input.is_some());

        for c in "goya".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Backspace));

        assert_eq!(app.input.as_ref().unwrap().buffer, "goy");
    }

    #[test]
    fn test_input_enter_schedules_artist_search() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Char('a')));
        for c in "vermeer".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Enter));

        assert!(app.input.is_none());
        assert_eq!(app.state, AppState::Loading);
        assert_eq!(
            app.take_pending(),
            Some(PendingAction::SearchArtist("vermeer".to_string()))
        );
    }

    #[test]
    fn test_input_enter_on_empty_buffer_sets_status() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Char('n')));
        app.handle_key(key_event(KeyCode::Enter));

        assert!(app.input.is_none());
        assert!(app.take_pending().is_none());
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("empty")));
    }

    #[test]
    fn test_input_esc_cancels_without_searching() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Char('a')));
        app.handle_key(key_event(KeyCode::Char('x')));
        app.handle_key(key_event(KeyCode::Esc));

        assert!(app.input.is_none());
        assert!(app.take_pending().is_none());
        assert_eq!(app.state, AppState::DepartmentList);
    }

    #[test]
    fn test_stats_overlay_snapshot_and_close() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Char('s')));
        assert!(app.show_stats);
        assert!(app.stats.is_some());

        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.show_stats);
    }

    #[test]
    fn test_stats_overlay_clear_resets_store() {
        let mut app = test_app_with_departments();
        app.store.put_search("q", vec![1]);
        app.handle_key(key_event(KeyCode::Char('s')));
        app.handle_key(key_event(KeyCode::Char('c')));

        assert_eq!(app.store.snapshot().total_entries(), 0);
        let stats = app.stats.expect("snapshot refreshed after clear");
        assert_eq!(stats.total_entries(), 0);
        assert!(app.show_stats, "overlay stays open after clearing");
    }

    #[test]
    fn test_stats_overlay_prune_runs_cleanup_pass() {
        let mut app = test_app_with_departments();
        app.store
            .put_search_with_ttl("stale", vec![1], std::time::Duration::ZERO);
        app.handle_key(key_event(KeyCode::Char('s')));
        app.handle_key(key_event(KeyCode::Char('p')));

        assert_eq!(app.store.snapshot().total_entries(), 0);
        assert_eq!(app.store.snapshot().automatic_cleanups, 1);
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("removed 1")));
    }

    #[test]
    fn test_detail_refresh_invalidates_and_refetches() {
        let mut app = test_app_with_departments();
        app.store.put_artwork(test_artwork(500));
        app.current_artwork = Some(test_artwork(500));
        app.state = AppState::ArtworkDetail(500);

        app.handle_key(key_event(KeyCode::Char('r')));

        assert_eq!(app.state, AppState::Loading);
        assert_eq!(app.take_pending(), Some(PendingAction::OpenArtwork(500)));
        assert!(app.store.get_artwork(500).is_none());
    }

    #[test]
    fn test_nationality_input_validates_before_searching() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Char('n')));
        for c in "martian".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Enter));

        assert!(app.take_pending().is_none());
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("Unsupported nationality")));
    }

    #[test]
    fn test_nationality_input_canonicalizes_query() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Char('n')));
        for c in "dutch".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(
            app.take_pending(),
            Some(PendingAction::SearchNationality("Dutch".to_string()))
        );
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = test_app_with_departments();
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        // Navigation is ignored while help is open
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.selected_department, 0);

        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(!app.show_help);
    }

    #[test]
    fn test_refresh_invalidates_departments_and_reloads() {
        let mut app = test_app_with_departments();
        app.store.put_departments(vec![Department {
            id: 1,
            name: "American Decorative Arts".to_string(),
        }]);

        app.handle_key(key_event(KeyCode::Char('r')));

        assert_eq!(app.state, AppState::Loading);
        assert_eq!(app.take_pending(), Some(PendingAction::LoadDepartments));
        assert!(app.store.get_departments().is_none());
    }

    #[tokio::test]
    async fn test_run_pending_serves_departments_from_cache() {
        let store = Arc::new(DataStore::new());
        store.put_departments(vec![Department {
            id: 11,
            name: "European Paintings".to_string(),
        }]);
        let mut app = App::with_parts(
            MetClient::with_base_url("http://127.0.0.1:9"),
            store,
            None,
        );

        app.run_pending().await;

        assert_eq!(app.state, AppState::DepartmentList);
        assert_eq!(app.departments.len(), 1);
        assert!(app.last_refresh.is_some());
    }

    #[tokio::test]
    async fn test_run_pending_detail_error_returns_to_list() {
        let mut app = test_app_with_departments();
        app.artworks = vec![test_artwork(500)];
        app.state = AppState::ArtworkList;
        app.handle_key(key_event(KeyCode::Enter));

        app.run_pending().await;

        assert_eq!(app.state, AppState::ArtworkList);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_initial_artist_chains_after_department_load() {
        let store = Arc::new(DataStore::new());
        store.put_departments(vec![]);
        store.put_search("artist:goya", vec![]);
        let mut app = App::with_parts(
            MetClient::with_base_url("http://127.0.0.1:9"),
            store,
            Some("goya".to_string()),
        );

        // First pending: department load, which chains the artist search
        app.run_pending().await;
        assert!(app.has_pending());
        assert_eq!(app.state, AppState::Loading);

        app.run_pending().await;
        assert_eq!(app.state, AppState::ArtworkList);
        assert_eq!(app.results_title, "Artist: goya");
    }
}

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::GroupConfig;
use crate::data::filter::{self, ActiveFilterSet, FilterSchema};
use crate::data::loader::{self, DatasetCache};
use crate::data::model::PlayerTable;
use crate::error::ScoutError;
use crate::report::ScoutingReport;
use crate::store::{Role, Store, StoredReport, User};

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Database,
    Visualize,
    Reports,
    Admin,
}

impl Page {
    pub fn label(self) -> &'static str {
        match self {
            Page::Database => "Base de datos",
            Page::Visualize => "Visualizaciones",
            Page::Reports => "Informes",
            Page::Admin => "Administración",
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

pub const ROWS_PER_PAGE_OPTIONS: [usize; 6] = [20, 30, 40, 50, 75, 100];
pub const DEFAULT_ROWS_PER_PAGE: usize = 50;
pub const REPORTS_PER_PAGE: usize = 10;

/// Zero-based page window over a list of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: usize,
    pub per_page: usize,
}

impl Pager {
    pub fn new(per_page: usize) -> Self {
        Pager { page: 0, per_page }
    }

    /// At least 1, so an empty list still has a page to show.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.per_page).max(1)
    }

    /// Pull the page back into range after the total shrank.
    pub fn clamp(&mut self, total: usize) {
        self.page = self.page.min(self.page_count(total) - 1);
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn next(&mut self, total: usize) {
        if self.page + 1 < self.page_count(total) {
            self.page += 1;
        }
    }

    /// Change the page size, keeping the first visible row visible.
    pub fn set_per_page(&mut self, per_page: usize) {
        if per_page == 0 || per_page == self.per_page {
            return;
        }
        let first = self.start();
        self.per_page = per_page;
        self.page = first / per_page;
    }

    pub fn start(&self) -> usize {
        self.page * self.per_page
    }

    pub fn end(&self, total: usize) -> usize {
        (self.start() + self.per_page).min(total)
    }
}

// ---------------------------------------------------------------------------
// Database page state
// ---------------------------------------------------------------------------

/// Columns shown by default when a dataset loads.
const DEFAULT_VISIBLE_COLUMNS: usize = 10;

/// Everything the database page remembers between frames: the inferred
/// filter schema, the filters switched on, the surviving row indices and
/// the visible column set.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseState {
    /// Label of the column group whose filters are unfolded.
    pub group: String,
    pub schema: FilterSchema,
    pub active: ActiveFilterSet,
    /// Row indices passing the active filters, in dataset order.
    pub visible: Vec<usize>,
    pub selected_columns: Vec<String>,
    pub column_picker_open: bool,
    pub column_draft: BTreeSet<String>,
    pub filter_picker_open: bool,
    pub filter_draft: BTreeSet<String>,
    pub pager: Pager,
}

impl Default for DatabaseState {
    fn default() -> Self {
        DatabaseState {
            group: String::new(),
            schema: FilterSchema::default(),
            active: ActiveFilterSet::new(),
            visible: Vec::new(),
            selected_columns: Vec::new(),
            column_picker_open: false,
            column_draft: BTreeSet::new(),
            filter_picker_open: false,
            filter_draft: BTreeSet::new(),
            pager: Pager::new(DEFAULT_ROWS_PER_PAGE),
        }
    }
}

impl DatabaseState {
    /// Re-derive schema and defaults for a freshly loaded dataset. All
    /// active filters are dropped; the page size survives.
    pub fn rebuild(&mut self, table: &PlayerTable, config: &GroupConfig) {
        self.schema = FilterSchema::build(table, &config.column_groups);
        self.active.clear();
        self.visible = (0..table.len()).collect();
        self.selected_columns = default_columns(table, config);
        self.group = config
            .column_groups
            .first()
            .map(|g| g.label.clone())
            .unwrap_or_default();
        self.column_picker_open = false;
        self.filter_picker_open = false;
        self.pager.page = 0;
    }

    /// Recompute the visible rows after any filter change.
    pub fn refilter(&mut self, table: &PlayerTable) {
        self.visible = filter::apply(table, &self.active);
        self.pager.clamp(self.visible.len());
    }

    pub fn open_column_picker(&mut self) {
        self.column_draft = self.selected_columns.iter().cloned().collect();
        self.column_picker_open = true;
    }

    /// Apply the drafted column set. Kept columns keep their position;
    /// new ones append in dataset order.
    pub fn apply_column_picker(&mut self, table: &PlayerTable) {
        self.selected_columns
            .retain(|c| self.column_draft.contains(c));
        for column in &table.columns {
            if self.column_draft.contains(column) && !self.selected_columns.contains(column) {
                self.selected_columns.push(column.clone());
            }
        }
    }

    pub fn close_column_picker(&mut self) {
        self.column_picker_open = false;
    }

    pub fn open_filter_picker(&mut self) {
        self.filter_draft = self.active.columns().map(str::to_string).collect();
        self.filter_picker_open = true;
    }

    /// Sync the active set with the draft: unchecked filters deactivate,
    /// newly checked ones activate at their neutral value.
    pub fn apply_filter_picker(&mut self, table: &PlayerTable) {
        let dropped: Vec<String> = self
            .active
            .columns()
            .filter(|c| !self.filter_draft.contains(*c))
            .map(str::to_string)
            .collect();
        for column in &dropped {
            self.active.deactivate(column);
        }
        for column in &self.filter_draft {
            if let Some(descriptor) = self.schema.descriptor(column) {
                self.active.activate(descriptor);
            }
        }
        self.filter_picker_open = false;
        self.refilter(table);
    }

    pub fn close_filter_picker(&mut self) {
        self.filter_picker_open = false;
    }

    pub fn remove_filter(&mut self, table: &PlayerTable, column: &str) {
        self.active.deactivate(column);
        self.refilter(table);
    }

    pub fn clear_filters(&mut self, table: &PlayerTable) {
        self.active.clear();
        self.refilter(table);
    }
}

fn default_columns(table: &PlayerTable, config: &GroupConfig) -> Vec<String> {
    let from_group: Vec<String> = config
        .column_groups
        .first()
        .map(|group| {
            group
                .columns
                .iter()
                .filter(|c| table.has_column(c))
                .take(DEFAULT_VISIBLE_COLUMNS)
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    if !from_group.is_empty() {
        return from_group;
    }
    table
        .columns
        .iter()
        .take(DEFAULT_VISIBLE_COLUMNS)
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Visualization page state
// ---------------------------------------------------------------------------

pub const DEFAULT_MIN_MINUTES: f64 = 500.0;
pub const DEFAULT_RANK_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VizTab {
    Radar,
    Compare,
    Ranking,
    Percentiles,
    Correlation,
}

impl VizTab {
    pub const ALL: [VizTab; 5] = [
        VizTab::Radar,
        VizTab::Compare,
        VizTab::Ranking,
        VizTab::Percentiles,
        VizTab::Correlation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VizTab::Radar => "Radar",
            VizTab::Compare => "Comparar",
            VizTab::Ranking => "Ranking",
            VizTab::Percentiles => "Percentiles",
            VizTab::Correlation => "Correlación",
        }
    }
}

/// Selections of the chart tabs. Player names are display strings; an
/// empty position means every position.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizeState {
    pub tab: VizTab,
    pub metric_group: String,
    pub radar_player: String,
    pub compare_players: Vec<String>,
    pub rank_metric: String,
    pub rank_position: String,
    pub min_minutes: f64,
    pub rank_limit: usize,
    pub percentile_player: String,
}

impl VisualizeState {
    pub fn new(config: &GroupConfig) -> Self {
        let mut state = VisualizeState {
            tab: VizTab::Radar,
            metric_group: String::new(),
            radar_player: String::new(),
            compare_players: Vec::new(),
            rank_metric: String::new(),
            rank_position: String::new(),
            min_minutes: DEFAULT_MIN_MINUTES,
            rank_limit: DEFAULT_RANK_LIMIT,
            percentile_player: String::new(),
        };
        state.reset(config);
        state
    }

    /// Drop dataset-bound selections; called when the dataset changes.
    pub fn reset(&mut self, config: &GroupConfig) {
        self.metric_group = config
            .metric_groups
            .first()
            .map(|g| g.label.clone())
            .unwrap_or_default();
        self.radar_player.clear();
        self.compare_players.clear();
        self.rank_metric.clear();
        self.rank_position.clear();
        self.percentile_player.clear();
        self.min_minutes = DEFAULT_MIN_MINUTES;
        self.rank_limit = DEFAULT_RANK_LIMIT;
    }
}

// ---------------------------------------------------------------------------
// Reports page state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportsView {
    List,
    Detail(i64),
    Create,
}

/// Draft of a new scouting report, bound to the form widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportForm {
    pub report_date: chrono::NaiveDate,
    pub match_date: chrono::NaiveDate,
    pub local_team: String,
    pub visitor_team: String,
    pub result: String,
    pub player_name: String,
    pub player_club: String,
    pub position: String,
    pub overall_rating: u8,
    pub is_starter: bool,
    pub minutes_played: u32,
    pub technical: String,
    pub tactical: String,
    pub physical: String,
    pub psychological: String,
    pub observations: String,
    pub photo_path: Option<String>,
}

impl Default for ReportForm {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive();
        ReportForm {
            report_date: today,
            match_date: today,
            local_team: String::new(),
            visitor_team: String::new(),
            result: String::new(),
            player_name: String::new(),
            player_club: String::new(),
            position: String::new(),
            overall_rating: 5,
            is_starter: true,
            minutes_played: 90,
            technical: String::new(),
            tactical: String::new(),
            physical: String::new(),
            psychological: String::new(),
            observations: String::new(),
            photo_path: None,
        }
    }
}

impl ReportForm {
    /// Validate and build the report. Error messages are user-facing.
    pub fn build(&self) -> Result<ScoutingReport, String> {
        if self.player_name.trim().is_empty() {
            return Err("El nombre del jugador es obligatorio".into());
        }
        if self.local_team.trim().is_empty() {
            return Err("El equipo local es obligatorio".into());
        }
        if self.visitor_team.trim().is_empty() {
            return Err("El equipo visitante es obligatorio".into());
        }
        Ok(ScoutingReport {
            report_date: self.report_date,
            match_date: self.match_date,
            local_team: self.local_team.trim().to_string(),
            visitor_team: self.visitor_team.trim().to_string(),
            result: self.result.trim().to_string(),
            player_name: self.player_name.trim().to_string(),
            player_club: self.player_club.trim().to_string(),
            position: self.position.trim().to_string(),
            overall_rating: self.overall_rating,
            is_starter: self.is_starter,
            minutes_played: self.minutes_played,
            technical: self.technical.trim().to_string(),
            tactical: self.tactical.trim().to_string(),
            physical: self.physical.trim().to_string(),
            psychological: self.psychological.trim().to_string(),
            observations: self.observations.trim().to_string(),
            photo_path: self.photo_path.clone(),
        })
    }
}

/// State of the reports page: the list query, the open view and the
/// creation form. `dirty` forces a re-query on the next frame.
#[derive(Debug)]
pub struct ReportsState {
    pub view: ReportsView,
    pub search: String,
    pub pager: Pager,
    pub listing: Vec<StoredReport>,
    pub total: usize,
    pub detail: Option<StoredReport>,
    pub dirty: bool,
    pub form: ReportForm,
    pub error: Option<String>,
}

impl Default for ReportsState {
    fn default() -> Self {
        ReportsState {
            view: ReportsView::List,
            search: String::new(),
            pager: Pager::new(REPORTS_PER_PAGE),
            listing: Vec::new(),
            total: 0,
            detail: None,
            dirty: true,
            form: ReportForm::default(),
            error: None,
        }
    }
}

impl ReportsState {
    /// Re-query the visible page. Failures keep the stale listing and
    /// surface a message instead.
    pub fn refresh(&mut self, store: &Store) {
        self.dirty = false;
        match self.fetch(store) {
            Ok(listing) => {
                self.listing = listing;
                self.error = None;
            }
            Err(e) => {
                log::error!("listing reports: {e:#}");
                self.error = Some("No se pudieron cargar los informes".into());
            }
        }
    }

    fn fetch(&mut self, store: &Store) -> Result<Vec<StoredReport>> {
        let needle = self.search.trim().to_string();
        let filter = (!needle.is_empty()).then_some(needle.as_str());
        self.total = store.count_reports(filter)?;
        self.pager.clamp(self.total);
        store.list_reports(filter, self.pager.per_page, self.pager.start())
    }

    pub fn open_detail(&mut self, store: &Store, id: i64) {
        match store.report_by_id(id) {
            Ok(Some(report)) => {
                self.detail = Some(report);
                self.view = ReportsView::Detail(id);
                self.error = None;
            }
            Ok(None) => {
                self.error = Some("El informe ya no existe".into());
                self.dirty = true;
            }
            Err(e) => {
                log::error!("loading report {id}: {e:#}");
                self.error = Some("No se pudo cargar el informe".into());
            }
        }
    }

    pub fn begin_create(&mut self) {
        self.form = ReportForm::default();
        self.view = ReportsView::Create;
        self.error = None;
    }

    pub fn back_to_list(&mut self) {
        self.view = ReportsView::List;
        self.detail = None;
        self.dirty = true;
    }
}

// ---------------------------------------------------------------------------
// Admin and login state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AdminState {
    pub new_username: String,
    pub new_password: String,
    pub new_role: Role,
    pub current_password: String,
    pub new_password1: String,
    pub new_password2: String,
    pub users: Vec<User>,
    pub users_dirty: bool,
    pub notice: Option<String>,
}

impl Default for AdminState {
    fn default() -> Self {
        AdminState {
            new_username: String::new(),
            new_password: String::new(),
            new_role: Role::Scout,
            current_password: String::new(),
            new_password1: String::new(),
            new_password2: String::new(),
            users: Vec::new(),
            users_dirty: true,
            notice: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// SQLite store (None when the database could not be opened).
    pub store: Option<Store>,
    pub config: GroupConfig,
    pub cache: DatasetCache,
    /// Directory scanned for scouting exports.
    pub data_dir: PathBuf,
    /// Loaded dataset (None until a data file is found).
    pub table: Option<PlayerTable>,
    /// Logged-in account; None shows the login screen.
    pub user: Option<User>,
    pub page: Page,
    pub login: LoginState,
    pub database: DatabaseState,
    pub visualize: VisualizeState,
    pub reports: ReportsState,
    pub admin: AdminState,
    /// Status / error message shown in the top bar.
    pub status: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        AppState::with_paths(
            Path::new("db/scouting.db"),
            Path::new("data"),
            Path::new("config/grupos.json"),
        )
    }

    pub fn with_paths(db_path: &Path, data_dir: &Path, config_path: &Path) -> Self {
        let store = match Store::open(db_path) {
            Ok(store) => Some(store),
            Err(e) => {
                log::error!("opening database {}: {e:#}", db_path.display());
                None
            }
        };
        let config = GroupConfig::load_or_default(config_path).unwrap_or_else(|e| {
            log::error!("loading group config: {e:#}");
            GroupConfig::default()
        });

        let mut state = AppState {
            store,
            visualize: VisualizeState::new(&config),
            config,
            cache: DatasetCache::default(),
            data_dir: data_dir.to_path_buf(),
            table: None,
            user: None,
            page: Page::Database,
            login: LoginState::default(),
            database: DatabaseState::default(),
            reports: ReportsState::default(),
            admin: AdminState::default(),
            status: None,
        };
        state.load_dataset();
        state
    }

    /// Read every export in the data directory and swap the dataset in,
    /// resetting everything derived from it.
    pub fn load_dataset(&mut self) {
        match self.read_data_dir() {
            Ok(table) => {
                log::info!(
                    "loaded {} players across {} columns",
                    table.len(),
                    table.columns.len()
                );
                self.database.rebuild(&table, &self.config);
                self.visualize.reset(&self.config);
                self.table = Some(table);
                self.status = None;
            }
            Err(e) => {
                log::error!("loading dataset: {e:#}");
                self.table = None;
                self.status = Some(format!("Error al cargar datos: {e}"));
            }
        }
    }

    fn read_data_dir(&mut self) -> Result<PlayerTable> {
        let files = loader::list_data_files(&self.data_dir)?;
        if files.is_empty() {
            return Err(ScoutError::EmptyDataset(self.data_dir.display().to_string()).into());
        }
        let tables = files
            .iter()
            .map(|file| self.cache.load(file))
            .collect::<Result<Vec<_>>>()?;
        loader::combine(tables)
    }

    /// Bypass the cache and reread the data directory from disk.
    pub fn reload_dataset(&mut self) {
        self.cache.invalidate();
        self.load_dataset();
    }

    pub fn try_login(&mut self) {
        let Some(store) = &self.store else {
            self.login.error = Some("Base de datos no disponible".into());
            return;
        };
        match store.authenticate(self.login.username.trim(), &self.login.password) {
            Ok(Some(user)) => {
                log::info!("user '{}' logged in", user.username);
                self.user = Some(user);
                self.login = LoginState::default();
                self.page = Page::Database;
            }
            Ok(None) => {
                self.login.error = Some("Usuario o contraseña incorrectos".into());
            }
            Err(e) => {
                log::error!("authenticating: {e:#}");
                self.login.error = Some("Error de base de datos".into());
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(user) = &self.user {
            log::info!("user '{}' logged out", user.username);
        }
        self.user = None;
        self.login = LoginState::default();
        self.page = Page::Database;
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::Admin)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testutil::roster;
    use crate::data::filter::FilterValue;

    #[test]
    fn pager_windows_and_clamps() {
        let mut pager = Pager::new(50);
        assert_eq!(pager.page_count(0), 1);
        assert_eq!(pager.page_count(101), 3);
        assert_eq!((pager.start(), pager.end(120)), (0, 50));

        pager.next(120);
        pager.next(120);
        pager.next(120); // already on the last page
        assert_eq!(pager.page, 2);
        assert_eq!(pager.end(120), 120);

        pager.clamp(40);
        assert_eq!(pager.page, 0);
        pager.prev();
        assert_eq!(pager.page, 0);
    }

    #[test]
    fn changing_page_size_keeps_first_row() {
        let mut pager = Pager::new(20);
        pager.page = 2; // rows 40..60
        pager.set_per_page(50);
        assert_eq!(pager.page, 0); // rows 0..50 contain row 40

        pager.page = 1; // rows 50..100
        pager.set_per_page(20);
        assert_eq!(pager.page, 2); // rows 40..60 contain row 50

        pager.set_per_page(0); // ignored
        assert_eq!(pager.per_page, 20);
    }

    #[test]
    fn rebuild_defaults_to_first_group() {
        let table = roster();
        let config = GroupConfig::default();
        let mut db = DatabaseState::default();
        db.rebuild(&table, &config);

        assert_eq!(db.group, "GENERAL");
        assert_eq!(db.selected_columns, vec!["jugador", "equipo", "pos", "min"]);
        assert_eq!(db.visible.len(), table.len());
        assert!(db.active.is_empty());
    }

    #[test]
    fn filter_picker_round_trip() {
        let table = roster();
        let config = GroupConfig::default();
        let mut db = DatabaseState::default();
        db.rebuild(&table, &config);

        db.open_filter_picker();
        db.filter_draft.insert("min".to_string());
        db.apply_filter_picker(&table);

        // Activation at the neutral range only hides the null row.
        assert!(db.active.is_active("min"));
        assert_eq!(db.visible, vec![0, 1, 2, 3, 4]);

        if let Some(FilterValue::Range { lo, .. }) = db.active.value_mut("min") {
            *lo = 500.0;
        }
        db.refilter(&table);
        assert_eq!(db.visible, vec![0, 1, 2, 4]);

        db.remove_filter(&table, "min");
        assert_eq!(db.visible.len(), table.len());
    }

    #[test]
    fn column_picker_keeps_order_of_kept_columns() {
        let table = roster();
        let config = GroupConfig::default();
        let mut db = DatabaseState::default();
        db.rebuild(&table, &config);

        db.open_column_picker();
        db.column_draft.insert("goles/90".to_string());
        db.column_draft.remove("pos");
        db.apply_column_picker(&table);

        assert_eq!(
            db.selected_columns,
            vec!["jugador", "equipo", "min", "goles/90"]
        );
    }

    #[test]
    fn report_form_validates_required_fields() {
        let mut form = ReportForm::default();
        assert_eq!(
            form.build().unwrap_err(),
            "El nombre del jugador es obligatorio"
        );

        form.player_name = "  Mateo Luna  ".to_string();
        form.local_team = "CA Cimarrón".to_string();
        assert_eq!(form.build().unwrap_err(), "El equipo visitante es obligatorio");

        form.visitor_team = "Deportivo Alba".to_string();
        let report = form.build().unwrap();
        assert_eq!(report.player_name, "Mateo Luna");
        assert_eq!(report.overall_rating, 5);
        assert!(report.is_starter);
    }

    fn sample_report(player: &str, day: u32) -> ScoutingReport {
        let mut form = ReportForm::default();
        form.player_name = player.to_string();
        form.local_team = "CA Cimarrón".to_string();
        form.visitor_team = "Deportivo Alba".to_string();
        let mut report = form.build().unwrap();
        report.match_date = chrono::NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
        report
    }

    #[test]
    fn reports_refresh_lists_and_searches() {
        let store = Store::open_in_memory().unwrap();
        for (player, day) in [("Mateo Luna", 3), ("Iker Ríos", 9), ("Teo Cano", 6)] {
            store.insert_report(&sample_report(player, day), 1).unwrap();
        }

        let mut reports = ReportsState::default();
        assert!(reports.dirty);
        reports.refresh(&store);
        assert!(!reports.dirty);
        assert_eq!(reports.total, 3);
        let names: Vec<&str> = reports
            .listing
            .iter()
            .map(|r| r.report.player_name.as_str())
            .collect();
        assert_eq!(names, vec!["Iker Ríos", "Teo Cano", "Mateo Luna"]);

        reports.search = "  luna ".to_string();
        reports.refresh(&store);
        assert_eq!(reports.total, 1);
        assert_eq!(reports.listing[0].report.player_name, "Mateo Luna");
        assert!(reports.error.is_none());
    }

    #[test]
    fn report_detail_and_views() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_report(&sample_report("Nico Vega", 12), 1).unwrap();

        let mut reports = ReportsState::default();
        reports.open_detail(&store, id);
        assert_eq!(reports.view, ReportsView::Detail(id));
        assert_eq!(reports.detail.as_ref().unwrap().report.player_name, "Nico Vega");

        reports.back_to_list();
        assert_eq!(reports.view, ReportsView::List);
        assert!(reports.dirty);

        reports.open_detail(&store, 9999);
        assert_eq!(reports.view, ReportsView::List);
        assert!(reports.error.is_some());
    }

    fn memory_state() -> AppState {
        let config = GroupConfig::default();
        AppState {
            store: Some(Store::open_in_memory().unwrap()),
            visualize: VisualizeState::new(&config),
            config,
            cache: DatasetCache::default(),
            data_dir: PathBuf::from("data"),
            table: None,
            user: None,
            page: Page::Database,
            login: LoginState::default(),
            database: DatabaseState::default(),
            reports: ReportsState::default(),
            admin: AdminState::default(),
            status: None,
        }
    }

    #[test]
    fn login_accepts_seeded_admin() {
        let mut state = memory_state();
        state.login.username = "admin".to_string();
        state.login.password = "wrong".to_string();
        state.try_login();
        assert!(state.user.is_none());
        assert_eq!(
            state.login.error.as_deref(),
            Some("Usuario o contraseña incorrectos")
        );

        state.login.username = "admin".to_string();
        state.login.password = "admin123".to_string();
        state.try_login();
        assert!(state.is_admin());
        assert!(state.login.password.is_empty());

        state.logout();
        assert!(state.user.is_none());
    }

    #[test]
    fn visualize_reset_follows_config() {
        let config = GroupConfig::default();
        let mut viz = VisualizeState::new(&config);
        assert_eq!(viz.metric_group, "ATAQUE");
        assert_eq!(viz.min_minutes, DEFAULT_MIN_MINUTES);

        viz.rank_limit = 99;
        viz.radar_player = "Mateo Luna".to_string();
        viz.reset(&config);
        assert_eq!(viz.rank_limit, DEFAULT_RANK_LIMIT);
        assert!(viz.radar_player.is_empty());
    }
}

// TUI application state and key handling
use artscout_core::{
    pager, Error, ObjectRecord, PageSize, PageState, PageView, ResultSet, SearchOutcome,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,    // Moving around the grid
    Searching, // Typing in the keyword box
}

/// What the results area is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Prompt,
    Searching,
    Empty,
    Failed(String),
    Results,
}

/// Work the runner has to do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Search,
    LoadPage,
    Open(String),
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub search_input: String,
    pub page_size: PageSize,
    pub grid_columns: usize,
    pub status: ViewStatus,
    pub results: Option<ResultSet>,
    pub page_state: PageState,
    pub page: Option<PageView>,
    pub selected_index: usize,
    pub show_details: bool,
    // Transient problems like a browser that would not open
    pub error_message: Option<String>,
}

impl App {
    pub fn new(page_size: PageSize, grid_columns: usize) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Searching,
            search_input: String::new(),
            page_size,
            grid_columns: grid_columns.max(1),
            status: ViewStatus::Prompt,
            results: None,
            page_state: PageState::first(),
            page: None,
            selected_index: 0,
            show_details: false,
            error_message: None,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn total_results(&self) -> usize {
        self.results.as_ref().map_or(0, ResultSet::len)
    }

    pub fn total_pages(&self) -> usize {
        pager::total_pages(self.total_results(), self.page_size.get())
    }

    /// Mark a search as in flight
    ///
    /// The page number is kept for the whole session; loading the next page
    /// pulls it back into range if the new result set is shorter.
    pub fn begin_search(&mut self) {
        self.status = ViewStatus::Searching;
        self.results = None;
        self.page = None;
        self.selected_index = 0;
        self.error_message = None;
    }

    pub fn apply_search(&mut self, outcome: Result<SearchOutcome, Error>) {
        match outcome {
            Ok(SearchOutcome::Prompt) => self.status = ViewStatus::Prompt,
            Ok(SearchOutcome::Empty) => self.status = ViewStatus::Empty,
            Ok(SearchOutcome::Results(results)) => {
                self.results = Some(results);
                self.status = ViewStatus::Results;
            }
            Err(e) => self.status = ViewStatus::Failed(e.to_string()),
        }
    }

    pub fn set_page(&mut self, view: PageView) {
        self.page_state = view.state;
        self.selected_index = self
            .selected_index
            .min(view.records.len().saturating_sub(1));
        self.page = Some(view);
    }

    pub fn has_results(&self) -> bool {
        self.status == ViewStatus::Results && self.results.is_some()
    }

    /// Returns true when the page actually changed
    pub fn next_page(&mut self) -> bool {
        self.move_page(self.page_state.next(self.total_pages()))
    }

    pub fn prev_page(&mut self) -> bool {
        self.move_page(self.page_state.prev(self.total_pages()))
    }

    fn move_page(&mut self, target: PageState) -> bool {
        if !self.has_results() || target == self.page_state {
            return false;
        }
        self.page_state = target;
        self.selected_index = 0;
        true
    }

    /// Cycle to the next page size and keep the page in range
    pub fn cycle_page_size(&mut self) {
        self.page_size = self.page_size.next();
        if self.has_results() {
            self.page_state = self.page_state.clamped(self.total_pages());
        }
        self.selected_index = 0;
    }

    pub fn records(&self) -> &[ObjectRecord] {
        self.page.as_ref().map_or(&[], |page| page.records.as_slice())
    }

    pub fn selected_record(&self) -> Option<&ObjectRecord> {
        self.records().get(self.selected_index)
    }

    pub fn skipped_count(&self) -> usize {
        self.page.as_ref().map_or(0, |page| page.skipped.len())
    }

    pub fn select_next(&mut self) {
        let len = self.records().len();
        if len > 0 {
            self.selected_index = (self.selected_index + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let target = self.selected_index + self.grid_columns;
        if target < self.records().len() {
            self.selected_index = target;
        }
    }

    pub fn select_up(&mut self) {
        if self.selected_index >= self.grid_columns {
            self.selected_index -= self.grid_columns;
        }
    }

    pub fn toggle_details(&mut self) {
        self.show_details = !self.show_details;
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Searching => self.handle_search_key(key.code),
            InputMode::Normal => self.handle_normal_key(key.code),
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Enter => {
                self.enter_normal_mode();
                if self.search_input.trim().is_empty() {
                    self.begin_search();
                    self.status = ViewStatus::Prompt;
                    Action::None
                } else {
                    Action::Search
                }
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                Action::None
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                Action::None
            }
            KeyCode::Esc => {
                self.enter_normal_mode();
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> Action {
        self.clear_error();
        match code {
            KeyCode::Char('q') => {
                self.quit();
                Action::Quit
            }
            KeyCode::Char('/') => {
                self.enter_search_mode();
                Action::None
            }
            KeyCode::Char('n') => self.page_action(Self::next_page),
            KeyCode::Char('p') => self.page_action(Self::prev_page),
            KeyCode::Right if self.at_last_card() => self.page_action(Self::next_page),
            KeyCode::Left if self.selected_index == 0 => self.page_action(Self::prev_page),
            KeyCode::Char('l') | KeyCode::Right => {
                self.select_next();
                Action::None
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.select_previous();
                Action::None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_down();
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_up();
                Action::None
            }
            KeyCode::Char('d') | KeyCode::Char(' ') => {
                self.toggle_details();
                Action::None
            }
            KeyCode::Char('s') => {
                self.cycle_page_size();
                if self.has_results() {
                    Action::LoadPage
                } else {
                    Action::None
                }
            }
            KeyCode::Char('o') | KeyCode::Enter => self.open_target(|record| record.image_url()),
            KeyCode::Char('w') => self.open_target(|record| record.object_url.as_deref()),
            _ => Action::None,
        }
    }

    fn open_target(&mut self, pick: impl Fn(&ObjectRecord) -> Option<&str>) -> Action {
        let url = self
            .selected_record()
            .and_then(|record| pick(record))
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        match url {
            Some(url) => Action::Open(url),
            None => {
                if self.selected_record().is_some() {
                    self.error_message = Some("Nothing to open for this object".into());
                }
                Action::None
            }
        }
    }

    fn page_action(&mut self, turn: fn(&mut Self) -> bool) -> Action {
        if turn(self) {
            Action::LoadPage
        } else {
            Action::None
        }
    }

    // Arrow keys turn the page once the selection hits either end of it
    fn at_last_card(&self) -> bool {
        self.selected_index + 1 >= self.records().len()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(PageSize::default(), 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artscout_core::pager::visible_range;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn record(id: u64) -> ObjectRecord {
        ObjectRecord {
            object_id: id,
            primary_image_small: Some(format!("https://images.example/{}.jpg", id)),
            ..Default::default()
        }
    }

    fn app_with_results(total: u64, page_size: usize) -> App {
        let mut app = App::new(PageSize::try_from(page_size).unwrap(), 3);
        app.enter_normal_mode();
        app.begin_search();
        app.apply_search(Ok(SearchOutcome::Results(ResultSet::new(
            "birds",
            (1..=total).collect(),
        ))));
        load_current_page(&mut app);
        app
    }

    // Stand-in for Explorer::load_page without a catalog
    fn load_current_page(app: &mut App) {
        let total = app.total_results();
        let total_pages = app.total_pages();
        let state = app.page_state.clamped(total_pages);
        let range = visible_range(total, app.page_size.get(), state.page());
        let records = app
            .results
            .as_ref()
            .unwrap()
            .slice(range.clone())
            .iter()
            .map(|&id| record(id))
            .collect();
        app.set_page(PageView {
            state,
            page_size: app.page_size,
            total,
            total_pages,
            range,
            records,
            skipped: vec![],
        });
    }

    #[test]
    fn test_typing_then_enter_requests_search() {
        let mut app = App::default();
        for c in "Ming".chars() {
            assert_eq!(app.handle_key(key(KeyCode::Char(c))), Action::None);
        }
        assert_eq!(app.search_input, "Ming");
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::Search);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_blank_keyword_stays_on_prompt() {
        let mut app = App::default();
        app.search_input = "   ".into();
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::None);
        assert_eq!(app.status, ViewStatus::Prompt);
    }

    #[test]
    fn test_search_outcomes_set_status() {
        let mut app = App::default();
        app.begin_search();
        assert_eq!(app.status, ViewStatus::Searching);

        app.apply_search(Ok(SearchOutcome::Empty));
        assert_eq!(app.status, ViewStatus::Empty);

        app.apply_search(Err(Error::UpstreamError("status 500".into())));
        assert!(matches!(app.status, ViewStatus::Failed(ref msg) if msg.contains("status 500")));
    }

    #[test]
    fn test_paging_is_clamped() {
        let mut app = app_with_results(30, 12);
        assert_eq!(app.total_pages(), 3);

        assert_eq!(app.handle_key(key(KeyCode::Char('p'))), Action::None);
        assert_eq!(app.page_state.page(), 1);

        assert_eq!(app.handle_key(key(KeyCode::Char('n'))), Action::LoadPage);
        assert_eq!(app.handle_key(key(KeyCode::Char('n'))), Action::LoadPage);
        assert_eq!(app.page_state.page(), 3);
        assert_eq!(app.handle_key(key(KeyCode::Char('n'))), Action::None);
        assert_eq!(app.page_state.page(), 3);
    }

    #[test]
    fn test_page_survives_new_keyword_then_clamps() {
        let mut app = app_with_results(30, 9);
        app.next_page();
        app.next_page();
        assert_eq!(app.page_state.page(), 3);

        // Same size of result set: the page carries over as is
        app.begin_search();
        assert_eq!(app.page_state.page(), 3);
        assert!(app.page.is_none());
        app.apply_search(Ok(SearchOutcome::Results(ResultSet::new(
            "Ming",
            (1..=30).collect(),
        ))));
        load_current_page(&mut app);
        assert_eq!(app.page_state.page(), 3);

        // Fewer results: the page is pulled back to the last one
        app.begin_search();
        app.apply_search(Ok(SearchOutcome::Results(ResultSet::new(
            "Qing",
            (1..=12).collect(),
        ))));
        load_current_page(&mut app);
        assert_eq!(app.page_state.page(), 2);
        assert_eq!(app.records().len(), 3);
    }

    #[test]
    fn test_page_size_change_clamps_page() {
        let mut app = app_with_results(20, 9);
        app.next_page();
        app.next_page();
        assert_eq!(app.page_state.page(), 3);

        // 9 -> 12 leaves only two pages
        assert_eq!(app.handle_key(key(KeyCode::Char('s'))), Action::LoadPage);
        assert_eq!(app.page_size.get(), 12);
        assert_eq!(app.page_state.page(), 2);
    }

    #[test]
    fn test_grid_navigation() {
        let mut app = app_with_results(7, 9);
        assert_eq!(app.records().len(), 7);

        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected_index, 3);
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected_index, 6);
        // No row below
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected_index, 6);
        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.selected_index, 3);
        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(app.selected_index, 4);
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Char('h')));
        assert_eq!(app.selected_index, 2);
    }

    #[test]
    fn test_arrows_turn_page_at_edges() {
        let mut app = app_with_results(30, 12);
        assert_eq!(app.handle_key(key(KeyCode::Right)), Action::None);
        assert_eq!(app.selected_index, 1);

        app.selected_index = 11;
        assert_eq!(app.handle_key(key(KeyCode::Right)), Action::LoadPage);
        assert_eq!(app.page_state.page(), 2);
        assert_eq!(app.selected_index, 0);

        assert_eq!(app.handle_key(key(KeyCode::Left)), Action::LoadPage);
        assert_eq!(app.page_state.page(), 1);
    }

    #[test]
    fn test_open_image_for_selection() {
        let mut app = app_with_results(3, 9);
        app.select_next();
        assert_eq!(
            app.handle_key(key(KeyCode::Char('o'))),
            Action::Open("https://images.example/2.jpg".into())
        );

        // No object page URL on these records
        assert_eq!(app.handle_key(key(KeyCode::Char('w'))), Action::None);
        assert!(app.error_message.is_some());
    }

    #[test]
    fn test_details_toggle_and_quit() {
        let mut app = app_with_results(3, 9);
        app.handle_key(key(KeyCode::Char('d')));
        assert!(app.show_details);
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(!app.show_details);

        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Action::Quit);
        assert!(app.should_quit);
    }
}

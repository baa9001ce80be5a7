use std::time::Instant;

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::SearchResult;
use crate::events::Action;
use crate::layout::GridLayout;
use crate::log;
use crate::navigator::{CursorMove, GridNavigator};
use crate::search::{Hit, PendingSearch, SearchResponse, SearchSession};
use crate::thumbnail::{ThumbnailLoaded, ThumbnailStore};
use crate::tui::interaction::InteractionRegistry;
use crate::visibility::{LayoutProbe, ScrollDirection, VisibilityTracker};

pub struct App {
    /// Current query text
    pub query: String,
    pub session: SearchSession,
    pub navigator: GridNavigator,
    pub tracker: VisibilityTracker,
    pub layout: GridLayout,
    pub thumbnails: ThumbnailStore,
    /// Interactive regions registered during render
    pub interactions: InteractionRegistry,
    /// Gates recomputation while the grid is scrolling; carries the offset
    scroll_debounce: Debouncer<u32>,
    /// Gates recomputation while the terminal is being resized
    resize_debounce: Debouncer<()>,
    /// Scroll offset at the last recompute, for the scroll direction
    last_scroll_top: u32,
    /// Run one downward recompute after the next draw
    needs_recompute: bool,
    /// Searches waiting to be sent by the event loop
    pending_searches: Vec<PendingSearch>,
    /// Thumbnail ids waiting to be loaded by the event loop
    pending_loads: Vec<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let quiet = config.scroll_debounce();
        let leading = config.leading_edge();
        Self {
            query: String::new(),
            session: SearchSession::new(config.page_size()),
            navigator: GridNavigator::new(),
            tracker: VisibilityTracker::new(),
            layout: GridLayout::new(config.item_width(), config.item_height()),
            thumbnails: ThumbnailStore::new(config.thumbnail_source()),
            interactions: InteractionRegistry::new(),
            scroll_debounce: Debouncer::new(quiet, leading),
            resize_debounce: Debouncer::new(quiet, leading),
            last_scroll_top: 0,
            needs_recompute: false,
            pending_searches: vec![],
            pending_loads: vec![],
            should_quit: false,
        }
    }

    /// Queue a search for the current query text.
    pub fn submit_query(&mut self) {
        let pending = self.session.submit(&self.query);
        log::log_event(&format!("Search #{} for {:?}", pending.seq, self.query));
        self.pending_searches.push(pending);
    }

    pub fn take_pending_searches(&mut self) -> Vec<PendingSearch> {
        std::mem::take(&mut self.pending_searches)
    }

    pub fn take_pending_loads(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_loads)
    }

    /// Apply a search response. Fresh results replace the grid: the
    /// selection, visible band and ever-visible set all start over.
    /// Thumbnails of hits that didn't come back are dropped.
    pub fn on_search_response(&mut self, seq: u64, result: SearchResult<SearchResponse>) {
        match result {
            Ok(response) => {
                let count = response.hits.len();
                if !self.session.install(seq, response) {
                    return;
                }
                log::log(&format!("Search #{} returned {} hits", seq, count));
                let session = &self.session;
                self.thumbnails.retain_ids(|id| session.index_of(id).is_some());
                self.navigator.clear();
                self.tracker.reset();
                self.layout.set_item_count(count);
                self.scroll_debounce.cancel();
                self.last_scroll_top = 0;
                self.needs_recompute = true;
            }
            Err(e) => {
                log::log(&format!("Search #{} failed: {}", seq, e));
                self.session.fail(seq, e.to_string());
            }
        }
    }

    pub fn on_thumbnail_loaded(&mut self, loaded: ThumbnailLoaded) {
        self.thumbnails.complete(loaded);
    }

    /// Grid area as laid out by the latest render.
    pub fn set_grid_area(&mut self, width: u16, height: u16) {
        self.layout.set_area(width, height);
    }

    /// Called once the frame has been drawn and the layout is current.
    pub fn after_draw(&mut self) {
        if std::mem::take(&mut self.needs_recompute) {
            self.last_scroll_top = self.layout.scroll_top();
            self.recompute(ScrollDirection::Down);
        }
    }

    pub fn on_resize(&mut self, now: Instant) {
        if self.resize_debounce.call((), now).is_some() {
            self.needs_recompute = true;
        }
    }

    /// Fire any debouncer whose quiet period has elapsed.
    pub fn poll_timers(&mut self, now: Instant) {
        if let Some(scroll_top) = self.scroll_debounce.poll(now) {
            self.on_scroll_settled(scroll_top);
        }
        if self.resize_debounce.poll(now).is_some() {
            self.needs_recompute = true;
        }
    }

    /// Earliest instant a debouncer wants to be polled.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.scroll_debounce.deadline(), self.resize_debounce.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn selected_hit(&self) -> Option<&Hit> {
        self.navigator
            .selected_index(&self.session)
            .and_then(|i| self.session.hit(i))
    }

    pub fn dispatch(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,

            Action::InputChar(c) => {
                self.query.push(c);
                self.submit_query();
            }
            Action::InputBackspace => {
                if self.query.pop().is_some() {
                    self.submit_query();
                }
            }
            Action::ClearQuery => {
                if !self.query.is_empty() {
                    self.query.clear();
                    self.submit_query();
                }
            }

            Action::MoveCursor(direction) => self.move_cursor(direction, now),
            Action::SelectIndex(index) => {
                self.navigator.select(index, &self.session);
            }

            Action::ScrollUp(n) => self.scroll_by(-(n as i32), now),
            Action::ScrollDown(n) => self.scroll_by(n as i32, now),
            Action::PageUp => self.scroll_by(-(self.layout.height() as i32), now),
            Action::PageDown => self.scroll_by(self.layout.height() as i32, now),
            Action::ScrollToTop => self.scroll_to(0, now),
            Action::ScrollToBottom => self.scroll_to(self.layout.max_scroll(), now),

            Action::None => {}
        }
    }

    fn move_cursor(&mut self, direction: CursorMove, now: Instant) {
        let columns = self.layout.column_count();
        let Some(request) = self.navigator.move_cursor(direction, columns, &self.session) else {
            return;
        };
        if !self.layout.is_fully_visible(request.index) {
            let before = self.layout.scroll_top();
            self.layout.scroll_into_view(request.index, request.align);
            if self.layout.scroll_top() != before {
                self.on_scrolled(now);
            }
        }
    }

    fn scroll_by(&mut self, delta: i32, now: Instant) {
        let before = self.layout.scroll_top();
        self.layout.scroll_by(delta);
        if self.layout.scroll_top() != before {
            self.on_scrolled(now);
        }
    }

    fn scroll_to(&mut self, offset: u32, now: Instant) {
        let before = self.layout.scroll_top();
        self.layout.scroll_to(offset);
        if self.layout.scroll_top() != before {
            self.on_scrolled(now);
        }
    }

    fn on_scrolled(&mut self, now: Instant) {
        if let Some(scroll_top) = self.scroll_debounce.call(self.layout.scroll_top(), now) {
            self.on_scroll_settled(scroll_top);
        }
    }

    fn on_scroll_settled(&mut self, scroll_top: u32) {
        let direction = ScrollDirection::between(self.last_scroll_top, scroll_top);
        self.last_scroll_top = scroll_top;
        self.recompute(direction);
    }

    /// Recompute the visible band and queue thumbnails for anything newly seen.
    fn recompute(&mut self, direction: ScrollDirection) {
        let Some(band) = self.tracker.recompute(direction, &self.layout) else {
            return;
        };
        for index in band.min..=band.max {
            if let Some(hit) = self.session.hit(index) {
                if self.thumbnails.request(&hit.id) {
                    self.pending_loads.push(hit.id.clone());
                }
            }
        }
    }
}

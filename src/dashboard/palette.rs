// Command palette: debounced search across several sources
//
// Typing only marks the query dirty. The event loop ticks the palette and,
// once the quiet window has passed since the last keystroke, the palette
// filters local changes and hands back a `SearchRequest` for the three
// remote sources. Each remote answer comes back tagged with the generation
// it was issued under; answers from older generations are dropped so a slow
// response can never overwrite results for a newer query.

use super::cache::DashboardCache;
use super::selection::SelectedItem;
use crate::api::{ChangeId, DocHit, MemoryRecord, ProjectId, RagHit};
use crate::config::PaletteConfig;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    AddProject,
    OpenSettings,
    GenerateDiagram,
    Refresh,
    ToggleSidebar,
}

impl QuickAction {
    pub const ALL: [QuickAction; 5] = [
        QuickAction::AddProject,
        QuickAction::OpenSettings,
        QuickAction::GenerateDiagram,
        QuickAction::Refresh,
        QuickAction::ToggleSidebar,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::AddProject => "Add project…",
            Self::OpenSettings => "Open settings",
            Self::GenerateDiagram => "Generate diagram",
            Self::Refresh => "Refresh",
            Self::ToggleSidebar => "Toggle sidebar",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteItem {
    Action(QuickAction),
    Change {
        project_id: ProjectId,
        project_name: String,
        change_id: ChangeId,
        title: String,
        status: String,
    },
    Doc(DocHit),
    Semantic(RagHit),
    Memory(MemoryRecord),
}

impl PaletteItem {
    /// Main text of the row
    pub fn label(&self) -> String {
        match self {
            Self::Action(action) => action.label().to_string(),
            Self::Change { title, .. } => title.clone(),
            Self::Doc(hit) if !hit.title.is_empty() => hit.title.clone(),
            Self::Doc(hit) => hit.path.clone(),
            Self::Semantic(hit) => hit.content.lines().next().unwrap_or_default().to_string(),
            Self::Memory(record) => record.summary.clone(),
        }
    }

    /// Secondary, dimmed text of the row
    pub fn detail(&self) -> String {
        match self {
            Self::Action(_) => String::new(),
            Self::Change {
                project_name,
                status,
                ..
            } => format!("{} · {}", project_name, status),
            Self::Doc(hit) => match &hit.project_name {
                Some(name) => format!("{} · {}", name, hit.path),
                None => hit.path.clone(),
            },
            Self::Semantic(hit) => match &hit.source {
                Some(source) => format!("{:.2} · {}", hit.score, source),
                None => format!("{:.2}", hit.score),
            },
            Self::Memory(record) => record.kind.clone(),
        }
    }
}

/// Palette sections in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    QuickActions,
    Changes,
    Documents,
    Semantic,
    Memory,
}

impl SectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::QuickActions => "Quick actions",
            Self::Changes => "Changes",
            Self::Documents => "Documents",
            Self::Semantic => "AI results",
            Self::Memory => "Memory",
        }
    }
}

#[derive(Debug)]
pub struct PaletteSection<'a> {
    pub kind: SectionKind,
    pub items: Vec<&'a PaletteItem>,
    /// Source still waiting for its response
    pub loading: bool,
}

/// Request for the remote sources, produced when the debounce fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
    pub limit: usize,
}

/// Answer from one remote source
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    Docs(Vec<DocHit>),
    Semantic(Vec<RagHit>),
    Memory(Vec<MemoryRecord>),
}

/// What selecting an item asks the App to do
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteAction {
    Navigate(SelectedItem),
    Quick(QuickAction),
    /// Nothing to navigate to; put the text on the clipboard
    CopyText(String),
}

#[derive(Debug, Default)]
struct RemoteSource {
    loading: bool,
    items: Vec<PaletteItem>,
}

impl RemoteSource {
    fn start(&mut self) {
        self.loading = true;
        self.items.clear();
    }

    fn clear(&mut self) {
        self.loading = false;
        self.items.clear();
    }
}

#[derive(Debug)]
pub struct CommandPalette {
    open: bool,
    query: String,
    /// Query the visible results were computed for
    searched: String,
    dirty_since: Option<Instant>,
    generation: u64,
    debounce: Duration,
    min_query_len: usize,
    result_limit: usize,
    quick: Vec<PaletteItem>,
    changes: Vec<PaletteItem>,
    docs: RemoteSource,
    semantic: RemoteSource,
    memory: RemoteSource,
    selected: usize,
}

impl CommandPalette {
    pub fn new(config: &PaletteConfig) -> Self {
        Self {
            open: false,
            query: String::new(),
            searched: String::new(),
            dirty_since: None,
            generation: 0,
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_len: config.min_query_len,
            result_limit: config.result_limit,
            quick: QuickAction::ALL.iter().copied().map(PaletteItem::Action).collect(),
            changes: Vec::new(),
            docs: RemoteSource::default(),
            semantic: RemoteSource::default(),
            memory: RemoteSource::default(),
            selected: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Open with an empty query (quick actions visible)
    pub fn open(&mut self) {
        self.open = true;
        self.query.clear();
        self.searched.clear();
        self.dirty_since = None;
        self.changes.clear();
        self.clear_remote();
        self.selected = 0;
    }

    /// Close and invalidate anything still in flight
    pub fn close(&mut self) {
        self.open = false;
        self.dirty_since = None;
        self.generation += 1;
    }

    pub fn input_char(&mut self, c: char, now: Instant) {
        self.query.push(c);
        self.dirty_since = Some(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.query.pop().is_some() {
            self.dirty_since = Some(now);
        }
    }

    pub fn set_query(&mut self, query: &str, now: Instant) {
        self.query = query.to_string();
        self.dirty_since = Some(now);
    }

    /// Whether a keystroke is waiting for the quiet window to pass
    pub fn is_pending(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Fire the search once `debounce` has elapsed since the last keystroke
    pub fn tick(&mut self, now: Instant, cache: &DashboardCache) -> Option<SearchRequest> {
        let dirty_since = self.dirty_since?;
        if now.saturating_duration_since(dirty_since) < self.debounce {
            return None;
        }
        self.dirty_since = None;
        self.fire(cache)
    }

    /// Run the search for the current query right away
    ///
    /// Local changes are filtered synchronously. Remote sources are only
    /// requested for queries of at least `min_query_len` characters.
    pub fn fire(&mut self, cache: &DashboardCache) -> Option<SearchRequest> {
        self.generation += 1;
        self.searched = self.query.trim().to_string();
        self.selected = 0;
        self.changes = filter_changes(cache, &self.searched);

        if self.searched.chars().count() < self.min_query_len {
            self.clear_remote();
            return None;
        }

        self.docs.start();
        self.semantic.start();
        self.memory.start();
        tracing::debug!(
            "Palette search #{} for {:?}",
            self.generation,
            self.searched
        );

        Some(SearchRequest {
            generation: self.generation,
            query: self.searched.clone(),
            limit: self.result_limit,
        })
    }

    /// Store one source's answer; returns false when it was stale
    pub fn apply(&mut self, generation: u64, results: SearchResults) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "Dropping stale palette results (#{} < #{})",
                generation,
                self.generation
            );
            return false;
        }

        let (source, items): (&mut RemoteSource, Vec<PaletteItem>) = match results {
            SearchResults::Docs(hits) => (
                &mut self.docs,
                hits.into_iter().map(PaletteItem::Doc).collect(),
            ),
            SearchResults::Semantic(hits) => (
                &mut self.semantic,
                hits.into_iter().map(PaletteItem::Semantic).collect(),
            ),
            SearchResults::Memory(records) => (
                &mut self.memory,
                records.into_iter().map(PaletteItem::Memory).collect(),
            ),
        };
        source.loading = false;
        source.items = items;
        true
    }

    fn clear_remote(&mut self) {
        self.docs.clear();
        self.semantic.clear();
        self.memory.clear();
    }

    /// Visible sections, in order: quick actions (empty query only),
    /// changes, documents, AI results, memory
    pub fn sections(&self) -> Vec<PaletteSection<'_>> {
        let mut sections = Vec::new();

        if self.searched.is_empty() {
            sections.push(PaletteSection {
                kind: SectionKind::QuickActions,
                items: self.quick.iter().collect(),
                loading: false,
            });
        }
        if !self.changes.is_empty() {
            sections.push(PaletteSection {
                kind: SectionKind::Changes,
                items: self.changes.iter().collect(),
                loading: false,
            });
        }
        for (kind, source) in [
            (SectionKind::Documents, &self.docs),
            (SectionKind::Semantic, &self.semantic),
            (SectionKind::Memory, &self.memory),
        ] {
            if source.loading || !source.items.is_empty() {
                sections.push(PaletteSection {
                    kind,
                    items: source.items.iter().collect(),
                    loading: source.loading,
                });
            }
        }
        sections
    }

    /// All selectable items, flattened in section order
    pub fn items(&self) -> Vec<&PaletteItem> {
        self.sections().into_iter().flat_map(|s| s.items).collect()
    }

    pub fn selected_index(&self) -> usize {
        self.selected.min(self.items().len().saturating_sub(1))
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected_index().saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let last = self.items().len().saturating_sub(1);
        self.selected = (self.selected_index() + 1).min(last);
    }

    /// Resolve the highlighted item
    pub fn select(&self, cache: &DashboardCache) -> Option<PaletteAction> {
        let items = self.items();
        items
            .get(self.selected_index())
            .map(|item| resolve(item, cache))
    }
}

/// Case-insensitive substring match over change titles and ids
pub fn filter_changes(cache: &DashboardCache, query: &str) -> Vec<PaletteItem> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    cache
        .all_changes()
        .filter(|(_, c)| {
            c.title.to_lowercase().contains(&needle) || c.id.to_lowercase().contains(&needle)
        })
        .map(|(p, c)| PaletteItem::Change {
            project_id: p.id.clone(),
            project_name: p.name.clone(),
            change_id: c.id.clone(),
            title: c.title.clone(),
            status: c.status.clone(),
        })
        .collect()
}

/// Map a palette item to what selecting it should do
pub fn resolve(item: &PaletteItem, cache: &DashboardCache) -> PaletteAction {
    match item {
        PaletteItem::Action(action) => PaletteAction::Quick(*action),
        PaletteItem::Change {
            project_id,
            change_id,
            ..
        } => PaletteAction::Navigate(SelectedItem::Change {
            project_id: project_id.clone(),
            change_id: change_id.clone(),
        }),
        PaletteItem::Doc(hit) => PaletteAction::Navigate(SelectedItem::Docs {
            project_id: hit
                .project_id
                .clone()
                .or_else(|| owning_project(cache, &hit.path)),
            path: hit.path.clone(),
        }),
        PaletteItem::Semantic(hit) => match hit.source.as_deref().map(str::trim) {
            Some(source) if !source.is_empty() => PaletteAction::Navigate(SelectedItem::Docs {
                project_id: owning_project(cache, source),
                path: source.to_string(),
            }),
            _ => PaletteAction::CopyText(hit.content.clone()),
        },
        PaletteItem::Memory(record) => match &record.project_id {
            Some(project_id) if cache.project(project_id).is_some() => {
                PaletteAction::Navigate(SelectedItem::Project {
                    project_id: project_id.clone(),
                })
            }
            _ => PaletteAction::CopyText(record.summary.clone()),
        },
    }
}

/// Project whose folder contains `path`
fn owning_project(cache: &DashboardCache, path: &str) -> Option<ProjectId> {
    cache
        .projects
        .iter()
        .filter(|p| {
            let root = p.path.trim_end_matches('/');
            !root.is_empty()
                && (path == root || path.starts_with(&format!("{}/", root)))
        })
        .max_by_key(|p| p.path.len())
        .map(|p| p.id.clone())
}

//! The versioned dependency graph store.
//!
//! [`DependencyGraphStore`] is the single writer of code nodes and edges.
//! Every applied commit produces a new immutable [`GraphSnapshot`],
//! parent-linked to the previous version (copy-on-write at version
//! granularity). Readers hold `Arc<GraphSnapshot>` handles, so graph
//! updates never invalidate an in-flight correlation, and garbage
//! collection of old versions cannot pull a snapshot out from under a
//! reader that still references it.
//!
//! Structural deltas are computed per touched path: only changed files are
//! re-scanned. A file that cannot be analyzed keeps its prior subtree and
//! is marked degraded; the update as a whole never aborts.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use crate::edge::{DepEdge, EdgeKind};
use crate::error::GraphError;
use crate::event::{ChangeKind, CommitEvent};
use crate::id::{CodeNodeId, CommitId, GraphVersion};
use crate::node::{content_hash, CodeNode, LanguageTag, NodeKind};
use crate::scan::{FileOutline, SourceScanner};

/// Provides file content for paths touched by a commit.
///
/// The store never reads the filesystem itself; the event intake supplies
/// content for changed files. A `None` return means the content is
/// unavailable (binary blob, fetch failure) and the path degrades.
pub trait SourceProvider {
    fn source(&self, path: &str) -> Option<&str>;
}

/// A `SourceProvider` backed by an in-memory path -> content map.
#[derive(Debug, Clone, Default)]
pub struct MapSourceProvider {
    files: HashMap<String, String>,
}

impl MapSourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the content for a path.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl From<HashMap<String, String>> for MapSourceProvider {
    fn from(files: HashMap<String, String>) -> Self {
        MapSourceProvider { files }
    }
}

impl SourceProvider for MapSourceProvider {
    fn source(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }
}

/// An immutable, point-in-time readable view of the dependency graph.
///
/// Multiple snapshots coexist; none can be mutated after publication.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    version: GraphVersion,
    parent: Option<GraphVersion>,
    commit: Option<CommitId>,
    graph: StableGraph<CodeNode, DepEdge, Directed, u32>,
    by_id: HashMap<CodeNodeId, NodeIndex<u32>>,
    /// File path -> file node id.
    path_index: HashMap<String, CodeNodeId>,
    /// Symbol name -> function node ids (kept sorted for determinism).
    symbol_index: HashMap<String, Vec<CodeNodeId>>,
}

impl GraphSnapshot {
    fn empty(version: GraphVersion) -> Self {
        GraphSnapshot {
            version,
            parent: None,
            commit: None,
            graph: StableGraph::new(),
            by_id: HashMap::new(),
            path_index: HashMap::new(),
            symbol_index: HashMap::new(),
        }
    }

    /// This snapshot's version.
    pub fn version(&self) -> GraphVersion {
        self.version
    }

    /// The parent version this snapshot was derived from.
    pub fn parent(&self) -> Option<GraphVersion> {
        self.parent
    }

    /// The commit that produced this snapshot.
    pub fn commit(&self) -> Option<&CommitId> {
        self.commit.as_ref()
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &CodeNodeId) -> Option<&CodeNode> {
        self.by_id.get(id).map(|&idx| &self.graph[idx])
    }

    /// Total node count.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of nodes currently marked degraded (reduced coverage).
    pub fn degraded_count(&self) -> usize {
        self.graph
            .node_weights()
            .filter(|node| node.degraded)
            .count()
    }

    /// Resolves a path (or unique path suffix) to a file node.
    ///
    /// Exact matches win; otherwise the suffix must identify exactly one
    /// known file, since an ambiguous anchor is worse than none.
    pub fn resolve_path(&self, path: &str) -> Option<CodeNodeId> {
        let trimmed = path.trim_start_matches("./");
        if let Some(id) = self.path_index.get(trimmed) {
            return Some(id.clone());
        }
        let mut matches = self
            .path_index
            .iter()
            .filter(|(known, _)| known.ends_with(&format!("/{trimmed}")))
            .map(|(_, id)| id.clone())
            .collect::<Vec<_>>();
        if matches.len() == 1 {
            matches.pop()
        } else {
            None
        }
    }

    /// Resolves a symbol name to the function nodes defining it, sorted.
    pub fn resolve_symbol(&self, name: &str) -> &[CodeNodeId] {
        self.symbol_index
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Bounded breadth-first traversal around `start`, following edges of
    /// the given kinds in both directions.
    ///
    /// Returns `(node id, hop distance)` pairs including `start` at hop 0,
    /// sorted by (hops, id) for reproducibility. The visited set makes
    /// traversal terminate on cyclic graphs (A imports B imports A).
    pub fn neighborhood(
        &self,
        start: &CodeNodeId,
        max_hops: u32,
        kinds: &[EdgeKind],
    ) -> Result<Vec<(CodeNodeId, u32)>, GraphError> {
        let start_idx = *self
            .by_id
            .get(start)
            .ok_or_else(|| GraphError::NodeNotFound(start.clone()))?;

        let mut visited: HashSet<NodeIndex<u32>> = HashSet::new();
        let mut queue: VecDeque<(NodeIndex<u32>, u32)> = VecDeque::new();
        let mut found: Vec<(CodeNodeId, u32)> = Vec::new();

        visited.insert(start_idx);
        queue.push_back((start_idx, 0));

        while let Some((idx, hops)) = queue.pop_front() {
            found.push((self.graph[idx].id.clone(), hops));
            if hops == max_hops {
                continue;
            }
            for direction in [Direction::Outgoing, Direction::Incoming] {
                for edge in self.graph.edges_directed(idx, direction) {
                    if !kinds.contains(&edge.weight().kind) {
                        continue;
                    }
                    let next = match direction {
                        Direction::Outgoing => edge.target(),
                        Direction::Incoming => edge.source(),
                    };
                    if visited.insert(next) {
                        queue.push_back((next, hops + 1));
                    }
                }
            }
        }

        found.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(found)
    }

    /// Iterates all nodes in the snapshot.
    pub fn nodes(&self) -> impl Iterator<Item = &CodeNode> {
        self.graph.node_weights()
    }

    // -----------------------------------------------------------------
    // Internal mutators, used only while the store builds the next
    // version. Once wrapped in Arc the snapshot is never touched again.
    // -----------------------------------------------------------------

    fn insert_node(&mut self, node: CodeNode) -> NodeIndex<u32> {
        let id = node.id.clone();
        let is_file = node.kind == NodeKind::File;
        let path = node.path.clone();
        let symbol = node.symbol().map(str::to_string);
        let idx = self.graph.add_node(node);
        self.by_id.insert(id.clone(), idx);
        if is_file {
            self.path_index.insert(path, id.clone());
        } else if let Some(symbol) = symbol {
            let entries = self.symbol_index.entry(symbol).or_default();
            entries.push(id);
            entries.sort();
            entries.dedup();
        }
        idx
    }

    fn remove_node(&mut self, id: &CodeNodeId) {
        let Some(idx) = self.by_id.remove(id) else {
            return;
        };
        if let Some(node) = self.graph.remove_node(idx) {
            if node.kind == NodeKind::File {
                // Only drop the index entry if it still points at us: a
                // rename may have already re-pointed the path.
                if self.path_index.get(&node.path) == Some(id) {
                    self.path_index.remove(&node.path);
                }
            } else if let Some(symbol) = node.symbol() {
                if let Some(entries) = self.symbol_index.get_mut(symbol) {
                    entries.retain(|entry| entry != id);
                    if entries.is_empty() {
                        self.symbol_index.remove(symbol);
                    }
                }
            }
        }
    }

    fn add_edge(&mut self, source: &CodeNodeId, target: &CodeNodeId, edge: DepEdge) {
        if let (Some(&s), Some(&t)) = (self.by_id.get(source), self.by_id.get(target)) {
            // Multigraph by kind, but the same (source, target, kind)
            // triple is recorded once.
            let exists = self
                .graph
                .edges(s)
                .any(|e| e.target() == t && e.weight().kind == edge.kind);
            if !exists {
                self.graph.add_edge(s, t, edge);
            }
        }
    }

    fn remove_outgoing_edges(&mut self, id: &CodeNodeId, kinds: &[EdgeKind]) {
        let Some(&idx) = self.by_id.get(id) else {
            return;
        };
        let doomed: Vec<_> = self
            .graph
            .edges(idx)
            .filter(|e| kinds.contains(&e.weight().kind))
            .map(|e| e.id())
            .collect();
        for edge_id in doomed {
            self.graph.remove_edge(edge_id);
        }
    }

    fn set_degraded(&mut self, id: &CodeNodeId, degraded: bool) {
        if let Some(&idx) = self.by_id.get(id) {
            self.graph[idx].degraded = degraded;
        }
    }

    /// Function node ids defined by a file, via its `Defines` edges.
    fn defined_functions(&self, file: &CodeNodeId) -> Vec<CodeNodeId> {
        let Some(&idx) = self.by_id.get(file) else {
            return Vec::new();
        };
        let mut out: Vec<CodeNodeId> = self
            .graph
            .edges(idx)
            .filter(|e| e.weight().kind == EdgeKind::Defines)
            .map(|e| self.graph[e.target()].id.clone())
            .collect();
        out.sort();
        out
    }
}

/// The versioned, single-writer dependency graph store.
pub struct DependencyGraphStore {
    snapshots: BTreeMap<u64, Arc<GraphSnapshot>>,
    /// Commit id -> version it produced; the redelivery dedupe ledger.
    applied: HashMap<CommitId, GraphVersion>,
    scanner: SourceScanner,
    horizon: usize,
    next_version: u64,
}

impl DependencyGraphStore {
    /// Creates a store with an empty genesis snapshot (version 0) and the
    /// given retention horizon (minimum 1).
    pub fn new(horizon: usize) -> Self {
        let genesis = GraphSnapshot::empty(GraphVersion(0));
        let mut snapshots = BTreeMap::new();
        snapshots.insert(0, Arc::new(genesis));
        DependencyGraphStore {
            snapshots,
            applied: HashMap::new(),
            scanner: SourceScanner::new(),
            horizon: horizon.max(1),
            next_version: 1,
        }
    }

    /// Replaces the retention horizon (minimum 1) and collects versions
    /// that fall outside the new window immediately.
    pub fn set_horizon(&mut self, horizon: usize) {
        self.horizon = horizon.max(1);
        self.collect_old_versions();
    }

    /// The latest snapshot.
    pub fn latest(&self) -> Arc<GraphSnapshot> {
        self.snapshots
            .values()
            .next_back()
            .cloned()
            .expect("store always retains the latest snapshot")
    }

    /// The latest version number.
    pub fn latest_version(&self) -> GraphVersion {
        GraphVersion(self.next_version - 1)
    }

    /// Returns a point-in-time view. `None` requests the latest.
    pub fn snapshot(
        &self,
        version: Option<GraphVersion>,
    ) -> Result<Arc<GraphSnapshot>, GraphError> {
        match version {
            None => Ok(self.latest()),
            Some(v) => {
                if v.0 >= self.next_version {
                    return Err(GraphError::UnknownVersion(v));
                }
                self.snapshots
                    .get(&v.0)
                    .cloned()
                    .ok_or(GraphError::StaleSnapshot(v))
            }
        }
    }

    /// Applies a commit, producing a new graph version.
    ///
    /// Idempotent under redelivery: a commit id that was already applied
    /// returns the version it originally produced without re-running the
    /// delta. Per-file analysis failures degrade that file's subtree and
    /// never abort the update.
    pub fn apply_commit(
        &mut self,
        commit: &CommitEvent,
        sources: &dyn SourceProvider,
    ) -> Result<GraphVersion, GraphError> {
        if let Some(&version) = self.applied.get(&commit.id) {
            return Ok(version);
        }

        let mut next = (*self.latest()).clone();
        next.version = GraphVersion(self.next_version);
        next.parent = Some(self.latest_version());
        next.commit = Some(commit.id.clone());

        // Pass 1: per-file structural deltas.
        let mut changed_outlines: Vec<(String, FileOutline)> = Vec::new();
        for change in &commit.changes {
            match &change.change {
                ChangeKind::Deleted => {
                    self.delete_file(&mut next, &change.path);
                }
                ChangeKind::Renamed { from } => {
                    self.rename_file(&mut next, from, &change.path);
                    if let Some(outline) = self.update_file(&mut next, &change.path, sources)
                    {
                        changed_outlines.push((change.path.clone(), outline));
                    }
                }
                ChangeKind::Added | ChangeKind::Modified => {
                    if let Some(outline) = self.update_file(&mut next, &change.path, sources)
                    {
                        changed_outlines.push((change.path.clone(), outline));
                    }
                }
            }
        }

        // Pass 2: call edges, once every touched file's symbols exist.
        for (path, outline) in &changed_outlines {
            self.link_calls(&mut next, path, outline);
        }

        let version = next.version;
        self.snapshots.insert(version.0, Arc::new(next));
        self.applied.insert(commit.id.clone(), version);
        self.next_version += 1;
        self.collect_old_versions();
        Ok(version)
    }

    /// Drops store references to versions beyond the retention horizon.
    /// Snapshots still referenced by in-flight work stay alive through
    /// their own `Arc` handles.
    fn collect_old_versions(&mut self) {
        while self.snapshots.len() > self.horizon {
            let oldest = *self
                .snapshots
                .keys()
                .next()
                .expect("non-empty snapshot map");
            self.snapshots.remove(&oldest);
        }
    }

    fn delete_file(&self, snapshot: &mut GraphSnapshot, path: &str) {
        if let Some(file_id) = snapshot.path_index.get(path).cloned() {
            for func in snapshot.defined_functions(&file_id) {
                snapshot.remove_node(&func);
            }
            snapshot.remove_node(&file_id);
        }
    }

    /// Records rename lineage: the new path gets a fresh node linked to
    /// the old node by a `RenamedFrom` edge. The old node stays in the
    /// graph as lineage; its symbols are dropped and its path un-indexed.
    fn rename_file(&self, snapshot: &mut GraphSnapshot, from: &str, to: &str) {
        let Some(old_id) = snapshot.path_index.get(from).cloned() else {
            return;
        };
        for func in snapshot.defined_functions(&old_id) {
            snapshot.remove_node(&func);
        }
        snapshot.path_index.remove(from);

        let old_hash = snapshot
            .node(&old_id)
            .map(|n| n.content_hash.clone())
            .unwrap_or_default();
        let new_node = CodeNode::file(to, old_hash);
        let new_id = new_node.id.clone();
        if snapshot.node(&new_id).is_none() {
            snapshot.insert_node(new_node);
        }
        snapshot.add_edge(&new_id, &old_id, DepEdge::new(EdgeKind::RenamedFrom));
    }

    /// Re-analyzes one touched path. Returns its outline on success, or
    /// `None` when the file degraded (missing/binary content) -- in that
    /// case the prior subtree is retained unchanged and marked.
    fn update_file(
        &self,
        snapshot: &mut GraphSnapshot,
        path: &str,
        sources: &dyn SourceProvider,
    ) -> Option<FileOutline> {
        let file_id = CodeNodeId::file(path);
        let language = LanguageTag::from_path(path);

        let outline = match sources.source(path) {
            Some(content) => match self.scanner.scan(language, content) {
                Ok(outline) => {
                    let hash = content_hash(content);
                    if snapshot.node(&file_id).is_none() {
                        snapshot.insert_node(CodeNode::file(path, hash.clone()));
                    }
                    if let Some(&idx) = snapshot.by_id.get(&file_id) {
                        snapshot.graph[idx].content_hash = hash;
                    }
                    snapshot.set_degraded(&file_id, false);
                    outline
                }
                Err(_) => {
                    self.degrade_file(snapshot, path, &file_id);
                    return None;
                }
            },
            None => {
                self.degrade_file(snapshot, path, &file_id);
                return None;
            }
        };

        // Reconcile defined symbols.
        let current = snapshot.defined_functions(&file_id);
        let wanted: HashSet<CodeNodeId> = outline
            .functions
            .iter()
            .map(|name| CodeNodeId::symbol(NodeKind::Function, path, name))
            .collect();
        for stale in current.iter().filter(|id| !wanted.contains(id)) {
            snapshot.remove_node(stale);
        }
        let file_hash = snapshot
            .node(&file_id)
            .map(|n| n.content_hash.clone())
            .unwrap_or_default();
        for name in &outline.functions {
            let func_id = CodeNodeId::symbol(NodeKind::Function, path, name);
            if snapshot.node(&func_id).is_none() {
                snapshot.insert_node(CodeNode::function(path, name, file_hash.clone()));
            }
            // A surviving function recovers along with its file.
            snapshot.set_degraded(&func_id, false);
            snapshot.add_edge(&file_id, &func_id, DepEdge::new(EdgeKind::Defines));
        }

        // Rebuild import/test edges from scratch for this file.
        let import_kind = if is_test_path(path) {
            EdgeKind::Tests
        } else {
            EdgeKind::Imports
        };
        snapshot.remove_outgoing_edges(&file_id, &[EdgeKind::Imports, EdgeKind::Tests]);
        for import in &outline.imports {
            for target in resolve_import(snapshot, language, import) {
                if target != file_id {
                    snapshot.add_edge(&file_id, &target, DepEdge::new(import_kind));
                }
            }
        }

        Some(outline)
    }

    fn degrade_file(&self, snapshot: &mut GraphSnapshot, path: &str, file_id: &CodeNodeId) {
        if snapshot.node(file_id).is_none() {
            let mut node = CodeNode::file(path, String::new());
            node.degraded = true;
            snapshot.insert_node(node);
        } else {
            snapshot.set_degraded(file_id, true);
            for func in snapshot.defined_functions(file_id) {
                snapshot.set_degraded(&func, true);
            }
        }
    }

    /// Adds `Calls` edges from this file's functions to known symbols the
    /// file calls. Resolution is name-based and bounded to symbols that
    /// exist in the snapshot.
    fn link_calls(&self, snapshot: &mut GraphSnapshot, path: &str, outline: &FileOutline) {
        let file_id = CodeNodeId::file(path);
        let callers = snapshot.defined_functions(&file_id);
        for caller in &callers {
            snapshot.remove_outgoing_edges(caller, &[EdgeKind::Calls]);
        }
        for call in &outline.calls {
            let targets = snapshot.resolve_symbol(call).to_vec();
            for target in targets {
                for caller in &callers {
                    if caller != &target {
                        snapshot.add_edge(caller, &target, DepEdge::new(EdgeKind::Calls));
                    }
                }
            }
        }
    }
}

/// Heuristic: paths under a tests directory or with a test-ish basename.
fn is_test_path(path: &str) -> bool {
    let basename = path.rsplit('/').next().unwrap_or(path);
    path.split('/').any(|seg| seg == "tests" || seg == "test")
        || basename.starts_with("test_")
        || basename.contains("_test.")
        || basename.contains(".test.")
}

/// Resolves an import string to file nodes, per source language.
///
/// Best-effort: unresolved imports are simply dropped (they may point
/// outside the repository). Go package imports may resolve to several
/// files; the rest resolve to at most one.
fn resolve_import(
    snapshot: &GraphSnapshot,
    language: LanguageTag,
    import: &str,
) -> Vec<CodeNodeId> {
    match language {
        LanguageTag::Python => {
            let base = import.replace('.', "/");
            snapshot
                .resolve_path(&format!("{base}.py"))
                .or_else(|| snapshot.resolve_path(&format!("{base}/__init__.py")))
                .into_iter()
                .collect()
        }
        LanguageTag::JavaScript | LanguageTag::TypeScript => {
            let base = import.trim_start_matches("./").trim_start_matches("../");
            ["ts", "tsx", "js", "jsx"]
                .iter()
                .find_map(|ext| snapshot.resolve_path(&format!("{base}.{ext}")))
                .into_iter()
                .collect()
        }
        LanguageTag::Rust => {
            let last = import.rsplit("::").next().unwrap_or(import);
            snapshot
                .resolve_path(&format!("{last}.rs"))
                .into_iter()
                .collect()
        }
        LanguageTag::Go => {
            let mut matches: Vec<CodeNodeId> = snapshot
                .path_index
                .iter()
                .filter(|(path, _)| {
                    path.rsplit_once('/')
                        .map(|(dir, _)| dir == import || dir.ends_with(&format!("/{import}")))
                        .unwrap_or(false)
                })
                .map(|(_, id)| id.clone())
                .collect();
            matches.sort();
            matches
        }
        LanguageTag::Unknown => Vec::new(),
    }
}

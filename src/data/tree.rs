use std::fs::read_dir;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::loader::{file_stem, parse_table};
use super::model::Table;
use crate::error::{Error, Result};
use crate::style::Style;

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
enum Node {
    /// Children in insertion order (directory entries are visited sorted by name).
    Branch(Vec<(String, NodeId)>),
    Leaf(Table),
}

// ---------------------------------------------------------------------------
// ResultTree – arena of nodes mirroring a post-processing directory
// ---------------------------------------------------------------------------

/// All tables found below a post-processing directory, keyed by their path.
///
/// `postProcessing/sample/10/bottom.xy` becomes the leaf
/// `["sample", "10", "bottom"]`: directory names are kept verbatim, the
/// file name loses its extension. When two files map to the same key the
/// one visited last wins and a warning is logged.
#[derive(Debug, Clone)]
pub struct ResultTree {
    name: String,
    root_dir: PathBuf,
    nodes: Vec<Node>,
}

impl ResultTree {
    /// Parse every regular file below `root_dir`, at any depth.
    ///
    /// Construction is all-or-nothing: an unreadable directory or a single
    /// malformed file fails the whole build.
    pub fn build(root_dir: &Path, case_name: &str) -> Result<Self> {
        let mut tree = ResultTree::new(root_dir, case_name);
        tree.walk_directory(root_dir)?;
        info!(
            "loaded case '{}' from {}: {} tables",
            tree.name,
            root_dir.display(),
            tree.len()
        );
        Ok(tree)
    }

    /// An empty tree; fill it with [`ResultTree::insert`].
    pub(crate) fn new(root_dir: &Path, case_name: &str) -> Self {
        ResultTree {
            name: case_name.to_string(),
            root_dir: root_dir.to_path_buf(),
            nodes: vec![Node::Branch(Vec::new())],
        }
    }

    fn walk_directory(&mut self, current: &Path) -> Result<()> {
        let dir_error = |source| Error::Directory {
            path: current.to_path_buf(),
            source,
        };

        let mut entries = read_dir(current)
            .map_err(dir_error)?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(dir_error)?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type().map_err(dir_error)?;

            if file_type.is_dir() {
                self.walk_directory(&path)?;
            } else if path.is_file() {
                let table = parse_table(&path, None, Style::table_default())?;
                let segments = self.key_path(&path);
                self.insert(&segments, table);
            }
        }
        Ok(())
    }

    /// Directory segments relative to the root, followed by the file stem.
    fn key_path(&self, file: &Path) -> Vec<String> {
        let relative = file.strip_prefix(&self.root_dir).unwrap_or(file);
        let mut segments: Vec<String> = relative
            .parent()
            .into_iter()
            .flat_map(|p| p.components())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        segments.push(file_stem(file));
        segments
    }

    /// Store `table` under `path`, creating intermediate branches on demand.
    pub(crate) fn insert(&mut self, path: &[String], table: Table) {
        let Some((leaf_key, dirs)) = path.split_last() else {
            return;
        };

        let mut current = ROOT;
        for key in dirs {
            current = match self.find_child(current, key) {
                Some(id) => {
                    if matches!(self.nodes[id], Node::Leaf(_)) {
                        warn!("'{key}' in {} replaces a table with a directory", path.join("/"));
                        self.nodes[id] = Node::Branch(Vec::new());
                    }
                    id
                }
                None => self.attach(current, key, Node::Branch(Vec::new())),
            };
        }

        match self.find_child(current, leaf_key) {
            Some(id) => {
                warn!("{} is defined twice, keeping the last one", path.join("/"));
                self.nodes[id] = Node::Leaf(table);
            }
            None => {
                self.attach(current, leaf_key, Node::Leaf(table));
            }
        }
    }

    fn find_child(&self, parent: NodeId, key: &str) -> Option<NodeId> {
        match &self.nodes[parent] {
            Node::Branch(children) => children.iter().find(|(k, _)| k == key).map(|(_, id)| *id),
            Node::Leaf(_) => None,
        }
    }

    fn attach(&mut self, parent: NodeId, key: &str, node: Node) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        if let Node::Branch(children) = &mut self.nodes[parent] {
            children.push((key.to_string(), id));
        }
        id
    }

    /// Case name used as label for this tree.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: ROOT,
        }
    }

    /// Follow `path` from the root.
    pub fn node<S: AsRef<str>>(&self, path: &[S]) -> Result<NodeRef<'_>> {
        path.iter()
            .try_fold(self.root(), |node, key| node.child(key.as_ref()))
    }

    /// The table stored at `path`.
    pub fn table<S: AsRef<str>>(&self, path: &[S]) -> Result<&Table> {
        let node = self.node(path)?;
        node.table().ok_or_else(|| {
            Error::Configuration(format!(
                "'{}' is a directory, not a table",
                path.iter().map(|s| s.as_ref()).collect::<Vec<&str>>().join("/")
            ))
        })
    }

    /// Every table reachable from the root with its key path, depth first.
    pub fn leaves(&self) -> Vec<(Vec<String>, &Table)> {
        let mut out = Vec::new();
        collect_leaves(self.root(), &mut Vec::new(), &mut out);
        out
    }

    /// Number of reachable tables.
    pub fn len(&self) -> usize {
        self.leaves().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn collect_leaves<'t>(
    node: NodeRef<'t>,
    prefix: &mut Vec<String>,
    out: &mut Vec<(Vec<String>, &'t Table)>,
) {
    if let Some(table) = node.table() {
        out.push((prefix.clone(), table));
        return;
    }
    for (key, child) in node.children() {
        prefix.push(key.to_string());
        collect_leaves(child, prefix, out);
        prefix.pop();
    }
}

// ---------------------------------------------------------------------------
// NodeRef – borrowed view of one node
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t ResultTree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    /// The table if this node is a leaf.
    pub fn table(&self) -> Option<&'t Table> {
        match &self.tree.nodes[self.id] {
            Node::Leaf(table) => Some(table),
            Node::Branch(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.table().is_some()
    }

    /// Child keys in insertion order; empty for leaves.
    pub fn keys(&self) -> impl Iterator<Item = &'t str> {
        self.children().map(|(key, _)| key)
    }

    pub fn children(&self) -> impl Iterator<Item = (&'t str, NodeRef<'t>)> {
        let tree = self.tree;
        let children: &'t [(String, NodeId)] = match &tree.nodes[self.id] {
            Node::Branch(children) => children,
            Node::Leaf(_) => &[],
        };
        children
            .iter()
            .map(move |(key, id)| (key.as_str(), NodeRef { tree, id: *id }))
    }

    pub fn child(&self, key: &str) -> Result<NodeRef<'t>> {
        self.tree
            .find_child(self.id, key)
            .map(|id| NodeRef {
                tree: self.tree,
                id,
            })
            .ok_or_else(|| Error::key_not_found(key, self.keys()))
    }
}
